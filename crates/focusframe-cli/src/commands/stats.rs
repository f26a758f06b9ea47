use focusframe_core::storage::Database;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_default()?;
    let stats = db.stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
