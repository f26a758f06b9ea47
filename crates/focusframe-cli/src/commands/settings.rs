use clap::Subcommand;
use focusframe_core::storage::Database;
use focusframe_core::Settings;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON
    Show,
    /// Get a single value
    Get { key: String },
    /// Set a single value
    Set { key: String, value: String },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_default()?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&db.settings()?)?);
        }
        SettingsAction::Get { key } => {
            let json = serde_json::to_value(db.settings()?)?;
            match json.get(&key) {
                Some(serde_json::Value::String(s)) => println!("{s}"),
                Some(other) => println!("{other}"),
                None => return Err(format!("unknown settings key: {key}").into()),
            }
        }
        SettingsAction::Set { key, value } => {
            let mut settings = db.settings()?;
            set_value(&mut settings, &key, &value)?;
            db.save_settings(&settings)?;
            println!("{key} = {value}");
        }
    }

    Ok(())
}

/// Set a settings field by key, parsing `value` against the field's
/// existing type.
fn set_value(
    settings: &mut Settings,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut json = serde_json::to_value(&*settings)?;
    let obj = json
        .as_object_mut()
        .ok_or("settings did not serialize to an object")?;
    let existing = obj
        .get(key)
        .ok_or_else(|| format!("unknown settings key: {key}"))?;

    let new_value = match existing {
        serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
        serde_json::Value::Number(_) => serde_json::Value::Number(value.parse::<u64>()?.into()),
        _ => serde_json::Value::String(value.into()),
    };

    obj.insert(key.to_string(), new_value);
    *settings = serde_json::from_value(json)?;
    Ok(())
}
