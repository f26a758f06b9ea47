use clap::Subcommand;
use focusframe_core::storage::Database;
use focusframe_core::{Artwork, ArtworkFilter};

#[derive(Subcommand)]
pub enum ArtworkAction {
    /// List artworks, optionally filtered
    List {
        /// Filter by artist (native or transliterated name)
        #[arg(long)]
        artist: Option<String>,
        /// Filter by genre tag
        #[arg(long)]
        genre: Option<String>,
        /// Filter by era
        #[arg(long)]
        era: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one artwork as JSON
    Show { id: String },
}

pub fn run(action: ArtworkAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_default()?;

    match action {
        ArtworkAction::List {
            artist,
            genre,
            era,
            json,
        } => {
            let filter = ArtworkFilter { artist, genre, era };
            let mut artworks = db.artworks()?;
            artworks.retain(|a| filter.matches(a));

            if json {
                println!("{}", serde_json::to_string_pretty(&artworks)?);
            } else {
                for artwork in &artworks {
                    print_line(artwork);
                }
                println!("{} artwork(s)", artworks.len());
            }
        }
        ArtworkAction::Show { id } => match db.artwork(&id)? {
            Some(artwork) => println!("{}", serde_json::to_string_pretty(&artwork)?),
            None => {
                eprintln!("artwork '{id}' not found");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn print_line(artwork: &Artwork) {
    println!(
        "{}  {} / {} -- {} ({}, {})  min grid {}",
        artwork.id,
        artwork.title,
        artwork.title_en,
        artwork.artist_en,
        artwork.era,
        artwork.year,
        artwork.min_grid,
    );
}
