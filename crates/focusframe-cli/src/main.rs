use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "focusframe", version, about = "FocusFrame CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Artwork catalog
    Artwork {
        #[command(subcommand)]
        action: commands::artwork::ArtworkAction,
    },
    /// Challenge lifecycle
    Challenge {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Run focus and break countdowns
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// User settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Session statistics
    Stats,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Artwork { action } => commands::artwork::run(action),
        Commands::Challenge { action } => commands::challenge::run(action),
        Commands::Focus { action } => commands::focus::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Stats => commands::stats::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
