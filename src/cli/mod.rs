use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod check;
mod validate;

#[derive(Parser)]
#[command(
    name = "plugreg",
    version,
    about = "Plugin registry validator and release checker"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the registry against its schema and check identifier uniqueness
    Validate {
        /// Path to the registry document
        #[arg(long, default_value = "plugins.json")]
        registry: PathBuf,
        /// Path to the JSON Schema document
        #[arg(long, default_value = "schema/plugins.schema.json")]
        schema: PathBuf,
    },
    /// Verify newly-added plugins against publishing requirements
    Check {
        /// Registry file path within the repository
        #[arg(long, default_value = "plugins.json")]
        registry: String,
    },
}

pub fn run(cli: Cli) {
    match cli.command {
        Some(Commands::Validate { registry, schema }) => validate::run(&registry, &schema),
        Some(Commands::Check { registry }) => check::run(&registry),
        None => {
            eprintln!("Usage: plugreg <command> [args]");
            eprintln!("Run `plugreg --help` for details.");
            std::process::exit(1);
        }
    }
}
