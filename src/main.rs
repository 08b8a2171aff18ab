use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod codec;
mod commands;
mod config;
mod models;
mod speech;
mod store;

use commands::{
    ConfigCommand, DictateCommand, ExportCommand, ImportCommand, ItemCommand, RoomCommand,
};
use config::Config;
use store::InventoryStore;

#[derive(Parser)]
#[command(name = "boxup")]
#[command(version)]
#[command(about = "A household-move inventory tracker", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage rooms
    Room(RoomCommand),

    /// Manage items within rooms
    Item(ItemCommand),

    /// Export the inventory as a CSV file
    Export(ExportCommand),

    /// Import a CSV file, replacing the inventory
    Import(ImportCommand),

    /// Capture items or notes by voice dictation
    Dictate(DictateCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boxup=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    let store = InventoryStore::new(config.data_path.clone());

    match cli.command {
        Some(Commands::Room(cmd)) => cmd.run(&store),
        Some(Commands::Item(cmd)) => cmd.run(&store),
        Some(Commands::Export(cmd)) => cmd.run(&store),
        Some(Commands::Import(cmd)) => cmd.run(&store),
        Some(Commands::Dictate(cmd)) => cmd.run(&store, &config),
        Some(Commands::Config(cmd)) => cmd.run(&config),
        None => {
            println!("Use --help to see available commands");
            Ok(())
        }
    }
}
