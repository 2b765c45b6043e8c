//! kiemke library root.
//! Exposes the CLI parser, the high-level run() function, the HTTP server
//! and the roster / ledger / check-in core they share.

pub mod audit;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod models;
pub mod roster;
pub mod server;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init { .. } => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Roster { .. } => commands::roster::handle(&cli.command, cfg),
        Commands::Login { .. } => commands::login::handle(&cli.command, cfg),
        Commands::Logout => commands::login::handle_logout(cfg),
        Commands::Whoami => commands::login::handle_whoami(cfg),
        Commands::Status => commands::checkin::handle_status(cfg),
        Commands::Checkin { .. } => commands::checkin::handle(&cli.command, cfg),
        Commands::History => commands::checkin::handle_history(cfg),
        Commands::Dashboard { .. } => commands::dashboard::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::Serve { .. } => commands::serve::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line override of the data directory
    if let Some(dir) = &cli.data_dir {
        cfg.relocate(dir);
    }

    dispatch(&cli, &cfg)
}
