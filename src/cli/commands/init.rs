use crate::audit;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::path::Path;

/// Handle the `init` command
///
/// Creates the config directory, the configuration file and the data
/// directory. Roster and ledger files are created on first import/check-in.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let secret = match &cli.command {
        Commands::Init { secret } => secret.as_deref(),
        _ => None,
    };

    let cfg = Config::init_all(cli.data_dir.as_deref(), secret, cli.test)?;

    println!("⚙️  Initializing kiemke…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("👥 Roster      : {}", cfg.roster_file);
    println!("🗂️  Ledger      : {}", cfg.ledger_file);

    if cfg.session_secret.trim().is_empty() {
        warning(format!(
            "No session secret configured: set session_secret in the config file or export {}",
            crate::config::ENV_SESSION_SECRET
        ));
    }

    audit::record(
        Path::new(&cfg.audit_file),
        "init",
        "",
        &format!("data files under {}", cfg.ledger_file),
    );

    success("kiemke initialization completed!");
    Ok(())
}
