use crate::audit;
use crate::cli::commands::current_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::auth::AuthLogic;
use crate::core::session::{SessionKeys, clear_token_file, write_token_file};
use crate::errors::AppResult;
use crate::store::Store;
use crate::ui::messages::{info, success};
use std::path::Path;

/// Handle `login`: authenticate and store the session token.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Login { id, password } = cmd {
        let keys = SessionKeys::from_config(cfg)?;
        let store = Store::from_config(cfg)?;

        let (session, token) = match AuthLogic::login(&store, &keys, id, password) {
            Ok(ok) => ok,
            Err(e) => {
                audit::record(Path::new(&cfg.audit_file), "login_failed", id.trim(), "");
                return Err(e);
            }
        };

        write_token_file(Path::new(&cfg.session_file), &token)?;
        audit::record(
            Path::new(&cfg.audit_file),
            "login",
            &session.employee_id,
            session.role.as_str(),
        );

        success(format!(
            "Logged in as {} ({}, {})",
            session.name,
            session.employee_id,
            session.role.as_str()
        ));
    }
    Ok(())
}

/// Handle `logout`: drop the stored session token.
pub fn handle_logout(cfg: &Config) -> AppResult<()> {
    if clear_token_file(Path::new(&cfg.session_file))? {
        audit::record(Path::new(&cfg.audit_file), "logout", "", "");
        success("Logged out.");
    } else {
        info("No active session.");
    }
    Ok(())
}

/// Handle `whoami`.
pub fn handle_whoami(cfg: &Config) -> AppResult<()> {
    let session = current_session(cfg)?;
    println!(
        "👤 {} ({}) – role: {}",
        session.name,
        session.employee_id,
        session.role.as_str()
    );
    Ok(())
}
