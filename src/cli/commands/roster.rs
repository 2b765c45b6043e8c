use crate::audit;
use crate::cli::commands::current_session;
use crate::cli::parser::{Commands, RosterAction};
use crate::config::Config;
use crate::core::auth::AuthLogic;
use crate::errors::AppResult;
use crate::roster::ingest::RosterFormat;
use crate::store::Store;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::table::{Column, Table};
use std::fs;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Roster { action } = cmd {
        match action {
            RosterAction::Import { file } => import(cfg, file)?,
            RosterAction::List { department } => list(cfg, department.as_deref())?,
        }
    }
    Ok(())
}

/// Replace the roster. The very first import needs no session; later ones
/// need an administrator.
fn import(cfg: &Config, file: &str) -> AppResult<()> {
    let store = Store::from_config(cfg)?;

    let actor = if store.has_roster_file() {
        let session = current_session(cfg)?;
        AuthLogic::require_admin(&store, &session)?.employee_id
    } else {
        info("No roster yet: importing without a session.");
        String::new()
    };

    let bytes = fs::read(file)?;
    let format = RosterFormat::from_path(Path::new(file));
    let roster = match store.import_roster_as(&bytes, format) {
        Ok(r) => r,
        Err(e) => {
            warning("Roster rejected: the current roster is unchanged.");
            return Err(e);
        }
    };

    let admins = roster.employees().iter().filter(|e| e.role.is_admin()).count();
    if admins == 0 {
        warning("The imported roster has no administrator.");
    }

    audit::record(
        Path::new(&cfg.audit_file),
        "roster_import",
        &actor,
        &format!("{} employees from {file}", roster.len()),
    );

    success(format!(
        "Roster imported: {} employees in {} departments ({} admin)",
        roster.len(),
        roster.departments().len(),
        admins
    ));
    Ok(())
}

fn list(cfg: &Config, department: Option<&str>) -> AppResult<()> {
    let session = current_session(cfg)?;
    let store = Store::from_config(cfg)?;
    AuthLogic::require_admin(&store, &session)?;
    let roster = store.roster()?;
    let ledger = store.ledger()?;

    let mut table = Table::new(vec![
        Column::new("ID", 8),
        Column::new("Name", 24),
        Column::new("Department", 14),
        Column::new("Role", 5),
        Column::new("Status", 14),
    ]);

    for e in roster
        .employees()
        .iter()
        .filter(|e| department.is_none_or(|d| e.department == d.trim()))
    {
        let status = ledger.current_status(&e.id);
        table.add_row(vec![
            e.id.clone(),
            e.name.clone(),
            e.department.clone(),
            e.role.as_str().to_string(),
            format!("{}{}{}", color_for_status(status), status.display_label(), RESET),
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
