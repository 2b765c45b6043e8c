use crate::audit;
use crate::cli::commands::current_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::checkin::{CheckinLogic, parse_submission};
use crate::errors::{AppError, AppResult};
use crate::store::Store;
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::table::{Column, Table};
use std::path::Path;

/// Handle `checkin <STATUS>`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin { status } = cmd {
        let session = current_session(cfg)?;
        let status = parse_submission(status)?;
        let store = Store::from_config(cfg)?;

        match CheckinLogic::submit(&store, &session, status) {
            Ok(event) => {
                audit::record(
                    Path::new(&cfg.audit_file),
                    "checkin",
                    &event.employee_id,
                    event.status.as_str(),
                );
                success(format!(
                    "Status recorded: {}{}{} at {}",
                    color_for_status(event.status),
                    event.status.display_label(),
                    RESET,
                    event.timestamp_str()
                ));
            }
            Err(e @ AppError::TerminalStateViolation(_)) => {
                audit::record(
                    Path::new(&cfg.audit_file),
                    "checkin_rejected",
                    &session.employee_id,
                    status.as_str(),
                );
                return Err(e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Handle `status`.
pub fn handle_status(cfg: &Config) -> AppResult<()> {
    let session = current_session(cfg)?;
    let store = Store::from_config(cfg)?;
    let view = CheckinLogic::status_of(&store, &session)?;

    println!("👤 {} ({}) – {}", view.name, view.employee_id, view.department);
    println!(
        "📋 Status: {}{}{}",
        color_for_status(view.status),
        view.status.display_label(),
        RESET
    );
    if let Some(ts) = view.last_update {
        println!("🕒 Last update: {ts}");
    }
    Ok(())
}

/// Handle `history`.
pub fn handle_history(cfg: &Config) -> AppResult<()> {
    let session = current_session(cfg)?;
    let store = Store::from_config(cfg)?;
    let ledger = store.ledger()?;
    let history = ledger.history_for(&session.employee_id);

    if history.is_empty() {
        info("No check-in recorded yet.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("#", 3),
        Column::new("Timestamp", 19),
        Column::new("Status", 14),
    ]);
    for (i, e) in history.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            e.timestamp_str(),
            e.status.as_str().to_string(),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}
