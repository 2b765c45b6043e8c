use crate::cli::commands::current_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::{AggregateLogic, overall};
use crate::core::auth::AuthLogic;
use crate::errors::AppResult;
use crate::models::DepartmentStat;
use crate::store::Store;
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_progress};
use crate::utils::table::{Column, Table};

/// Handle `dashboard`.
///
/// Administrators see per-department progress; other employees are shown
/// their own status.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let json = matches!(cmd, Commands::Dashboard { json: true });
    let store = Store::from_config(cfg)?;
    let session = AuthLogic::current(&store, &current_session(cfg)?)?;

    if !session.is_admin() {
        return super::checkin::handle_status(cfg);
    }

    let stats = AggregateLogic::dashboard(&store, &session)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if stats.is_empty() {
        info("The roster is empty: import one with `kiemke roster import --file <FILE>`.");
        return Ok(());
    }

    header("Inventory progress by department");
    print!("{}", render_stats(&stats));
    Ok(())
}

pub(crate) fn render_stats(stats: &[DepartmentStat]) -> String {
    let dept_w = stats
        .iter()
        .map(|s| s.department.chars().count())
        .max()
        .unwrap_or(10)
        .max(10);

    let mut table = Table::new(vec![
        Column::new("Department", dept_w),
        Column::new("Total", 5),
        Column::new("Not started", 11),
        Column::new("In progress", 11),
        Column::new("Cross-check", 11),
        Column::new("Completed", 9),
        Column::new("Progress", 8),
    ]);

    let total = overall(stats);
    for s in stats.iter().chain(std::iter::once(&total)) {
        table.add_row(vec![
            s.department.clone(),
            s.total.to_string(),
            s.not_started.to_string(),
            s.in_progress.to_string(),
            s.cross_checking.to_string(),
            s.completed.to_string(),
            format!(
                "{}{:.1}%{}",
                color_for_progress(s.completion_percentage),
                s.completion_percentage,
                RESET
            ),
        ]);
    }

    table.render()
}
