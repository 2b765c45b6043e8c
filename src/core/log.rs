use crate::audit::{AuditEntry, read_entries};
use crate::config::Config;
use crate::errors::AppResult;
use crate::utils::table::strip_ansi;
use ansi_term::Colour;
use std::path::Path;

/// ANSI colour by operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "checkin" => Colour::Green,
        "checkin_rejected" => Colour::Red,
        "login" => Colour::Cyan,
        "logout" => Colour::Blue,
        "roster_import" => Colour::Purple,
        "export" => Colour::Yellow,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(cfg: &Config) -> AppResult<()> {
        let entries = read_entries(Path::new(&cfg.audit_file))?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let rows: Vec<(usize, String, String, String, String)> = entries
            .into_iter()
            .enumerate()
            .map(|(i, AuditEntry { date, operation, target, message })| {
                let date = chrono::DateTime::parse_from_rfc3339(&date)
                    .map(|dt| dt.format("%F %T").to_string())
                    .unwrap_or(date);

                let op_target = if target.is_empty() {
                    operation.clone()
                } else {
                    format!("{operation} ({target})")
                };

                (i + 1, date, operation, op_target, message)
            })
            .collect();

        let op_w = rows
            .iter()
            .map(|(_, _, _, op_target, _)| op_target.chars().count())
            .max()
            .unwrap_or(10)
            .min(60);
        let id_w = rows.len().to_string().len();
        let date_w = rows.iter().map(|(_, d, _, _, _)| d.len()).max().unwrap_or(19);

        println!("📜 Internal log:\n");

        for (id, date, operation, op_target, message) in rows {
            let color = color_for_operation(&operation);

            // truncate on visible chars, then colour only the operation word
            let visible: String = if op_target.chars().count() > 60 {
                let mut s: String = op_target.chars().take(57).collect();
                s.push_str("...");
                s
            } else {
                op_target
            };

            let recolored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&recolored).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                recolored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
