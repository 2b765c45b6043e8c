//! ANSI color helper utilities for terminal output.

use crate::models::CheckinStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

pub fn color_for_status(status: CheckinStatus) -> &'static str {
    match status {
        CheckinStatus::NotStarted => GREY,
        CheckinStatus::InProgress => YELLOW,
        CheckinStatus::CrossChecking => CYAN,
        CheckinStatus::Completed => GREEN,
    }
}

/// Progress color:
/// 100 → green
/// \>= 50 → yellow
/// otherwise → red
pub fn color_for_progress(pct: f64) -> &'static str {
    if pct >= 100.0 {
        GREEN
    } else if pct >= 50.0 {
        YELLOW
    } else {
        RED
    }
}
