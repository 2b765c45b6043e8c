//! User-facing CLI messages.
//! Colours are dropped when `NO_COLOR` is set.

use std::fmt;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn styled(color: &str, icon: &str, msg: impl fmt::Display) -> String {
    if std::env::var_os("NO_COLOR").is_some() {
        format!("{icon} {msg}")
    } else {
        format!("{color}{BOLD}{icon}{RESET} {msg}")
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_BLUE, ICON_INFO, msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_GREEN, ICON_OK, msg));
}

/// Warnings go to stderr so machine-readable stdout stays clean.
pub fn warning<T: fmt::Display>(msg: T) {
    eprintln!("{}", styled(FG_YELLOW, ICON_WARN, msg));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", styled(FG_RED, ICON_ERR, msg));
}

/// Section header
pub fn header<T: fmt::Display>(msg: T) {
    if std::env::var_os("NO_COLOR").is_some() {
        println!("====================== {msg}\n");
    } else {
        println!("{FG_BLUE}{BOLD}====================== {msg}\n{RESET}");
    }
}
