//! Unified application error type.
//! Roster, ledger, core logic, CLI and HTTP front-ends all return AppError
//! so that every failure is reported the same way.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Authentication / session
    // ---------------------------
    #[error("Authentication failed: invalid employee id or password")]
    AuthenticationFailed,

    #[error("No active session: please log in first")]
    SessionMissing,

    #[error("This operation requires an administrator session")]
    AdminRequired,

    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    // ---------------------------
    // Check-in
    // ---------------------------
    #[error("Employee {0} has already completed the inventory count")]
    TerminalStateViolation(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Employee {0} is not on the current roster")]
    UnknownEmployee(String),

    // ---------------------------
    // Roster / ledger parsing
    // ---------------------------
    #[error("Malformed roster: {0}")]
    MalformedRoster(String),

    #[error("Malformed ledger: {0}")]
    MalformedLedger(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("The check-in ledger is empty")]
    EmptyLedger,

    #[error("No check-in records for department {0}")]
    NoMatchingRecords(String),

    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
