use crate::core::auth::AuthLogic;
use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::{ensure_writable, write_output};
use crate::export::{CheckinExport, ExportFormat, notify_export_success, render};
use crate::ledger::latest_per_employee;
use crate::models::CheckinEvent;
use crate::store::Store;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

/// What to extract from the ledger.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub department: Option<String>,
    pub format: ExportFormat,
    /// Keep only the latest event of every employee.
    pub latest_only: bool,
}

/// A rendered export, ready to be written or sent.
#[derive(Debug)]
pub struct ExportOutput {
    pub file_name: String,
    pub format: ExportFormat,
    pub rows: usize,
    pub bytes: Vec<u8>,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Rows of the ledger, in ledger order, optionally restricted to one
    /// department (matched on the department recorded with each event).
    pub fn select(
        events: &[CheckinEvent],
        department: Option<&str>,
        latest_only: bool,
    ) -> AppResult<Vec<CheckinExport>> {
        if events.is_empty() {
            return Err(AppError::EmptyLedger);
        }

        let source: Vec<&CheckinEvent> = if latest_only {
            latest_per_employee(events)
        } else {
            events.iter().collect()
        };

        let rows: Vec<CheckinExport> = match department.map(str::trim) {
            Some(dept) => source
                .into_iter()
                .filter(|e| e.department == dept)
                .map(CheckinExport::from)
                .collect(),
            None => source.into_iter().map(CheckinExport::from).collect(),
        };

        if rows.is_empty() {
            return Err(match department {
                Some(dept) => AppError::NoMatchingRecords(dept.trim().to_string()),
                None => AppError::EmptyLedger,
            });
        }

        Ok(rows)
    }

    /// Admin-only: select and render an export.
    pub fn build(store: &Store, session: &Session, req: &ExportRequest) -> AppResult<ExportOutput> {
        AuthLogic::require_admin(store, session)?;

        let rows = {
            let ledger = store.ledger()?;
            Self::select(ledger.events(), req.department.as_deref(), req.latest_only)?
        };

        let title = req.department.as_deref().unwrap_or("TAT_CA");
        let bytes = render(&rows, req.format, title)?;

        info!(
            department = req.department.as_deref().unwrap_or("*"),
            format = req.format.as_str(),
            rows = rows.len(),
            "export built"
        );

        Ok(ExportOutput {
            file_name: default_file_name(req.department.as_deref(), req.format),
            format: req.format,
            rows: rows.len(),
            bytes,
        })
    }

    /// Build an export and write it to `file` (or the default file name in
    /// the working directory). Nothing is written when selection fails.
    pub fn export_to_file(
        store: &Store,
        session: &Session,
        req: &ExportRequest,
        file: Option<&str>,
        force: bool,
    ) -> AppResult<PathBuf> {
        let output = Self::build(store, session, req)?;

        let path = match file {
            Some(f) => resolve(Path::new(f))?,
            None => resolve(Path::new(&output.file_name))?,
        };

        ensure_writable(&path, force)?;
        write_output(&path, &output.bytes)?;

        notify_export_success(output.format.label(), output.rows, &path);
        Ok(path)
    }
}

/// `KQ_<department>.<ext>`, or `KQ_TAT_CA.<ext>` for the whole ledger.
/// Non-ASCII characters become `_` so the name is usable in HTTP headers.
pub fn default_file_name(department: Option<&str>, format: ExportFormat) -> String {
    let stem = match department {
        Some(d) => d
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect::<String>(),
        None => "TAT_CA".to_string(),
    };
    format!("KQ_{stem}.{}", format.as_str())
}

fn resolve(path: &Path) -> AppResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
