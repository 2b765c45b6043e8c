use crate::errors::{AppError, AppResult};
use crate::models::checkin::{CheckinEvent, parse_timestamp};
use crate::models::CheckinStatus;
use crate::roster::ingest::{find_column, normalize_header};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

pub const LEDGER_HEADERS: [&str; 5] = ["employee_id", "name", "department", "timestamp", "status"];

// Headers of ledgers written by the legacy spreadsheet tool are accepted too.
const ID_ALIASES: &[&str] = &["employee_id", "ma_nv", "id"];
const NAME_ALIASES: &[&str] = &["name", "ho_ten"];
const DEPARTMENT_ALIASES: &[&str] = &["department", "bo_phan_kk"];
const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "thoi_gian"];
const STATUS_ALIASES: &[&str] = &["status", "trang_thai"];

/// Column positions of an existing ledger file, in [`LEDGER_HEADERS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Layout {
    width: usize,
    positions: [usize; 5],
}

impl Layout {
    pub(super) fn canonical() -> Self {
        Self {
            width: LEDGER_HEADERS.len(),
            positions: [0, 1, 2, 3, 4],
        }
    }

    /// Place the fields of `event` in this file's column order.
    fn row(&self, event: &CheckinEvent) -> Vec<String> {
        let fields = [
            event.employee_id.clone(),
            event.name.clone(),
            event.department.clone(),
            event.timestamp_str(),
            event.status.as_str().to_string(),
        ];

        let mut row = vec![String::new(); self.width];
        for (value, &pos) in fields.into_iter().zip(self.positions.iter()) {
            row[pos] = value;
        }
        row
    }
}

/// Exclusive or shared advisory lock on `<ledger>.lock`, released on drop.
pub struct LedgerLock {
    _file: File,
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

pub(super) fn lock(path: &Path, exclusive: bool) -> AppResult<LedgerLock> {
    let lock_path = lock_path(path);
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;

    if exclusive {
        file.lock()?;
    } else {
        file.lock_shared()?;
    }
    Ok(LedgerLock { _file: file })
}

pub(super) fn read_events(path: &Path) -> AppResult<(Vec<CheckinEvent>, Layout)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Fields)
        .from_path(path)?;

    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
    let column = |aliases: &[&str]| {
        find_column(&headers, aliases).ok_or_else(|| {
            AppError::MalformedLedger(format!(
                "{}: missing column '{}'",
                path.display(),
                aliases[0]
            ))
        })
    };

    let layout = Layout {
        width: headers.len(),
        positions: [
            column(ID_ALIASES)?,
            column(NAME_ALIASES)?,
            column(DEPARTMENT_ALIASES)?,
            column(TIMESTAMP_ALIASES)?,
            column(STATUS_ALIASES)?,
        ],
    };
    let [id_col, name_col, dept_col, ts_col, status_col] = layout.positions;

    let mut events = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = i + 2;
        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let raw_ts = cell(ts_col);
        let timestamp = parse_timestamp(&raw_ts).ok_or_else(|| {
            AppError::MalformedLedger(format!("line {line}: invalid timestamp '{raw_ts}'"))
        })?;

        let raw_status = cell(status_col);
        let status = CheckinStatus::from_label(&raw_status)
            .filter(|s| s.is_submittable())
            .ok_or_else(|| {
                AppError::MalformedLedger(format!("line {line}: invalid status '{raw_status}'"))
            })?;

        events.push(CheckinEvent {
            employee_id: cell(id_col),
            name: cell(name_col),
            department: cell(dept_col),
            timestamp,
            status,
        });
    }

    Ok((events, layout))
}

/// Append one record in the column order of `layout`, writing the canonical
/// header first when the file is new. The data is flushed and synced before
/// returning.
pub(super) fn append_event(path: &Path, event: &CheckinEvent, layout: &Layout) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);

    let row = if needs_header {
        wtr.write_record(LEDGER_HEADERS)?;
        Layout::canonical().row(event)
    } else {
        layout.row(event)
    };

    wtr.write_record(&row)?;
    wtr.flush()?;

    let file = wtr
        .into_inner()
        .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))?;
    file.sync_data()?;

    Ok(())
}
