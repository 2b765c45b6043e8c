//! Roster ingestion from CSV files and XLSX workbooks.
//!
//! Columns are mapped onto [`Employee`] at the boundary: header names are
//! trimmed and matched case-insensitively against a list of aliases, so a
//! missing column fails the upload before anything is replaced.

use super::Roster;
use crate::errors::{AppError, AppResult};
use crate::models::{Employee, Role};
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use csv::{ReaderBuilder, Trim, Writer};
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

const ID_ALIASES: &[&str] = &["ma_nv", "id", "employee_id"];
const NAME_ALIASES: &[&str] = &["ho_ten", "name", "display_name"];
const DEPARTMENT_ALIASES: &[&str] = &["bo_phan_kk", "department", "dept"];
const CREDENTIAL_ALIASES: &[&str] = &["mat_khau", "password", "credential"];
const ROLE_ALIASES: &[&str] = &["vai_tro", "role", "admin"];

/// Header written when a roster is saved back to disk.
const ROSTER_HEADERS: [&str; 5] = ["employee_id", "name", "department", "password", "role"];

struct ColumnMap {
    id: usize,
    name: usize,
    department: usize,
    credential: usize,
    role: Option<usize>,
}

/// Normalize a header cell: strip BOM and surrounding whitespace, lowercase.
pub(crate) fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_lowercase()
}

pub(crate) fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| aliases.contains(&h.as_str()))
}

fn map_columns(headers: &[String]) -> AppResult<ColumnMap> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let required = |aliases: &[&str], label: &str| {
        find_column(&normalized, aliases).ok_or_else(|| {
            AppError::MalformedRoster(format!(
                "missing required column '{label}' (accepted headers: {})",
                aliases.join(", ")
            ))
        })
    };

    Ok(ColumnMap {
        id: required(ID_ALIASES, "employee id")?,
        name: required(NAME_ALIASES, "name")?,
        department: required(DEPARTMENT_ALIASES, "department")?,
        credential: required(CREDENTIAL_ALIASES, "password")?,
        role: find_column(&normalized, ROLE_ALIASES),
    })
}

/// Spreadsheet format of a roster upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Csv,
    Xlsx,
}

/// Zip local file header; every `.xlsx` workbook starts with it.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

impl RosterFormat {
    /// Format implied by a file extension; anything but `.xlsx`/`.xlsm` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("xlsx") | Some("xlsm") => RosterFormat::Xlsx,
            _ => RosterFormat::Csv,
        }
    }

    /// Format of an HTTP upload: the content type when it names a
    /// spreadsheet, otherwise the leading bytes.
    pub fn detect(content_type: Option<&str>, body: &[u8]) -> Self {
        let spreadsheet = content_type
            .map(|ct| ct.contains("spreadsheetml") || ct.contains("ms-excel"))
            .unwrap_or(false);
        if spreadsheet || body.starts_with(ZIP_MAGIC) {
            RosterFormat::Xlsx
        } else {
            RosterFormat::Csv
        }
    }
}

/// Validate header and data rows into a roster.
/// `rows` yields the cells of every data row; blank rows are skipped.
fn build_roster<I>(headers: &[String], rows: I) -> AppResult<Roster>
where
    I: IntoIterator<Item = AppResult<Vec<String>>>,
{
    let cols = map_columns(headers)?;

    let mut employees = Vec::new();
    let mut seen = HashSet::new();

    for (i, record) in rows.into_iter().enumerate() {
        let row = i + 1;
        let record = record?;

        // fully blank lines exported by spreadsheet tools
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let cell = |idx: usize| {
            record
                .get(idx)
                .map(|c| c.trim().to_string())
                .unwrap_or_default()
        };

        let id = cell(cols.id);
        if id.is_empty() {
            return Err(AppError::MalformedRoster(format!(
                "row {row}: empty employee id"
            )));
        }
        if !seen.insert(id.clone()) {
            return Err(AppError::MalformedRoster(format!(
                "row {row}: duplicate employee id '{id}'"
            )));
        }

        let role = match cols.role {
            Some(idx) => {
                let raw = cell(idx);
                Role::from_cell(&raw).ok_or_else(|| {
                    AppError::MalformedRoster(format!("row {row}: unknown role '{raw}'"))
                })?
            }
            None => Role::User,
        };

        employees.push(Employee {
            id,
            name: cell(cols.name),
            department: cell(cols.department),
            credential: cell(cols.credential),
            role,
        });
    }

    Ok(Roster::new(employees))
}

/// Parse a roster from any CSV source.
pub fn parse_roster<R: Read>(source: R) -> AppResult<Roster> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Fields)
        .from_reader(source);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| AppError::MalformedRoster(format!("unreadable header row: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = rdr.records().enumerate().map(|(i, record)| {
        record
            .map(|r| r.iter().map(str::to_string).collect::<Vec<String>>())
            .map_err(|e| AppError::MalformedRoster(format!("row {}: {e}", i + 1)))
    });

    build_roster(&headers, rows)
}

/// Parse the first worksheet of an XLSX workbook.
///
/// The first non-empty row is the header. Numeric cells are read back the
/// way they display, so an id typed as `1001` stays `"1001"`.
pub fn parse_roster_xlsx(bytes: &[u8]) -> AppResult<Roster> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::MalformedRoster(format!("unreadable workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::MalformedRoster("the workbook has no worksheet".into()))?
        .map_err(|e| AppError::MalformedRoster(format!("unreadable worksheet: {e}")))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>())
        .skip_while(|row| row.iter().all(|c| c.trim().is_empty()));

    let headers = rows
        .next()
        .ok_or_else(|| AppError::MalformedRoster("the worksheet is empty".into()))?;

    build_roster(&headers, rows.map(Ok))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Parse a roster upload in the given format.
pub fn parse_roster_as(bytes: &[u8], format: RosterFormat) -> AppResult<Roster> {
    match format {
        RosterFormat::Csv => parse_roster(bytes),
        RosterFormat::Xlsx => parse_roster_xlsx(bytes),
    }
}

/// Load the saved roster, always CSV.
pub fn load_roster_file(path: &Path) -> AppResult<Roster> {
    let file = fs::File::open(path)?;
    parse_roster(file)
}

/// Write the roster in normalized form.
/// The file is written next to its destination and renamed into place.
pub fn save_roster_file(roster: &Roster, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("csv.tmp");
    {
        let mut wtr = Writer::from_path(&tmp)?;
        wtr.write_record(ROSTER_HEADERS)?;
        for e in roster.employees() {
            wtr.write_record([
                e.id.as_str(),
                e.name.as_str(),
                e.department.as_str(),
                e.credential.as_str(),
                e.role.as_str(),
            ])?;
        }
        wtr.flush()?;
    }

    fs::rename(&tmp, path)?;
    Ok(())
}
