// src/export/excel_date.rs

use chrono::{NaiveDate, NaiveDateTime};

/// Number format applied to timestamp cells.
pub(crate) const TIMESTAMP_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Convert a timestamp into an Excel serial date (days since 1899-12-30).
pub(crate) fn to_excel_serial(dt: &NaiveDateTime) -> Option<f64> {
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;

    let duration = *dt - excel_epoch;

    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86400) as f64;

    Some(days + secs / 86400.0)
}
