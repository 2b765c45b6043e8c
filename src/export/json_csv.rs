// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::CheckinExport;
use crate::export::model::{export_to_row, get_headers};

/// UTF-8 byte order mark; spreadsheet tools need it to read non-ASCII names.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Render rows as pretty-printed JSON.
pub(crate) fn render_json(rows: &[CheckinExport]) -> AppResult<Vec<u8>> {
    serde_json::to_vec_pretty(rows)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))
}

/// Render rows as CSV with a header line, prefixed by a UTF-8 BOM.
pub(crate) fn render_csv(rows: &[CheckinExport]) -> AppResult<Vec<u8>> {
    let mut buf = UTF8_BOM.to_vec();

    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(get_headers())
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;

        for item in rows {
            wtr.write_record(export_to_row(item))
                .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
        }

        wtr.flush()
            .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))?;
    }

    Ok(buf)
}
