// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::CheckinExport;
use crate::export::excel_date::{TIMESTAMP_NUM_FORMAT, to_excel_serial};
use crate::export::model::{TIMESTAMP_COLUMN, export_to_row, get_headers};
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, Worksheet};
use unicode_width::UnicodeWidthStr;

/// Render rows as an XLSX workbook with styling and auto column widths.
pub(crate) fn render_xlsx(rows: &[CheckinExport], sheet_name: &str) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sanitize_sheet_name(sheet_name))
        .map_err(to_export_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let headers = get_headers();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_export_error)?;
    }

    worksheet.set_freeze_panes(1, 0).ok();

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Rows
    // ---------------------------
    for (row_index, item) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in export_to_row(item).iter().enumerate() {
            if col == TIMESTAMP_COLUMN
                && let Some(serial) = to_excel_serial(&item.at)
            {
                write_timestamp_cell(worksheet, row, col as u16, serial, band_color)?;
            } else {
                write_text_cell(worksheet, row, col as u16, value, band_color)?;
            }

            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save_to_buffer().map_err(to_export_error)
}

fn banded(bg: Color) -> Format {
    Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

fn write_timestamp_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    serial: f64,
    bg: Color,
) -> AppResult<()> {
    let fmt = banded(bg).set_num_format(TIMESTAMP_NUM_FORMAT);
    worksheet
        .write_with_format(row, col, serial, &fmt)
        .map_err(to_export_error)?;
    Ok(())
}

/// Identifiers such as "007" must stay text, so no numeric sniffing here.
fn write_text_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    s: &str,
    bg: Color,
) -> AppResult<()> {
    worksheet
        .write_with_format(row, col, s, &banded(bg))
        .map_err(to_export_error)?;
    Ok(())
}

/// Excel sheet names: at most 31 chars, none of `[]:*?/\`.
fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Checkin".to_string()
    } else {
        cleaned
    }
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
