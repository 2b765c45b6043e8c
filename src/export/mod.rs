// src/export/mod.rs

mod excel_date;
pub(crate) mod fs_utils;
mod json_csv;
mod model;
mod xlsx;

pub use model::CheckinExport;

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message for exports.
pub(crate) fn notify_export_success(label: &str, rows: usize, path: &Path) {
    success(format!(
        "{label} export completed ({rows} rows): {}",
        path.display()
    ));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(AppError::InvalidExportFormat(other.to_string())),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
            ExportFormat::Xlsx => "XLSX",
        }
    }
}

/// Render rows in the requested format.
pub fn render(rows: &[CheckinExport], format: ExportFormat, title: &str) -> AppResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => json_csv::render_csv(rows),
        ExportFormat::Json => json_csv::render_json(rows),
        ExportFormat::Xlsx => xlsx::render_xlsx(rows, title),
    }
}
