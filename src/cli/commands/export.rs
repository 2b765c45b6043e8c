use crate::audit;
use crate::cli::commands::current_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::{ExportLogic, ExportRequest};
use crate::errors::AppResult;
use crate::store::Store;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        department,
        format,
        file,
        latest,
        force,
    } = cmd
    {
        let session = current_session(cfg)?;
        let store = Store::from_config(cfg)?;

        let req = ExportRequest {
            department: department.clone(),
            format: *format,
            latest_only: *latest,
        };

        let path = ExportLogic::export_to_file(&store, &session, &req, file.as_deref(), *force)?;

        audit::record(
            Path::new(&cfg.audit_file),
            "export",
            department.as_deref().unwrap_or("*"),
            &path.display().to_string(),
        );
    }
    Ok(())
}
