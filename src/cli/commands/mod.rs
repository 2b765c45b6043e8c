pub mod checkin;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod init;
pub mod log;
pub mod login;
pub mod roster;
pub mod serve;

use crate::config::Config;
use crate::core::session::{Session, SessionKeys, read_token_file};
use crate::errors::AppResult;
use std::path::Path;

/// Session of the CLI user, read from the session file.
pub(crate) fn current_session(cfg: &Config) -> AppResult<Session> {
    let keys = SessionKeys::from_config(cfg)?;
    let token = read_token_file(Path::new(&cfg.session_file))?;
    keys.authorize(token.as_deref())
}
