//! Shared application state: the current roster and the check-in ledger.
//!
//! Every front-end (CLI command, HTTP handler) receives a `&Store` instead of
//! touching files directly. The roster is swapped as a whole under a
//! `RwLock<Arc<_>>`, so readers keep the snapshot they started with; ledger
//! writes are serialized by a `Mutex` held across read-check-append-persist,
//! and by an advisory file lock against other processes using the same files.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ledger::{Ledger, LedgerLock};
use crate::roster::Roster;
use crate::roster::ingest::{RosterFormat, load_roster_file, parse_roster_as, save_roster_file};
use crate::utils::path::{FileStamp, file_stamp};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::{info, warn};

pub struct Store {
    roster_path: PathBuf,
    roster: RwLock<Arc<Roster>>,
    roster_stamp: Mutex<Option<FileStamp>>,
    ledger: Mutex<Ledger>,
}

fn poisoned(what: &str) -> AppError {
    AppError::Other(format!("{what} lock poisoned"))
}

impl Store {
    /// Open the roster and ledger files.
    /// Missing files start out as an empty roster / empty ledger.
    pub fn open(roster_path: &Path, ledger_path: &Path) -> AppResult<Self> {
        let roster_stamp = file_stamp(roster_path)?;
        let roster = if roster_stamp.is_some() {
            load_roster_file(roster_path)?
        } else {
            Roster::default()
        };
        let ledger = Ledger::open(ledger_path)?;

        info!(
            employees = roster.len(),
            events = ledger.len(),
            "store opened"
        );

        Ok(Self {
            roster_path: roster_path.to_path_buf(),
            roster: RwLock::new(Arc::new(roster)),
            roster_stamp: Mutex::new(roster_stamp),
            ledger: Mutex::new(ledger),
        })
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Self::open(Path::new(&cfg.roster_file), Path::new(&cfg.ledger_file))
    }

    /// Snapshot of the current roster.
    ///
    /// A roster file replaced by another process is picked up here; if it
    /// cannot be parsed the roster in memory stays.
    pub fn roster(&self) -> AppResult<Arc<Roster>> {
        self.refresh_roster()?;
        self.roster
            .read()
            .map(|r| Arc::clone(&r))
            .map_err(|_| poisoned("roster"))
    }

    fn refresh_roster(&self) -> AppResult<()> {
        let mut seen = self.roster_stamp.lock().map_err(|_| poisoned("roster"))?;
        let stamp = file_stamp(&self.roster_path)?;
        if stamp.is_none() || stamp == *seen {
            return Ok(());
        }

        match load_roster_file(&self.roster_path) {
            Ok(roster) => {
                info!(employees = roster.len(), "roster file changed, reloaded");
                self.swap_roster(Arc::new(roster))?;
            }
            Err(e) => {
                warn!(error = %e, "roster file changed but could not be loaded, keeping current roster");
            }
        }
        *seen = stamp;
        Ok(())
    }

    fn swap_roster(&self, next: Arc<Roster>) -> AppResult<()> {
        let mut guard = self.roster.write().map_err(|_| poisoned("roster"))?;
        *guard = next;
        Ok(())
    }

    /// Whether a roster has ever been imported.
    pub fn has_roster_file(&self) -> bool {
        self.roster_path.exists()
    }

    pub fn roster_path(&self) -> &Path {
        &self.roster_path
    }

    /// Save `roster` to disk and make it the current roster.
    /// If saving fails the previous roster stays in place.
    pub fn replace_roster(&self, roster: Roster) -> AppResult<Arc<Roster>> {
        let mut seen = self.roster_stamp.lock().map_err(|_| poisoned("roster"))?;
        save_roster_file(&roster, &self.roster_path)?;

        let next = Arc::new(roster);
        self.swap_roster(Arc::clone(&next))?;
        *seen = file_stamp(&self.roster_path).ok().flatten();

        info!(employees = next.len(), "roster replaced");
        Ok(next)
    }

    /// Parse an uploaded CSV roster and swap it in.
    /// A malformed upload is rejected and leaves the current roster untouched.
    pub fn import_roster(&self, source: &[u8]) -> AppResult<Arc<Roster>> {
        self.import_roster_as(source, RosterFormat::Csv)
    }

    /// Like [`Store::import_roster`] for a CSV or XLSX upload.
    pub fn import_roster_as(&self, source: &[u8], format: RosterFormat) -> AppResult<Arc<Roster>> {
        let roster = parse_roster_as(source, format)?;
        if roster.is_empty() {
            return Err(AppError::MalformedRoster(
                "the uploaded roster contains no employees".into(),
            ));
        }
        self.replace_roster(roster)
    }

    /// Access to the ledger, up to date with what other processes appended.
    pub fn ledger(&self) -> AppResult<MutexGuard<'_, Ledger>> {
        let mut ledger = self.ledger.lock().map_err(|_| poisoned("ledger"))?;
        {
            let _shared = ledger.lock_file(false)?;
            ledger.refresh()?;
        }
        Ok(ledger)
    }

    /// Ledger access for a read-check-append sequence.
    ///
    /// The returned file lock keeps other processes out until it is dropped;
    /// the ledger is refreshed after the lock is taken.
    pub fn ledger_for_write(&self) -> AppResult<(MutexGuard<'_, Ledger>, LedgerLock)> {
        let mut ledger = self.ledger.lock().map_err(|_| poisoned("ledger"))?;
        let lock = ledger.lock_file(true)?;
        ledger.refresh()?;
        Ok((ledger, lock))
    }
}
