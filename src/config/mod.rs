use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable overriding the listening port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding the session signing secret.
pub const ENV_SESSION_SECRET: &str = "KIEMKE_SESSION_SECRET";

const ROSTER_FILE: &str = "roster.csv";
const LEDGER_FILE: &str = "checkin.csv";
const AUDIT_FILE: &str = "kiemke.log";
const SESSION_FILE: &str = "session.token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub roster_file: String,
    pub ledger_file: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
    #[serde(default = "default_session_file")]
    pub session_file: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub session_secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,
}

fn default_audit_file() -> String {
    Config::data_file(AUDIT_FILE)
}
fn default_session_file() -> String {
    Config::data_file(SESSION_FILE)
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    10000
}
fn default_session_ttl() -> i64 {
    12
}

impl Default for Config {
    fn default() -> Self {
        Self::in_dir(&Self::config_dir())
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("kiemke")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".kiemke")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("kiemke.conf")
    }

    fn data_file(name: &str) -> String {
        Self::config_dir().join(name).to_string_lossy().to_string()
    }

    /// Defaults with every data file placed inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let file = |name: &str| dir.join(name).to_string_lossy().to_string();
        Self {
            roster_file: file(ROSTER_FILE),
            ledger_file: file(LEDGER_FILE),
            audit_file: file(AUDIT_FILE),
            session_file: file(SESSION_FILE),
            bind_address: default_bind_address(),
            port: default_port(),
            session_secret: String::new(),
            session_ttl_hours: default_session_ttl(),
        }
    }

    /// Move roster, ledger, audit and session files into `dir`.
    pub fn relocate(&mut self, dir: &str) {
        let dir = expand_tilde(dir);
        let relocated = Self::in_dir(&dir);
        self.roster_file = relocated.roster_file;
        self.ledger_file = relocated.ledger_file;
        self.audit_file = relocated.audit_file;
        self.session_file = relocated.session_file;
    }

    /// Load configuration from file, or return defaults if not found.
    /// Environment overrides are applied last.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                AppError::Config(format!("failed to parse {}: {e}", path.display()))
            })?
        } else {
            Config::default()
        };

        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(port) = env::var(ENV_PORT)
            && let Ok(p) = port.trim().parse::<u16>()
        {
            self.port = p;
        }
        if let Ok(secret) = env::var(ENV_SESSION_SECRET)
            && !secret.trim().is_empty()
        {
            self.session_secret = secret;
        }
    }

    /// The secret used to sign session tokens. It must be configured.
    pub fn require_secret(&self) -> AppResult<&str> {
        if self.session_secret.trim().is_empty() {
            return Err(AppError::Config(format!(
                "session_secret is not set: add it to {} or export {ENV_SESSION_SECRET}",
                Self::config_file().display()
            )));
        }
        Ok(&self.session_secret)
    }

    /// Initialize the configuration file and the data directory.
    pub fn init_all(data_dir: Option<&str>, secret: Option<&str>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let mut config = Config::default();
        if let Some(d) = data_dir {
            config.relocate(d);
        }
        if let Some(s) = secret {
            config.session_secret = s.to_string();
        }

        if let Some(parent) = Path::new(&config.ledger_file).parent() {
            fs::create_dir_all(parent)?;
        }

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(config)
    }
}
