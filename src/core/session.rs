//! Signed session tokens.
//!
//! A session is an HS256 JSON Web Token carrying the employee id, display
//! name and role. The CLI keeps it in the session file, the HTTP server in a
//! cookie or bearer header.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::Role;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const ISSUER: &str = "kiemke";

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    name: String,
    role: Role,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub employee_id: String,
    pub name: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::AdminRequired)
        }
    }
}

/// Issues and verifies session tokens with the configured secret.
#[derive(Clone)]
pub struct SessionKeys {
    secret: Vec<u8>,
    ttl_hours: i64,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl_hours: ttl_hours.max(1),
        }
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Ok(Self::new(cfg.require_secret()?, cfg.session_ttl_hours))
    }

    pub fn issue(&self, session: &Session) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: session.employee_id.clone(),
            name: session.name.clone(),
            role: session.role,
            iss: ISSUER.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_hours.saturating_mul(3600)),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )?;
        Ok(token)
    }

    /// Any invalid, expired or foreign token is reported as a missing session.
    pub fn verify(&self, token: &str) -> AppResult<Session> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let data = decode::<SessionClaims>(
            token.trim(),
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(|_| AppError::SessionMissing)?;

        Ok(Session {
            employee_id: data.claims.sub,
            name: data.claims.name,
            role: data.claims.role,
        })
    }

    /// Verify an optional token, treating `None` as a missing session.
    pub fn authorize(&self, token: Option<&str>) -> AppResult<Session> {
        match token {
            Some(t) if !t.trim().is_empty() => self.verify(t),
            _ => Err(AppError::SessionMissing),
        }
    }
}

/// Read the CLI session token, if any.
pub fn read_token_file(path: &Path) -> AppResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let token = fs::read_to_string(path)?;
    Ok(Some(token.trim().to_string()))
}

pub fn write_token_file(path: &Path, token: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, token)?;
    Ok(())
}

/// Remove the CLI session token. Returns whether a session existed.
pub fn clear_token_file(path: &Path) -> AppResult<bool> {
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}
