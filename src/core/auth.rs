use crate::core::session::{Session, SessionKeys};
use crate::errors::{AppError, AppResult};
use crate::store::Store;
use tracing::{info, warn};

pub struct AuthLogic;

impl AuthLogic {
    /// Match (id, password) against the current roster.
    ///
    /// The error never tells which of the two fields was wrong.
    pub fn authenticate(store: &Store, id: &str, password: &str) -> AppResult<Session> {
        let roster = store.roster()?;

        match roster.authenticate(id, password) {
            Some(employee) => {
                info!(employee = %employee.id, role = employee.role.as_str(), "login");
                Ok(Session {
                    employee_id: employee.id.clone(),
                    name: employee.name.clone(),
                    role: employee.role,
                })
            }
            None => {
                warn!(employee = %id.trim(), "login rejected");
                Err(AppError::AuthenticationFailed)
            }
        }
    }

    /// Authenticate and issue a signed token for the new session.
    pub fn login(
        store: &Store,
        keys: &SessionKeys,
        id: &str,
        password: &str,
    ) -> AppResult<(Session, String)> {
        let session = Self::authenticate(store, id, password)?;
        let token = keys.issue(&session)?;
        Ok((session, token))
    }

    /// Re-resolve a session against the current roster.
    ///
    /// Name and role follow the roster rather than the token, and an
    /// identity no longer on the roster has no session.
    pub fn current(store: &Store, session: &Session) -> AppResult<Session> {
        let roster = store.roster()?;
        let employee = roster.find(&session.employee_id).ok_or_else(|| {
            warn!(employee = %session.employee_id, "session of an employee no longer on the roster");
            AppError::SessionMissing
        })?;

        Ok(Session {
            employee_id: employee.id.clone(),
            name: employee.name.clone(),
            role: employee.role,
        })
    }

    /// Admin check against the current roster, not the role in the token.
    pub fn require_admin(store: &Store, session: &Session) -> AppResult<Session> {
        let current = Self::current(store, session)?;
        current.require_admin()?;
        Ok(current)
    }
}
