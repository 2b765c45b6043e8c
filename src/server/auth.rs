use crate::core::session::{Session, SessionKeys};
use crate::errors::{AppError, AppResult};
use actix_web::{HttpRequest, HttpResponse, http::header};
use tracing::error;

/// Cookie holding the session token.
pub const SESSION_COOKIE: &str = "kiemke_session";

/// Session from the `kiemke_session` cookie or an `Authorization: Bearer` header.
pub fn session_from_request(req: &HttpRequest, keys: &SessionKeys) -> AppResult<Session> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return keys.authorize(Some(cookie.value()));
    }

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    keys.authorize(bearer)
}

pub fn error_response(e: &AppError) -> HttpResponse {
    match e {
        AppError::AuthenticationFailed => {
            HttpResponse::Unauthorized().body("AUTHENTICATION_FAILED")
        }
        AppError::SessionMissing => HttpResponse::Unauthorized().body("SESSION_MISSING"),
        AppError::AdminRequired => HttpResponse::Forbidden().body("ADMIN_REQUIRED"),
        AppError::TerminalStateViolation(_) => HttpResponse::Conflict().body("TERMINAL_STATE"),
        AppError::InvalidStatus(_) => HttpResponse::BadRequest().body("INVALID_STATUS"),
        AppError::UnknownEmployee(_) => HttpResponse::Forbidden().body("UNKNOWN_EMPLOYEE"),
        AppError::EmptyLedger | AppError::NoMatchingRecords(_) => {
            HttpResponse::NotFound().body("NO_DATA")
        }
        AppError::MalformedRoster(msg) => {
            HttpResponse::BadRequest().body(format!("MALFORMED_ROSTER: {msg}"))
        }
        AppError::InvalidExportFormat(_) => HttpResponse::BadRequest().body("INVALID_FORMAT"),
        other => {
            error!(error = %other, "request failed");
            HttpResponse::InternalServerError().body("INTERNAL_ERROR")
        }
    }
}
