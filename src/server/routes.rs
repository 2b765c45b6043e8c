use crate::audit;
use crate::core::aggregate::{AggregateLogic, overall};
use crate::core::auth::AuthLogic;
use crate::core::checkin::{CheckinLogic, EmployeeStatus, parse_submission};
use crate::core::export::{ExportLogic, ExportRequest};
use crate::errors::AppError;
use crate::export::ExportFormat;
use crate::models::{CheckinEvent, DepartmentStat};
use crate::roster::ingest::RosterFormat;
use crate::server::{AppState, SESSION_COOKIE, error_response, session_from_request};
use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Field names of the legacy login form are accepted as well.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(alias = "ma_nv")]
    pub id: String,
    #[serde(alias = "mat_khau")]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub employee_id: String,
    pub name: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct CheckinForm {
    #[serde(alias = "trang_thai")]
    pub status: String,
}

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
    pub latest: Option<bool>,
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardResponse {
    Admin {
        departments: Vec<DepartmentStat>,
        total: DepartmentStat,
    },
    User {
        status: EmployeeStatus,
    },
}

#[derive(Serialize)]
pub struct RosterResponse {
    pub employees: usize,
    pub departments: usize,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(dashboard)
        .service(my_status)
        .service(checkin)
        .service(export_department)
        .service(export_all)
        .service(upload_roster);
}

#[post("/login")]
pub async fn login(state: web::Data<AppState>, form: web::Form<LoginForm>) -> HttpResponse {
    let form = form.into_inner();

    match AuthLogic::login(&state.store, &state.keys, &form.id, &form.password) {
        Ok((session, token)) => {
            audit::record(
                &state.audit_file,
                "login",
                &session.employee_id,
                session.role.as_str(),
            );
            let cookie = Cookie::build(SESSION_COOKIE, token.clone())
                .path("/")
                .http_only(true)
                .finish();
            HttpResponse::Ok().cookie(cookie).json(LoginResponse {
                token,
                employee_id: session.employee_id,
                name: session.name,
                role: session.role.as_str().to_string(),
            })
        }
        Err(e) => {
            audit::record(&state.audit_file, "login_failed", form.id.trim(), "");
            error_response(&e)
        }
    }
}

#[get("/logout")]
pub async fn logout() -> HttpResponse {
    let mut res = HttpResponse::Ok().body("LOGGED_OUT");
    if let Err(e) = res.add_removal_cookie(&Cookie::build(SESSION_COOKIE, "").path("/").finish()) {
        warn!(error = %e, "could not clear the session cookie");
    }
    res
}

#[get("/dashboard")]
pub async fn dashboard(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let session = match session_from_request(&req, &state.keys)
        .and_then(|s| AuthLogic::current(&state.store, &s))
    {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };

    let body = if session.is_admin() {
        AggregateLogic::dashboard(&state.store, &session).map(|departments| {
            let total = overall(&departments);
            DashboardResponse::Admin { departments, total }
        })
    } else {
        CheckinLogic::status_of(&state.store, &session).map(|status| DashboardResponse::User { status })
    };

    match body {
        Ok(b) => HttpResponse::Ok().json(b),
        Err(e) => error_response(&e),
    }
}

#[get("/status")]
pub async fn my_status(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let result = session_from_request(&req, &state.keys)
        .and_then(|session| CheckinLogic::status_of(&state.store, &session));

    match result {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(&e),
    }
}

#[post("/checkin")]
pub async fn checkin(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<CheckinForm>,
) -> HttpResponse {
    let session = match session_from_request(&req, &state.keys) {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };

    let result: Result<CheckinEvent, AppError> = parse_submission(&form.status)
        .and_then(|status| CheckinLogic::submit(&state.store, &session, status));

    match result {
        Ok(event) => {
            audit::record(
                &state.audit_file,
                "checkin",
                &event.employee_id,
                event.status.as_str(),
            );
            HttpResponse::Created().json(event)
        }
        Err(e) => {
            if matches!(e, AppError::TerminalStateViolation(_)) {
                audit::record(
                    &state.audit_file,
                    "checkin_rejected",
                    &session.employee_id,
                    form.status.trim(),
                );
            }
            error_response(&e)
        }
    }
}

#[get("/export/{department}")]
pub async fn export_department(
    state: web::Data<AppState>,
    req: HttpRequest,
    department: web::Path<String>,
    query: web::Query<ExportQuery>,
) -> HttpResponse {
    export(&state, &req, Some(department.into_inner()), &query)
}

#[get("/export_all")]
pub async fn export_all(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ExportQuery>,
) -> HttpResponse {
    export(&state, &req, None, &query)
}

fn export(
    state: &AppState,
    req: &HttpRequest,
    department: Option<String>,
    query: &ExportQuery,
) -> HttpResponse {
    let result = session_from_request(req, &state.keys).and_then(|session| {
        let format = ExportFormat::parse(query.format.as_deref().unwrap_or("csv"))?;
        let request = ExportRequest {
            department: department.clone(),
            format,
            latest_only: query.latest.unwrap_or(false),
        };
        ExportLogic::build(&state.store, &session, &request)
    });

    match result {
        Ok(output) => {
            audit::record(
                &state.audit_file,
                "export",
                department.as_deref().unwrap_or("*"),
                &output.file_name,
            );
            HttpResponse::Ok()
                .content_type(output.format.content_type())
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", output.file_name),
                ))
                .body(output.bytes)
        }
        Err(e) => error_response(&e),
    }
}

#[post("/roster")]
pub async fn upload_roster(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let session = match session_from_request(&req, &state.keys) {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let session = match AuthLogic::require_admin(&state.store, &session) {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let format = RosterFormat::detect(content_type, &body);

    match state.store.import_roster_as(&body, format) {
        Ok(roster) => {
            audit::record(
                &state.audit_file,
                "roster_import",
                &session.employee_id,
                &format!("{} employees uploaded", roster.len()),
            );
            HttpResponse::Ok().json(RosterResponse {
                employees: roster.len(),
                departments: roster.departments().len(),
            })
        }
        Err(e) => error_response(&e),
    }
}
