//! HTTP front-end.
//!
//! Thin actix-web layer over [`Store`]: every handler resolves the session
//! from the request, calls the same core logic as the CLI and maps
//! [`AppError`](crate::errors::AppError) onto a status code with a short
//! upper-case body.

mod auth;
pub mod routes;

pub use auth::{SESSION_COOKIE, error_response, session_from_request};

use crate::config::Config;
use crate::core::session::SessionKeys;
use crate::errors::AppResult;
use crate::store::Store;
use actix_web::{App, HttpServer, middleware, web};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Shared state handed to every handler.
pub struct AppState {
    pub store: Store,
    pub keys: SessionKeys,
    pub audit_file: PathBuf,
}

impl AppState {
    pub fn new(store: Store, keys: SessionKeys, audit_file: PathBuf) -> Self {
        Self {
            store,
            keys,
            audit_file,
        }
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Ok(Self::new(
            Store::from_config(cfg)?,
            SessionKeys::from_config(cfg)?,
            PathBuf::from(&cfg.audit_file),
        ))
    }
}

/// `RUST_LOG` wins; `info` otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Run the HTTP server until it is stopped.
pub fn serve(cfg: Config) -> AppResult<()> {
    init_tracing();

    let state = web::Data::new(AppState::from_config(&cfg)?);
    let bind = (cfg.bind_address.clone(), cfg.port);

    info!(address = %bind.0, port = bind.1, "starting kiemke server");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(middleware::Logger::default())
                .configure(routes::configure)
        })
        .bind(bind)?
        .run()
        .await
    })?;

    Ok(())
}
