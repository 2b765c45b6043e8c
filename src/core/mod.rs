pub mod aggregate;
pub mod auth;
pub mod checkin;
pub mod export;
pub mod log;
pub mod session;
