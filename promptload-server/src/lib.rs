//! Dashboard and live-update HTTP surface
//!
//! Serves the embedded monitoring page, JSON history endpoints backed by
//! the metrics database, and a server-sent-events stream fed by the live
//! event broadcaster. The server is read-only: benchmark control stays on
//! the command line.

mod app;
mod error;
mod live;

pub use app::{router, serve, AppState};
pub use error::ApiError;
