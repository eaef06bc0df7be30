// Error types for the ingestion crate.
//
// Only setup (`start`) and the sender paths are fallible to callers. The
// per-tick receive pump never returns an error — every I/O outcome there is
// handled locally (see `server.rs`).

use std::io;

use thiserror::Error;

/// Errors surfaced by `TelemetryServer::start` and `TelemetrySender`.
#[derive(Debug, Error)]
pub enum IngestError {
    /// `start()` was called while the server is already listening.
    #[error("server is already listening")]
    AlreadyRunning,

    /// Creating, binding, or listening on the server socket failed.
    #[error("failed to listen on port {port}: {source}")]
    Bind { port: u16, source: io::Error },

    /// Socket I/O error on a sender path.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
