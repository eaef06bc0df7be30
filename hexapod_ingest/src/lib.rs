// hexapod_ingest — single-client TCP ingestion server for hexapod telemetry.
//
// This crate receives the velocity/rotation stream that drives the hexapod
// rig. A remote sender connects over TCP and streams fixed 24-byte records
// (see `hexapod_protocol`); the server decodes each record and exposes the
// last-known values to a host that polls them once per animation tick.
//
// Module overview:
// - `server.rs`:  `TelemetryServer` — connection lifecycle, the per-tick
//                 receive pump, and the last-decoded record. Entirely
//                 tick-driven and non-blocking; the host's frame loop is
//                 the scheduler.
// - `client.rs`:  `TelemetrySender` — the producing side, used by
//                 integration tests and Rust-side producers.
// - `error.rs`:   `IngestError` for the fallible setup and sender paths.
//
// Dependencies: `hexapod_protocol` (record codec), `socket2` (listener
// setup — SO_REUSEADDR and a fixed backlog, which `std::net` cannot
// express), `tracing` for diagnostics.
//
// The server can run standalone (`main.rs`, the `ingest` binary) or be
// embedded and ticked by a host process via the library API.

pub mod client;
pub mod error;
pub mod server;

pub use client::TelemetrySender;
pub use error::IngestError;
pub use server::{IngestConfig, TelemetryServer};
