// hexapod_protocol — wire contract for hexapod telemetry ingestion.
//
// This crate defines the value types and the fixed-size binary codec used
// by the ingestion server (`hexapod_ingest`) and telemetry senders to
// exchange velocity/rotation records over TCP. It is pure byte-to-value
// conversion — no I/O, no socket types — so both sides and any test can
// depend on it freely.
//
// Module overview:
// - `types.rs`:   `Vec3` and `Rotation`, the two decoded value types.
// - `record.rs`:  `TelemetryRecord` plus `encode`/`decode` for the 24-byte
//                 wire form: six little-endian `f32`, no framing.
//
// Design decisions:
// - **Raw binary, not serde, on the wire.** The 24-byte layout predates
//   this implementation and is fixed for interoperability with existing
//   senders. Serde derives on the types are for consumers that want to
//   re-serialize decoded records (configs, logs, host bridges), never for
//   the socket.
// - **Decoder never reads past 24 bytes.** Surplus handling is a server
//   policy decision, kept out of the codec.

pub mod record;
pub mod types;

pub use record::{DecodeError, RECORD_SIZE, TelemetryRecord, decode, encode};
pub use types::{Rotation, Vec3};
