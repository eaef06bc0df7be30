// Fixed-size telemetry record codec.
//
// The wire format is a bare 24-byte record with no framing: six
// little-endian IEEE-754 `f32` values at byte offsets 0,4,8,12,16,20, in
// order `velocity.x, velocity.y, velocity.z, rotation.pitch, rotation.yaw,
// rotation.roll`. This exact layout is the interoperability contract with
// existing senders and is preserved bit for bit — `decode` and `encode`
// round-trip every bit pattern, including negative zero, infinities, and
// NaN payloads.
//
// `decode` refuses inputs shorter than `RECORD_SIZE` and ignores anything
// past the first 24 bytes. The server's receive pump performs its own
// length checks and decides what to do with surplus bytes; the check here
// is independent so the codec is safe to call from any context.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Rotation, Vec3};

/// Size of one telemetry record on the wire, in bytes.
pub const RECORD_SIZE: usize = 24;

/// One decoded telemetry record: a velocity vector and a rotation. `Default`
/// is the zeroed record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub velocity: Vec3,
    pub rotation: Rotation,
}

impl TelemetryRecord {
    #[must_use]
    pub const fn new(velocity: Vec3, rotation: Rotation) -> Self {
        Self { velocity, rotation }
    }
}

/// Decode failure: the input did not contain a whole record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer than `RECORD_SIZE` bytes were supplied.
    #[error("truncated telemetry record: {len} bytes (need {RECORD_SIZE})")]
    Truncated { len: usize },
}

/// Decode the first `RECORD_SIZE` bytes of `bytes` into a record.
///
/// Fails without partial output if `bytes` is shorter than one record.
/// Surplus bytes are ignored here; callers that care about them (the
/// receive pump does) check the length themselves.
pub fn decode(bytes: &[u8]) -> Result<TelemetryRecord, DecodeError> {
    if bytes.len() < RECORD_SIZE {
        return Err(DecodeError::Truncated { len: bytes.len() });
    }
    let field = |offset: usize| {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[offset..offset + 4]);
        f32::from_le_bytes(raw)
    };
    Ok(TelemetryRecord {
        velocity: Vec3::new(field(0), field(4), field(8)),
        rotation: Rotation::new(field(12), field(16), field(20)),
    })
}

/// Encode a record into its 24-byte wire form, the exact inverse of
/// `decode`.
#[must_use]
pub fn encode(record: &TelemetryRecord) -> [u8; RECORD_SIZE] {
    let fields = [
        record.velocity.x,
        record.velocity.y,
        record.velocity.z,
        record.rotation.pitch,
        record.rotation.yaw,
        record.rotation.roll,
    ];
    let mut buf = [0u8; RECORD_SIZE];
    for (chunk, value) in buf.chunks_exact_mut(4).zip(fields) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    buf
}
