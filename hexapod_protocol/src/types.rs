// Value types carried by a telemetry record.
//
// `Vec3` and `Rotation` are lightweight copy types shared by the record
// codec (`record.rs`) and the ingestion server (`hexapod_ingest`). They are
// deliberately plain — no vector math, since the ingest side only stores
// and hands them to the consuming rig. Rotation components follow the
// pitch/yaw/roll convention of the animation rig that consumes them.

use serde::{Deserialize, Serialize};

/// A 3-component velocity vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A pitch/yaw/roll rotation. Angular units are whatever the sender uses
/// (degrees by convention); the wire format does not interpret them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotation {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}
