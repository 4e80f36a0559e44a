use glam::{EulerRot, Quat, Vec3};

use crate::error::{CamlinkError, CamlinkResult};

/// Playback time in seconds, the unit the replay service speaks.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Seconds(pub f64);

impl Seconds {
    pub const ZERO: Seconds = Seconds(0.0);
}

/// Sampler tick rate in Hz. Bounded like the host panel's spinbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TickRate(u32);

impl TickRate {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 200;

    pub fn new(hz: u32) -> CamlinkResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&hz) {
            return Err(CamlinkError::validation(format!(
                "tick rate must be within {}..={} Hz, got {hz}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(hz))
    }

    pub fn hz(self) -> u32 {
        self.0
    }

    pub fn interval(self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.0))
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self(60)
    }
}

/// Camera pose in the replay service's coordinate convention:
/// mirrored X, rotation as Z-X-Y Euler degrees with the fixed axis remap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation_deg: Vec3,
}

impl CameraPose {
    pub fn from_host(position: Vec3, rotation: Quat) -> Self {
        let (z, x, y) = rotation.to_euler(EulerRot::ZXY);
        Self {
            position: replay_position(position),
            rotation_deg: replay_rotation_deg(x.to_degrees(), y.to_degrees(), z.to_degrees()),
        }
    }
}

/// The in-game map mirrors the host's X axis.
pub fn replay_position(p: Vec3) -> Vec3 {
    Vec3::new(-p.x, p.y, p.z)
}

/// Fixed, empirically calibrated remap between the two applications'
/// camera conventions. Inputs are Z-X-Y Euler angles in degrees.
pub fn replay_rotation_deg(x_deg: f32, y_deg: f32, z_deg: f32) -> Vec3 {
    Vec3::new(-(y_deg + 180.0), -x_deg, z_deg)
}
