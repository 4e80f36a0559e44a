use std::collections::BTreeMap;

use glam::{Quat, Vec3};

use crate::{
    core::Seconds,
    error::{CamlinkError, CamlinkResult},
};

/// Authored-attribute clamp ranges, mirroring the host rig's attribute
/// min/max settings.
pub const DIST_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1000.0;
pub const FOV_RANGE: std::ops::RangeInclusive<f32> = 0.0..=180.0;

/// Scene document: the stand-in for the host application's scene graph,
/// persisted as JSON.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub cameras: BTreeMap<String, CameraNode>, // stable keys
    #[serde(default)]
    pub timeline: TimelineState,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CameraNode {
    pub position: Vec3,
    pub rotation: Quat,
    /// Present only on cameras carrying the DoF attribute schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rig: Option<DofRig>,
}

/// The seven float attributes of the DoF rig schema.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DofRig {
    pub focal_point: f32,
    pub width: f32,
    pub near: f32,
    pub far: f32,
    pub old_width: f32,
    pub old_mid: f32,
    pub fov: f32,
}

impl Default for DofRig {
    fn default() -> Self {
        Self {
            focal_point: 200.0,
            width: 200.0,
            near: 400.0,
            far: 0.0,
            old_width: 200.0,
            old_mid: 200.0,
            fov: 40.0,
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct TimelineState {
    pub current: Seconds,
    pub max: Seconds,
    pub playing: bool,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            current: Seconds::ZERO,
            max: Seconds(60.0),
            playing: false,
        }
    }
}

impl Scene {
    pub fn validate(&self) -> CamlinkResult<()> {
        for (name, cam) in &self.cameras {
            if name.trim().is_empty() {
                return Err(CamlinkError::validation("camera name must be non-empty"));
            }
            if !cam.position.is_finite() {
                return Err(CamlinkError::validation(format!(
                    "camera '{name}' has a non-finite position"
                )));
            }
            if !cam.rotation.is_finite() {
                return Err(CamlinkError::validation(format!(
                    "camera '{name}' has a non-finite rotation"
                )));
            }
            if let Some(rig) = &cam.rig {
                rig.validate(name)?;
            }
        }
        if self.timeline.max.0 < 0.0 {
            return Err(CamlinkError::validation("timeline max must be >= 0"));
        }
        if self.timeline.current.0 < 0.0 || self.timeline.current.0 > self.timeline.max.0 {
            return Err(CamlinkError::validation(
                "timeline position must lie within 0..=max",
            ));
        }
        Ok(())
    }
}

impl DofRig {
    pub fn validate(&self, camera: &str) -> CamlinkResult<()> {
        let distances = [
            ("focal_point", self.focal_point),
            ("width", self.width),
            ("near", self.near),
            ("far", self.far),
            ("old_width", self.old_width),
            ("old_mid", self.old_mid),
        ];
        for (attr, value) in distances {
            if !DIST_RANGE.contains(&value) {
                return Err(CamlinkError::validation(format!(
                    "camera '{camera}' rig attribute '{attr}' out of range 0..=1000: {value}"
                )));
            }
        }
        if !FOV_RANGE.contains(&self.fov) {
            return Err(CamlinkError::validation(format!(
                "camera '{camera}' rig attribute 'fov' out of range 0..=180: {}",
                self.fov
            )));
        }
        Ok(())
    }
}
