use glam::{Quat, Vec3};

use crate::{
    core::Seconds,
    error::{CamlinkError, CamlinkResult},
    scene::{DIST_RANGE, DofRig, FOV_RANGE, Scene},
    undo::UndoStack,
};

/// The float attributes of the DoF rig schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RigAttr {
    FocalPoint,
    Width,
    Near,
    Far,
    OldWidth,
    OldMid,
    Fov,
}

impl RigAttr {
    pub const ALL: [RigAttr; 7] = [
        RigAttr::FocalPoint,
        RigAttr::Width,
        RigAttr::Near,
        RigAttr::Far,
        RigAttr::OldWidth,
        RigAttr::OldMid,
        RigAttr::Fov,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RigAttr::FocalPoint => "focal_point",
            RigAttr::Width => "width",
            RigAttr::Near => "near",
            RigAttr::Far => "far",
            RigAttr::OldWidth => "old_width",
            RigAttr::OldMid => "old_mid",
            RigAttr::Fov => "fov",
        }
    }
}

/// Read/write access to the bound camera: the seam between this crate and
/// the host application's attribute system.
pub trait CameraRig {
    fn attr(&self, attr: RigAttr) -> CamlinkResult<f32>;

    /// Attribute value evaluated at an explicit timeline position rather
    /// than "now".
    fn attr_at(&self, attr: RigAttr, at: Seconds) -> CamlinkResult<f32>;

    fn set_attr(&mut self, attr: RigAttr, value: f32) -> CamlinkResult<()>;

    fn world_position(&self) -> Vec3;

    fn world_rotation(&self) -> Quat;
}

/// One recorded attribute write, kept for rollback.
#[derive(Clone, Copy, Debug)]
pub struct AttrEdit {
    pub attr: RigAttr,
    pub previous: f32,
}

/// In-process rig over a scene document camera. Writes clamp to the host
/// attribute ranges and are recorded into the undo history while a chunk
/// is open.
#[derive(Clone, Debug)]
pub struct MemoryRig {
    scene: Scene,
    camera: String,
    undo: UndoStack<AttrEdit>,
}

impl MemoryRig {
    pub fn bind(scene: Scene, camera: &str) -> CamlinkResult<Self> {
        if !scene.cameras.contains_key(camera) {
            return Err(CamlinkError::selection(format!(
                "camera '{camera}' not found in scene"
            )));
        }
        Ok(Self {
            scene,
            camera: camera.to_string(),
            undo: UndoStack::new(),
        })
    }

    pub fn camera(&self) -> &str {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Whether the bound camera carries the DoF attribute schema.
    pub fn has_dof_schema(&self) -> bool {
        self.scene.cameras[&self.camera].rig.is_some()
    }

    pub fn open_undo_chunk(&mut self, name: impl Into<String>) {
        self.undo.open_chunk(name);
    }

    pub fn close_undo_chunk(&mut self) {
        self.undo.close_chunk();
    }

    /// Roll back the most recent undo chunk. Returns false when the
    /// history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(chunk) = self.undo.undo() else {
            return false;
        };
        for edit in chunk.into_edits().into_iter().rev() {
            if let Some(rig) = self.rig_mut() {
                *field_mut(rig, edit.attr) = edit.previous;
            }
        }
        true
    }

    fn rig(&self) -> Option<&DofRig> {
        self.scene.cameras[&self.camera].rig.as_ref()
    }

    fn rig_mut(&mut self) -> Option<&mut DofRig> {
        self.scene
            .cameras
            .get_mut(&self.camera)
            .and_then(|cam| cam.rig.as_mut())
    }

    fn missing_schema(&self, attr: RigAttr) -> CamlinkError {
        CamlinkError::attribute(format!(
            "camera '{}' has no DoF attribute schema (reading '{}')",
            self.camera,
            attr.name()
        ))
    }
}

fn field(rig: &DofRig, attr: RigAttr) -> f32 {
    match attr {
        RigAttr::FocalPoint => rig.focal_point,
        RigAttr::Width => rig.width,
        RigAttr::Near => rig.near,
        RigAttr::Far => rig.far,
        RigAttr::OldWidth => rig.old_width,
        RigAttr::OldMid => rig.old_mid,
        RigAttr::Fov => rig.fov,
    }
}

fn field_mut(rig: &mut DofRig, attr: RigAttr) -> &mut f32 {
    match attr {
        RigAttr::FocalPoint => &mut rig.focal_point,
        RigAttr::Width => &mut rig.width,
        RigAttr::Near => &mut rig.near,
        RigAttr::Far => &mut rig.far,
        RigAttr::OldWidth => &mut rig.old_width,
        RigAttr::OldMid => &mut rig.old_mid,
        RigAttr::Fov => &mut rig.fov,
    }
}

fn clamp_to_host_range(attr: RigAttr, value: f32) -> f32 {
    let range = match attr {
        RigAttr::Fov => FOV_RANGE,
        _ => DIST_RANGE,
    };
    value.clamp(*range.start(), *range.end())
}

impl CameraRig for MemoryRig {
    fn attr(&self, attr: RigAttr) -> CamlinkResult<f32> {
        self.rig()
            .map(|rig| field(rig, attr))
            .ok_or_else(|| self.missing_schema(attr))
    }

    /// The scene document holds a single authored value per attribute, so
    /// a time-context read evaluates to the same value.
    fn attr_at(&self, attr: RigAttr, _at: Seconds) -> CamlinkResult<f32> {
        self.attr(attr)
    }

    fn set_attr(&mut self, attr: RigAttr, value: f32) -> CamlinkResult<()> {
        let previous = self.attr(attr)?;
        self.undo.record(AttrEdit { attr, previous });
        if let Some(rig) = self.rig_mut() {
            *field_mut(rig, attr) = clamp_to_host_range(attr, value);
        }
        Ok(())
    }

    fn world_position(&self) -> Vec3 {
        self.scene.cameras[&self.camera].position
    }

    fn world_rotation(&self) -> Quat {
        self.scene.cameras[&self.camera].rotation
    }
}

impl crate::playback::Timeline for MemoryRig {
    fn current_time(&self) -> Seconds {
        self.scene.timeline.current
    }

    fn max_time(&self) -> Seconds {
        self.scene.timeline.max
    }

    fn is_playing(&self) -> bool {
        self.scene.timeline.playing
    }

    fn set_current_time(&mut self, at: Seconds) {
        self.scene.timeline.current = at;
    }

    fn set_max_time(&mut self, max: Seconds) {
        self.scene.timeline.max = max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::CameraNode;
    use std::collections::BTreeMap;

    fn scene_with(rig: Option<DofRig>) -> Scene {
        let mut cameras = BTreeMap::new();
        cameras.insert(
            "cam1".to_string(),
            CameraNode {
                position: Vec3::new(1.0, 2.0, 3.0),
                rotation: Quat::IDENTITY,
                rig,
            },
        );
        Scene {
            cameras,
            timeline: Default::default(),
        }
    }

    #[test]
    fn bind_unknown_camera_is_selection_error() {
        let err = MemoryRig::bind(scene_with(None), "nope").unwrap_err();
        assert!(matches!(err, CamlinkError::Selection(_)));
    }

    #[test]
    fn attr_without_schema_is_attribute_error() {
        let rig = MemoryRig::bind(scene_with(None), "cam1").unwrap();
        assert!(!rig.has_dof_schema());
        assert!(matches!(
            rig.attr(RigAttr::FocalPoint),
            Err(CamlinkError::Attribute(_))
        ));
    }

    #[test]
    fn set_clamps_to_host_ranges() {
        let mut rig = MemoryRig::bind(scene_with(Some(DofRig::default())), "cam1").unwrap();
        rig.set_attr(RigAttr::Near, -50.0).unwrap();
        assert_eq!(rig.attr(RigAttr::Near).unwrap(), 0.0);
        rig.set_attr(RigAttr::Fov, 500.0).unwrap();
        assert_eq!(rig.attr(RigAttr::Fov).unwrap(), 180.0);
    }

    #[test]
    fn undo_restores_a_whole_chunk() {
        let mut rig = MemoryRig::bind(scene_with(Some(DofRig::default())), "cam1").unwrap();
        rig.open_undo_chunk("edit");
        rig.set_attr(RigAttr::FocalPoint, 250.0).unwrap();
        rig.set_attr(RigAttr::Near, 450.0).unwrap();
        rig.close_undo_chunk();

        assert!(rig.undo());
        assert_eq!(rig.attr(RigAttr::FocalPoint).unwrap(), 200.0);
        assert_eq!(rig.attr(RigAttr::Near).unwrap(), 400.0);
        assert!(!rig.undo());
    }

    #[test]
    fn writes_outside_chunks_are_not_undoable() {
        let mut rig = MemoryRig::bind(scene_with(Some(DofRig::default())), "cam1").unwrap();
        rig.set_attr(RigAttr::Width, 300.0).unwrap();
        assert!(!rig.undo());
        assert_eq!(rig.attr(RigAttr::Width).unwrap(), 300.0);
    }
}
