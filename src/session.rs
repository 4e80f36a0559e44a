use crate::{
    client::Dispatch,
    core::{Seconds, TickRate},
    dof::{DofResolver, EventStamp},
    error::{CamlinkError, CamlinkResult},
    playback::TimeLink,
    rig::{CameraRig, MemoryRig, RigAttr},
    sampler::CameraSampler,
    scene::Scene,
};

/// What grabbing a camera achieved.
#[derive(Clone, Debug)]
pub struct GrabReport {
    pub camera: String,
    pub dof_attached: bool,
}

/// Panel lifecycle: owns the per-camera DoF resolver, the sampler
/// registration and the time link. Dropping any of them releases the
/// corresponding host subscription; releasing twice is harmless.
#[derive(Debug, Default)]
pub struct LinkSession {
    camera: Option<String>,
    dof: Option<DofResolver>,
    sampler: Option<CameraSampler>,
    time_link: TimeLink,
}

impl LinkSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the operator's selection to a bound rig.
    pub fn bind_selection(scene: Scene, selection: Option<&str>) -> CamlinkResult<MemoryRig> {
        let name = selection.ok_or_else(|| CamlinkError::selection("nothing selected"))?;
        MemoryRig::bind(scene, name)
    }

    /// Bind the rig's camera to this session. A previous DoF binding is
    /// released first. A camera without the DoF attribute schema is still
    /// usable for pose sampling; only the resolver attach is skipped.
    pub fn grab(&mut self, rig: &MemoryRig) -> GrabReport {
        self.detach_dof();
        self.camera = Some(rig.camera().to_string());

        let dof_attached = rig.has_dof_schema();
        if dof_attached {
            self.dof = Some(DofResolver::new());
            tracing::info!(camera = rig.camera(), "DoF resolver attached");
        } else {
            tracing::warn!(camera = rig.camera(), "no suitable camera for DoF found");
        }

        GrabReport {
            camera: rig.camera().to_string(),
            dof_attached,
        }
    }

    pub fn camera(&self) -> Option<&str> {
        self.camera.as_deref()
    }

    pub fn time_link(&self) -> TimeLink {
        self.time_link
    }

    pub fn set_time_link(&mut self, enabled: bool) {
        self.time_link.set_enabled(enabled);
    }

    pub fn start_sampling(&mut self, rate: TickRate) -> CamlinkResult<CameraSampler> {
        if self.camera.is_none() {
            return Err(CamlinkError::selection("no camera selected"));
        }
        let sampler = CameraSampler::new(rate);
        self.sampler = Some(sampler);
        Ok(sampler)
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_some()
    }

    /// Idempotent: stopping an already-stopped sampler is not an error.
    /// Returns whether a registration was actually removed.
    pub fn stop_sampling(&mut self) -> bool {
        self.sampler.take().is_some()
    }

    /// Idempotent, like the host's tolerant callback removal.
    pub fn detach_dof(&mut self) -> bool {
        self.dof.take().is_some()
    }

    pub fn dof_attached(&self) -> bool {
        self.dof.is_some()
    }

    /// Forward a host attribute-change notification. A no-op unless a
    /// DoF resolver is attached.
    pub fn notify_attribute_changed(
        &mut self,
        rig: &mut MemoryRig,
        attr: RigAttr,
        stamp: EventStamp,
        out: &mut dyn Dispatch,
    ) -> CamlinkResult<()> {
        match self.dof.as_mut() {
            Some(dof) => dof.on_attribute_changed(rig, attr, stamp, out),
            None => Ok(()),
        }
    }

    /// Forward a timeline-position change for DoF rebroadcast.
    pub fn notify_time_changed(
        &self,
        rig: &MemoryRig,
        at: Seconds,
        out: &mut dyn Dispatch,
    ) -> CamlinkResult<()> {
        match self.dof.as_ref() {
            Some(dof) => dof.on_time_changed(rig, at, out),
            None => Ok(()),
        }
    }

    /// Operator edit entry point: the authored write and the resolver's
    /// derived write-backs land in a single undo chunk.
    pub fn edit_attr(
        &mut self,
        rig: &mut MemoryRig,
        attr: RigAttr,
        value: f32,
        stamp: EventStamp,
        out: &mut dyn Dispatch,
    ) -> CamlinkResult<()> {
        rig.open_undo_chunk(format!("edit {}", attr.name()));
        let result = rig
            .set_attr(attr, value)
            .and_then(|()| self.notify_attribute_changed(rig, attr, stamp, out));
        rig.close_undo_chunk();
        result
    }

    /// Panel close: release every registration.
    pub fn close(&mut self) {
        self.stop_sampling();
        self.detach_dof();
        self.camera = None;
        self.time_link.set_enabled(false);
        tracing::info!("session closed");
    }
}
