use std::time::Duration;

use crate::{
    client::Dispatch,
    core::{CameraPose, TickRate},
    rig::CameraRig,
    wire::{Outbound, RenderPayload},
};

/// Timer-driven pose sampler: each tick reads the bound camera's world
/// transform, converts it to the replay convention and dispatches it
/// fire-and-forget. The caller owns the timer; `interval` says how often
/// to call `tick`.
#[derive(Clone, Copy, Debug)]
pub struct CameraSampler {
    rate: TickRate,
}

impl CameraSampler {
    pub fn new(rate: TickRate) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> TickRate {
        self.rate
    }

    pub fn interval(&self) -> Duration {
        self.rate.interval()
    }

    /// One sampling step without the dispatch.
    pub fn sample(&self, rig: &dyn CameraRig) -> RenderPayload {
        let pose = CameraPose::from_host(rig.world_position(), rig.world_rotation());
        RenderPayload::pose(pose)
    }

    pub fn tick(&self, rig: &dyn CameraRig, out: &mut dyn Dispatch) {
        out.post(&Outbound::Render(self.sample(rig)));
    }
}

impl Default for CameraSampler {
    fn default() -> Self {
        Self::new(TickRate::default())
    }
}
