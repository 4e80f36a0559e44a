use crate::{
    client::Dispatch,
    core::Seconds,
    error::CamlinkResult,
    rig::{CameraRig, RigAttr},
    wire::{FovPayload, Outbound, RenderPayload},
};

/// Generation token for one host change notification. The host fires
/// duplicate notifications for a single gesture; duplicates carry the same
/// stamp and coalesce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventStamp(pub u64);

/// Keeps the derived depth-of-field bounds consistent when the operator
/// edits `focal_point` or `width`, and forwards `fov` edits.
///
/// `near`/`far` are derived, not independently authored: edits to the two
/// authoritative inputs re-derive them, and the write-backs are shielded
/// from re-triggering this resolver by the `applying` guard. Derived
/// values are dispatched as computed, unclamped and unordered.
#[derive(Debug, Default)]
pub struct DofResolver {
    last_stamp: Option<EventStamp>,
    last_fov: Option<f32>,
    applying: bool,
}

impl DofResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one attribute-change notification from the host.
    #[tracing::instrument(skip(self, rig, out))]
    pub fn on_attribute_changed(
        &mut self,
        rig: &mut dyn CameraRig,
        attr: RigAttr,
        stamp: EventStamp,
        out: &mut dyn Dispatch,
    ) -> CamlinkResult<()> {
        if self.applying {
            return Ok(());
        }
        if self.last_stamp == Some(stamp) {
            return Ok(());
        }
        self.last_stamp = Some(stamp);

        let old_width = rig.attr(RigAttr::OldWidth)?;
        let old_mid = rig.attr(RigAttr::OldMid)?;
        let focal_point = rig.attr(RigAttr::FocalPoint)?;
        let width = rig.attr(RigAttr::Width)?;
        let mut near = rig.attr(RigAttr::Near)?;
        let mut far = rig.attr(RigAttr::Far)?;
        let fov = rig.attr(RigAttr::Fov)?;

        // What near/far would be if only the width had changed: shift the
        // whole window by the change in width.
        let near_candidate = focal_point - width + (near - focal_point + old_width);
        let far_candidate = focal_point + width + (far - focal_point - old_width);

        match attr {
            RigAttr::FocalPoint => {
                let delta = focal_point - old_mid;
                near += delta;
                far += delta;
                self.apply(
                    rig,
                    &[
                        (RigAttr::Near, near),
                        (RigAttr::Far, far),
                        (RigAttr::OldMid, focal_point),
                    ],
                )?;
            }
            RigAttr::Width => {
                near = near_candidate;
                far = far_candidate;
                self.apply(
                    rig,
                    &[
                        (RigAttr::Near, near),
                        (RigAttr::Far, far),
                        (RigAttr::OldWidth, width),
                    ],
                )?;
            }
            RigAttr::Fov => {
                // The host fires redundant fov notifications; forward a
                // value at most once.
                if self.last_fov == Some(fov) {
                    return Ok(());
                }
                self.last_fov = Some(fov);
                out.post(&Outbound::Fov(FovPayload { field_of_view: fov }));
            }
            _ => {}
        }

        out.post(&Outbound::Render(dof_payload(near, focal_point, far, fov)));
        Ok(())
    }

    /// Timeline-driven re-evaluation: rebroadcast the DoF state evaluated
    /// at `at` without treating it as an attribute edit.
    pub fn on_time_changed(
        &self,
        rig: &dyn CameraRig,
        at: Seconds,
        out: &mut dyn Dispatch,
    ) -> CamlinkResult<()> {
        let focal_point = rig.attr_at(RigAttr::FocalPoint, at)?;
        let near = rig.attr_at(RigAttr::Near, at)?;
        let far = rig.attr_at(RigAttr::Far, at)?;
        let fov = rig.attr_at(RigAttr::Fov, at)?;
        out.post(&Outbound::Render(dof_payload(near, focal_point, far, fov)));
        Ok(())
    }

    fn apply(&mut self, rig: &mut dyn CameraRig, writes: &[(RigAttr, f32)]) -> CamlinkResult<()> {
        self.applying = true;
        let result = writes
            .iter()
            .try_for_each(|&(attr, value)| rig.set_attr(attr, value));
        self.applying = false;
        result
    }
}

/// The replay service takes DoF planes in decimeter-scaled units.
fn dof_payload(near: f32, mid: f32, far: f32, fov: f32) -> RenderPayload {
    RenderPayload {
        depth_of_field_far: Some(far * 10.0),
        depth_of_field_mid: Some(mid * 10.0),
        depth_of_field_near: Some(near * 10.0),
        field_of_view: Some(fov),
        ..RenderPayload::default()
    }
}
