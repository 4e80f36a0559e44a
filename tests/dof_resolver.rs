use std::collections::BTreeMap;

use camlink::{
    CamlinkError, CamlinkResult, CameraNode, CameraRig, Dispatch, DofResolver, DofRig, EventStamp,
    MemoryRig, Outbound, PlaybackState, RigAttr, Scene,
};
use glam::{Quat, Vec3};

struct Recorder {
    sent: Vec<Outbound>,
}

impl Recorder {
    fn new() -> Self {
        Self { sent: Vec::new() }
    }
}

impl Dispatch for Recorder {
    fn post(&mut self, msg: &Outbound) {
        self.sent.push(*msg);
    }

    fn fetch_playback(&mut self) -> CamlinkResult<PlaybackState> {
        Err(CamlinkError::transport("no service in tests"))
    }
}

fn rig_with(rig: DofRig) -> MemoryRig {
    let mut cameras = BTreeMap::new();
    cameras.insert(
        "cam1".to_string(),
        CameraNode {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            rig: Some(rig),
        },
    );
    MemoryRig::bind(
        Scene {
            cameras,
            timeline: Default::default(),
        },
        "cam1",
    )
    .unwrap()
}

#[test]
fn focal_point_edits_shift_the_window_rigidly() {
    // Ordered states (near <= focal point <= far) and a few deltas.
    let cases = [
        (100.0, 200.0, 300.0, 50.0),
        (100.0, 200.0, 300.0, -75.0),
        (0.0, 10.0, 20.0, 2.5),
    ];

    for (near, old_mid, far, delta) in cases {
        let new_fp = old_mid + delta;
        let mut rig = rig_with(DofRig {
            near,
            far,
            old_mid,
            focal_point: new_fp, // the operator's edit, already applied
            ..DofRig::default()
        });
        let mut resolver = DofResolver::new();
        let mut out = Recorder::new();

        resolver
            .on_attribute_changed(&mut rig, RigAttr::FocalPoint, EventStamp(1), &mut out)
            .unwrap();

        assert_eq!(rig.attr(RigAttr::Near).unwrap(), near + delta);
        assert_eq!(rig.attr(RigAttr::Far).unwrap(), far + delta);
        // Baseline moves to the new focal point.
        assert_eq!(rig.attr(RigAttr::OldMid).unwrap(), new_fp);
    }
}

#[test]
fn width_edits_commit_the_exact_candidates() {
    let (focal_point, near, far, old_width, new_width) = (200.0, 150.0, 260.0, 220.0, 250.0);
    let mut rig = rig_with(DofRig {
        focal_point,
        near,
        far,
        old_width,
        old_mid: focal_point,
        width: new_width,
        ..DofRig::default()
    });
    let mut resolver = DofResolver::new();
    let mut out = Recorder::new();

    resolver
        .on_attribute_changed(&mut rig, RigAttr::Width, EventStamp(1), &mut out)
        .unwrap();

    let expected_near = focal_point - new_width + (near - focal_point + old_width);
    let expected_far = focal_point + new_width + (far - focal_point - old_width);
    assert_eq!(rig.attr(RigAttr::Near).unwrap(), expected_near);
    assert_eq!(rig.attr(RigAttr::Far).unwrap(), expected_far);
    assert_eq!(rig.attr(RigAttr::OldWidth).unwrap(), new_width);
}

#[test]
fn fov_dedup_is_by_value_not_by_event() {
    let mut rig = rig_with(DofRig::default());
    let mut resolver = DofResolver::new();
    let mut out = Recorder::new();

    for stamp in 1..=3 {
        resolver
            .on_attribute_changed(&mut rig, RigAttr::Fov, EventStamp(stamp), &mut out)
            .unwrap();
    }
    let fov_sends = out
        .sent
        .iter()
        .filter(|m| matches!(m, Outbound::Fov(_)))
        .count();
    assert_eq!(fov_sends, 1);

    // A genuinely new value goes out again.
    rig.set_attr(RigAttr::Fov, 55.0).unwrap();
    resolver
        .on_attribute_changed(&mut rig, RigAttr::Fov, EventStamp(4), &mut out)
        .unwrap();
    let fov_sends = out
        .sent
        .iter()
        .filter(|m| matches!(m, Outbound::Fov(_)))
        .count();
    assert_eq!(fov_sends, 2);
}

#[test]
fn duplicate_stamps_do_not_recompute() {
    let mut rig = rig_with(DofRig {
        focal_point: 260.0,
        ..DofRig::default()
    });
    let mut resolver = DofResolver::new();
    let mut out = Recorder::new();

    resolver
        .on_attribute_changed(&mut rig, RigAttr::FocalPoint, EventStamp(9), &mut out)
        .unwrap();
    let near_after_first = rig.attr(RigAttr::Near).unwrap();
    let sends_after_first = out.sent.len();

    resolver
        .on_attribute_changed(&mut rig, RigAttr::FocalPoint, EventStamp(9), &mut out)
        .unwrap();
    assert_eq!(rig.attr(RigAttr::Near).unwrap(), near_after_first);
    assert_eq!(out.sent.len(), sends_after_first);
}

#[test]
fn derived_values_pass_through_unordered_and_unclamped() {
    // A width edit that drives far below near: the payload carries the
    // arithmetic results untouched.
    let mut rig = rig_with(DofRig {
        focal_point: 200.0,
        width: 300.0,
        near: 400.0,
        far: 0.0,
        old_width: 200.0,
        old_mid: 200.0,
        fov: 40.0,
    });
    let mut resolver = DofResolver::new();
    let mut out = Recorder::new();

    resolver
        .on_attribute_changed(&mut rig, RigAttr::Width, EventStamp(1), &mut out)
        .unwrap();

    // near = 200 - 300 + (400 - 200 + 200) = 300
    // far  = 200 + 300 + (0 - 200 - 200)   = 100  (inverted, sent as-is)
    match out.sent.last().unwrap() {
        Outbound::Render(p) => {
            assert_eq!(p.depth_of_field_near, Some(3000.0));
            assert_eq!(p.depth_of_field_far, Some(1000.0));
        }
        other => panic!("expected render payload, got {other:?}"),
    }
}
