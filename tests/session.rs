use camlink::{
    CamlinkError, CamlinkResult, CameraRig, Dispatch, EventStamp, LinkSession, Outbound,
    PlaybackState, RigAttr, Scene, TickRate,
};

struct Recorder {
    sent: Vec<Outbound>,
}

impl Dispatch for Recorder {
    fn post(&mut self, msg: &Outbound) {
        self.sent.push(*msg);
    }

    fn fetch_playback(&mut self) -> CamlinkResult<PlaybackState> {
        Err(CamlinkError::transport("no service in tests"))
    }
}

fn fixture_scene() -> Scene {
    serde_json::from_str(include_str!("data/simple_scene.json")).unwrap()
}

/// Route session lifecycle events through the test harness output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn grabbing_a_plain_camera_reports_no_dof() {
    init_tracing();
    let rig = LinkSession::bind_selection(fixture_scene(), Some("freecam")).unwrap();
    let mut session = LinkSession::new();
    let report = session.grab(&rig);
    assert!(!report.dof_attached);
    assert_eq!(session.camera(), Some("freecam"));
}

#[test]
fn regrab_replaces_the_previous_binding() {
    init_tracing();
    let rigged = LinkSession::bind_selection(fixture_scene(), Some("cam1")).unwrap();
    let plain = LinkSession::bind_selection(fixture_scene(), Some("freecam")).unwrap();

    let mut session = LinkSession::new();
    assert!(session.grab(&rigged).dof_attached);
    assert!(session.dof_attached());

    // Grabbing the schema-less camera releases the old resolver.
    assert!(!session.grab(&plain).dof_attached);
    assert!(!session.dof_attached());
}

#[test]
fn double_detach_never_errors_past_the_session() {
    let rig = LinkSession::bind_selection(fixture_scene(), Some("cam1")).unwrap();
    let mut session = LinkSession::new();
    session.grab(&rig);

    assert!(session.detach_dof());
    assert!(!session.detach_dof());
    assert!(!session.stop_sampling());
}

#[test]
fn missing_camera_is_a_selection_error() {
    let err = LinkSession::bind_selection(fixture_scene(), Some("ghost")).unwrap_err();
    assert!(matches!(err, CamlinkError::Selection(_)));
}

#[test]
fn edit_resolves_and_undo_reverts_the_gesture() {
    let mut rig = LinkSession::bind_selection(fixture_scene(), Some("cam1")).unwrap();
    let mut session = LinkSession::new();
    session.grab(&rig);
    session.start_sampling(TickRate::new(30).unwrap()).unwrap();
    let mut out = Recorder { sent: Vec::new() };

    session
        .edit_attr(&mut rig, RigAttr::Width, 260.0, EventStamp(1), &mut out)
        .unwrap();
    assert!(!out.sent.is_empty());
    assert_eq!(rig.attr(RigAttr::OldWidth).unwrap(), 260.0);

    assert!(rig.undo());
    assert_eq!(rig.attr(RigAttr::Width).unwrap(), 200.0);
    assert_eq!(rig.attr(RigAttr::OldWidth).unwrap(), 200.0);
    assert_eq!(rig.attr(RigAttr::Near).unwrap(), 400.0);
    assert_eq!(rig.attr(RigAttr::Far).unwrap(), 0.0);
}
