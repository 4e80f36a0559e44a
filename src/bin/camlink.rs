use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use camlink::{
    CamlinkResult, CameraNode, Dispatch, DofRig, EventStamp, LinkConfig, LinkSession, Outbound,
    PlaybackPayload, PlaybackState, RigAttr, Scene, TickRate,
};

#[derive(Parser, Debug)]
#[command(name = "camlink", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the live link: sample the camera at the tick rate and push it.
    Link(LinkArgs),
    /// Convert and push the camera pose once.
    Pose(PoseArgs),
    /// Edit one rig attribute and run the DoF resolver.
    Edit(EditArgs),
    /// Push playback time and/or paused state.
    Playback(PlaybackArgs),
    /// Read the replay playback state back onto the scene timeline.
    AdjustTimeline(AdjustTimelineArgs),
    /// Add a camera with the default DoF rig to a scene.
    CreateCamera(CreateCameraArgs),
}

#[derive(Args, Debug)]
struct ConnectArgs {
    /// Optional config JSON (base URL, tick rate, TLS policy).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the replay service base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Print payloads to stdout instead of sending them.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct LinkArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Camera to link.
    #[arg(long)]
    camera: String,

    /// Sampling rate in Hz (1..=200).
    #[arg(long, default_value_t = 60)]
    rate: u32,

    /// Stop after this many ticks (runs until interrupted otherwise).
    #[arg(long)]
    ticks: Option<u64>,

    #[command(flatten)]
    connect: ConnectArgs,
}

#[derive(Parser, Debug)]
struct PoseArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Camera to sample.
    #[arg(long)]
    camera: String,

    #[command(flatten)]
    connect: ConnectArgs,
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Camera whose rig to edit.
    #[arg(long)]
    camera: String,

    /// Attribute to set.
    #[arg(long, value_enum)]
    attr: AttrChoice,

    /// New value.
    #[arg(long)]
    value: f32,

    /// Write the resolved scene back to the input file.
    #[arg(long)]
    save: bool,

    #[command(flatten)]
    connect: ConnectArgs,
}

#[derive(Parser, Debug)]
struct PlaybackArgs {
    /// Playback position in seconds.
    #[arg(long)]
    time: Option<f64>,

    /// Paused state.
    #[arg(long)]
    paused: Option<bool>,

    #[command(flatten)]
    connect: ConnectArgs,
}

#[derive(Parser, Debug)]
struct AdjustTimelineArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Write the adjusted timeline back to the input file.
    #[arg(long)]
    save: bool,

    #[command(flatten)]
    connect: ConnectArgs,
}

#[derive(Parser, Debug)]
struct CreateCameraArgs {
    /// Scene JSON to create or extend.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Name of the new camera.
    #[arg(long)]
    name: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AttrChoice {
    FocalPoint,
    Width,
    Near,
    Far,
    OldWidth,
    OldMid,
    Fov,
}

impl From<AttrChoice> for RigAttr {
    fn from(choice: AttrChoice) -> Self {
        match choice {
            AttrChoice::FocalPoint => RigAttr::FocalPoint,
            AttrChoice::Width => RigAttr::Width,
            AttrChoice::Near => RigAttr::Near,
            AttrChoice::Far => RigAttr::Far,
            AttrChoice::OldWidth => RigAttr::OldWidth,
            AttrChoice::OldMid => RigAttr::OldMid,
            AttrChoice::Fov => RigAttr::Fov,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Link(args) => cmd_link(args),
        Command::Pose(args) => cmd_pose(args),
        Command::Edit(args) => cmd_edit(args),
        Command::Playback(args) => cmd_playback(args),
        Command::AdjustTimeline(args) => cmd_adjust_timeline(args),
        Command::CreateCamera(args) => cmd_create_camera(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<Scene> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("open scene '{}'", path.display()))?;
    let scene: Scene = serde_json::from_str(&text).with_context(|| "parse scene JSON")?;
    scene.validate()?;
    Ok(scene)
}

fn write_scene_json(path: &Path, scene: &Scene) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(scene)?;
    std::fs::write(path, text).with_context(|| format!("write scene '{}'", path.display()))?;
    Ok(())
}

fn load_config(connect: &ConnectArgs) -> anyhow::Result<LinkConfig> {
    let mut config = match &connect.config {
        Some(path) => LinkConfig::load(path)?,
        None => LinkConfig::default(),
    };
    if let Some(base_url) = &connect.base_url {
        config.base_url = base_url.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Dispatcher that prints instead of sending.
struct DryRun;

impl Dispatch for DryRun {
    fn post(&mut self, msg: &Outbound) {
        println!("POST /{} {}", msg.endpoint().path(), msg.to_json());
    }

    fn fetch_playback(&mut self) -> CamlinkResult<PlaybackState> {
        Err(camlink::CamlinkError::transport(
            "dry-run has no service to read from",
        ))
    }
}

fn make_dispatch(connect: &ConnectArgs, config: &LinkConfig) -> anyhow::Result<Box<dyn Dispatch>> {
    if connect.dry_run {
        return Ok(Box::new(DryRun));
    }
    Ok(Box::new(camlink::ReplayClient::new(
        &config.base_url,
        config.accept_invalid_certs,
    )?))
}

fn cmd_link(args: LinkArgs) -> anyhow::Result<()> {
    let config = load_config(&args.connect)?;
    let scene = read_scene_json(&args.in_path)?;
    let rig = LinkSession::bind_selection(scene, Some(&args.camera))?;

    let mut session = LinkSession::new();
    let report = session.grab(&rig);
    if !report.dof_attached {
        eprintln!("no suitable camera for DoF found, linking pose only");
    }
    session.set_time_link(config.time_link);

    let sampler = session.start_sampling(TickRate::new(args.rate)?)?;
    let mut out = make_dispatch(&args.connect, &config)?;

    // With the time link on, align the replay to the scene's timeline
    // position before streaming the pose.
    session.time_link().push_scrub(&rig, out.as_mut());

    // A dry run without --ticks prints a single tick.
    let ticks = args
        .ticks
        .or_else(|| args.connect.dry_run.then_some(1))
        .unwrap_or(u64::MAX);
    eprintln!(
        "linking '{}' at {} Hz{}",
        report.camera,
        sampler.rate().hz(),
        if args.connect.dry_run { " (dry run)" } else { "" }
    );
    for _ in 0..ticks {
        sampler.tick(&rig, out.as_mut());
        if !args.connect.dry_run {
            std::thread::sleep(sampler.interval());
        }
    }

    session.close();
    Ok(())
}

fn cmd_pose(args: PoseArgs) -> anyhow::Result<()> {
    let config = load_config(&args.connect)?;
    let scene = read_scene_json(&args.in_path)?;
    let rig = LinkSession::bind_selection(scene, Some(&args.camera))?;
    let mut out = make_dispatch(&args.connect, &config)?;

    camlink::CameraSampler::default().tick(&rig, out.as_mut());
    Ok(())
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<()> {
    let config = load_config(&args.connect)?;
    let scene = read_scene_json(&args.in_path)?;
    let mut rig = LinkSession::bind_selection(scene, Some(&args.camera))?;

    let mut session = LinkSession::new();
    let report = session.grab(&rig);
    if !report.dof_attached {
        anyhow::bail!("camera '{}' has no DoF rig to edit", report.camera);
    }

    let mut out = make_dispatch(&args.connect, &config)?;
    session.edit_attr(
        &mut rig,
        args.attr.into(),
        args.value,
        EventStamp(1),
        out.as_mut(),
    )?;

    if args.save {
        write_scene_json(&args.in_path, rig.scene())?;
        eprintln!("wrote {}", args.in_path.display());
    }
    Ok(())
}

fn cmd_playback(args: PlaybackArgs) -> anyhow::Result<()> {
    if args.time.is_none() && args.paused.is_none() {
        anyhow::bail!("nothing to push: pass --time and/or --paused");
    }
    let config = load_config(&args.connect)?;
    let mut out = make_dispatch(&args.connect, &config)?;
    out.post(&Outbound::Playback(PlaybackPayload {
        time: args.time,
        paused: args.paused,
    }));
    Ok(())
}

fn cmd_adjust_timeline(args: AdjustTimelineArgs) -> anyhow::Result<()> {
    let config = load_config(&args.connect)?;
    let mut scene = read_scene_json(&args.in_path)?;

    let mut client = make_dispatch(&args.connect, &config)?;
    let state = camlink::TimeLink::new(true).adjust_timeline(&mut scene, client.as_mut())?;
    eprintln!(
        "timeline adjusted: position {:.3}s, length {:.3}s",
        state.time, state.length
    );

    if args.save {
        write_scene_json(&args.in_path, &scene)?;
        eprintln!("wrote {}", args.in_path.display());
    }
    Ok(())
}

fn cmd_create_camera(args: CreateCameraArgs) -> anyhow::Result<()> {
    let mut scene = if args.in_path.exists() {
        read_scene_json(&args.in_path)?
    } else {
        Scene {
            cameras: Default::default(),
            timeline: Default::default(),
        }
    };

    if scene.cameras.contains_key(&args.name) {
        anyhow::bail!("camera '{}' already exists", args.name);
    }
    scene.cameras.insert(
        args.name.clone(),
        CameraNode {
            position: glam::Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            rig: Some(DofRig::default()),
        },
    );
    scene.validate()?;

    write_scene_json(&args.in_path, &scene)?;
    eprintln!("created camera '{}' in {}", args.name, args.in_path.display());
    Ok(())
}
