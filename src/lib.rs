#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod core;
pub mod dof;
pub mod error;
pub mod playback;
pub mod rig;
pub mod sampler;
pub mod scene;
pub mod session;
pub mod undo;
pub mod wire;

pub use client::{DEFAULT_BASE_URL, Dispatch, ReplayClient};
pub use config::LinkConfig;
pub use crate::core::{CameraPose, Seconds, TickRate};
pub use dof::{DofResolver, EventStamp};
pub use error::{CamlinkError, CamlinkResult};
pub use playback::{TimeLink, Timeline};
pub use rig::{CameraRig, MemoryRig, RigAttr};
pub use sampler::CameraSampler;
pub use scene::{CameraNode, DofRig, Scene};
pub use session::{GrabReport, LinkSession};
pub use undo::UndoStack;
pub use wire::{Outbound, PlaybackPayload, PlaybackState, RenderPayload};
