use crate::core::{CameraPose, Seconds};

/// `{x,y,z}` object as the replay API expects (glam serializes vectors as
/// arrays).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Body for POST `{base}/render`. Any subset may be sent; omitted keys
/// leave the service's last-known value untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_position: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_rotation: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_of_field_far: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_of_field_mid: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_of_field_near: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_view: Option<f32>,
}

impl RenderPayload {
    pub fn pose(pose: CameraPose) -> Self {
        Self {
            camera_position: Some(pose.position.into()),
            camera_rotation: Some(pose.rotation_deg.into()),
            ..Self::default()
        }
    }
}

/// Partial FOV body, posted to the render endpoint.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FovPayload {
    pub field_of_view: f32,
}

/// Body for POST `{base}/playback`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
}

/// Response of GET `{base}/playback`, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize)]
pub struct PlaybackState {
    pub time: f64,
    pub length: f64,
}

impl PlaybackState {
    pub fn time(&self) -> Seconds {
        Seconds(self.time)
    }

    pub fn length(&self) -> Seconds {
        Seconds(self.length)
    }
}

/// One of the three fixed outbound payload shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outbound {
    Render(RenderPayload),
    Playback(PlaybackPayload),
    Fov(FovPayload),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Render,
    Playback,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Render => "render",
            Endpoint::Playback => "playback",
        }
    }
}

impl Outbound {
    /// FOV bodies ride the render endpoint as a partial state update.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Outbound::Render(_) | Outbound::Fov(_) => Endpoint::Render,
            Outbound::Playback(_) => Endpoint::Playback,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Outbound::Render(p) => serde_json::json!(p),
            Outbound::Playback(p) => serde_json::json!(p),
            Outbound::Fov(p) => serde_json::json!(p),
        }
    }
}
