use crate::{
    error::{CamlinkError, CamlinkResult},
    wire::{Endpoint, Outbound, PlaybackState},
};

/// The replay service's fixed local endpoint.
pub const DEFAULT_BASE_URL: &str = "https://127.0.0.1:2999/replay";

/// Outbound seam for the sampler, resolver and time link. `post` is
/// fire-and-forget; `fetch_playback` is the one read-back path.
pub trait Dispatch {
    fn post(&mut self, msg: &Outbound);

    fn fetch_playback(&mut self) -> CamlinkResult<PlaybackState>;
}

/// Blocking HTTP client against the replay service. The endpoint uses a
/// self-signed certificate on a local connection, so certificate
/// validation is disabled by policy.
pub struct ReplayClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ReplayClient {
    pub fn new(base_url: &str, accept_invalid_certs: bool) -> CamlinkResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|err| CamlinkError::transport(format!("build http client: {err}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

impl Dispatch for ReplayClient {
    fn post(&mut self, msg: &Outbound) {
        let url = self.url(msg.endpoint());
        // Best-effort: an unreachable service drops the send silently.
        if let Err(err) = self.http.post(&url).json(&msg.to_json()).send() {
            tracing::debug!(%url, %err, "send dropped");
        }
    }

    fn fetch_playback(&mut self) -> CamlinkResult<PlaybackState> {
        let url = self.url(Endpoint::Playback);
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|err| CamlinkError::transport(format!("GET {url}: {err}")))?;
        resp.json()
            .map_err(|err| CamlinkError::transport(format!("parse playback state: {err}")))
    }
}
