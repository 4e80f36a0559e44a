use std::path::Path;

use anyhow::Context as _;

use crate::{
    client::DEFAULT_BASE_URL,
    core::TickRate,
    error::{CamlinkError, CamlinkResult},
};

/// Tool configuration, read from a JSON file. Every field has a default
/// so a partial file (or none at all) works.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub base_url: String,
    pub tick_rate: u32,
    /// The replay service serves a self-signed certificate locally.
    pub accept_invalid_certs: bool,
    pub time_link: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tick_rate: TickRate::default().hz(),
            accept_invalid_certs: true,
            time_link: false,
        }
    }
}

impl LinkConfig {
    pub fn load(path: &Path) -> CamlinkResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let config: LinkConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CamlinkResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(CamlinkError::validation(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        TickRate::new(self.tick_rate)?;
        Ok(())
    }

    pub fn tick_rate(&self) -> CamlinkResult<TickRate> {
        TickRate::new(self.tick_rate)
    }
}
