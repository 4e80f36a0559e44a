use crate::{
    client::Dispatch,
    core::Seconds,
    error::CamlinkResult,
    wire::{Outbound, PlaybackPayload, PlaybackState},
};

/// The host application's timeline: the other half of the time link.
pub trait Timeline {
    fn current_time(&self) -> Seconds;
    fn max_time(&self) -> Seconds;
    fn is_playing(&self) -> bool;
    fn set_current_time(&mut self, at: Seconds);
    fn set_max_time(&mut self, max: Seconds);
}

impl Timeline for crate::scene::Scene {
    fn current_time(&self) -> Seconds {
        self.timeline.current
    }

    fn max_time(&self) -> Seconds {
        self.timeline.max
    }

    fn is_playing(&self) -> bool {
        self.timeline.playing
    }

    fn set_current_time(&mut self, at: Seconds) {
        self.timeline.current = at;
    }

    fn set_max_time(&mut self, max: Seconds) {
        self.timeline.max = max;
    }
}

/// Mirrors playback between the host timeline and the replay service.
/// Pushes are gated on the enabled flag; the read-back is an explicit
/// operator action and always runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeLink {
    enabled: bool,
}

impl TimeLink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Operator finished scrubbing: push the host position. Skipping in
    /// the replay is not instant, so this fires once per gesture rather
    /// than continuously.
    pub fn push_scrub(&self, timeline: &dyn Timeline, out: &mut dyn Dispatch) {
        if !self.enabled {
            return;
        }
        out.post(&Outbound::Playback(PlaybackPayload {
            time: Some(timeline.current_time().0),
            ..PlaybackPayload::default()
        }));
    }

    /// Host play state flipped: mirror it as a paused flag.
    pub fn push_play_state(&self, timeline: &dyn Timeline, out: &mut dyn Dispatch) {
        if !self.enabled {
            return;
        }
        out.post(&Outbound::Playback(PlaybackPayload {
            paused: Some(!timeline.is_playing()),
            ..PlaybackPayload::default()
        }));
    }

    /// Read the service's playback state and map it onto the host
    /// timeline: length becomes the maximum extent, time the position.
    pub fn adjust_timeline(
        &self,
        timeline: &mut dyn Timeline,
        client: &mut dyn Dispatch,
    ) -> CamlinkResult<PlaybackState> {
        let state = client.fetch_playback()?;
        timeline.set_max_time(state.length());
        timeline.set_current_time(state.time());
        Ok(state)
    }
}
