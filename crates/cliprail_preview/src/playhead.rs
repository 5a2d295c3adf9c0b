use cliprail_core::units::{Px, Scale};
use serde::{Deserialize, Serialize};

/// Timeline cursor and transport state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Playhead {
    pub position_secs: f64,
    pub playing: bool,
}

impl Playhead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to `secs`, clamped to `[0, duration_secs]`.
    pub fn seek(&mut self, secs: f64, duration_secs: f64) {
        let upper = duration_secs.max(0.0);
        self.position_secs = if secs.is_finite() {
            secs.clamp(0.0, upper)
        } else {
            0.0
        };
    }

    /// Nearest frame at `fps`.
    pub fn frame(&self, fps: f64) -> i64 {
        (self.position_secs * fps).round() as i64
    }

    /// Playhead offset on the editing surface.
    pub fn px(&self, scale: &Scale) -> Px {
        scale.seconds_to_px(self.position_secs)
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Advance by `dt_secs` while playing. Reaching the end stops playback.
    pub fn advance(&mut self, dt_secs: f64, duration_secs: f64) {
        if !self.playing {
            return;
        }
        self.seek(self.position_secs + dt_secs, duration_secs);
        if self.position_secs >= duration_secs {
            self.playing = false;
        }
    }
}
