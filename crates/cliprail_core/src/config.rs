use crate::error::{CoreError, Result};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::resize::RESIZE_ACTIVATION_THRESHOLD;
use crate::units::Px;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Editor tunables. Every field has a default, so a config file only needs
/// the keys it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Snapshots kept by the undo log.
    pub history_limit: usize,
    /// Pointer travel below which a resize gesture is discarded.
    pub resize_threshold_px: i64,
    /// Distance at which a dragged clip edge snaps to a neighbour. Zero
    /// disables snapping.
    pub snap_threshold_px: i64,
    pub job_poll: PollPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            resize_threshold_px: RESIZE_ACTIVATION_THRESHOLD.0,
            snap_threshold_px: 8,
            job_poll: PollPolicy::default(),
        }
    }
}

/// Backoff used while waiting on a remote generation job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollPolicy {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
            max_attempts: 40,
        }
    }
}

impl PollPolicy {
    /// Delay before poll number `attempt` (zero-based), doubling each time
    /// up to `max_delay_ms`.
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let factor = 1u64.checked_shl(attempt.min(32)).unwrap_or(u64::MAX);
        self.initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }
}

impl EditorConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: EditorConfig = serde_json::from_str(&data)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.history_limit == 0 {
            return Err(CoreError::InvalidOperation(
                "history_limit must be at least 1".into(),
            ));
        }
        if self.resize_threshold_px < 0 || self.snap_threshold_px < 0 {
            return Err(CoreError::InvalidOperation(
                "thresholds must not be negative".into(),
            ));
        }
        Ok(())
    }

    pub fn resize_threshold(&self) -> Px {
        Px(self.resize_threshold_px)
    }

    pub fn snap_threshold(&self) -> Px {
        Px(self.snap_threshold_px)
    }
}
