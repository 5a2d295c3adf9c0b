//! Polling of remote media-generation jobs.
//!
//! A job moves `pending -> processing -> completed | failed`. Once it
//! completes, its asset reaches the timeline through a single callback; the
//! poller never touches placement or resize logic itself.

use anyhow::{bail, Context, Result};
use cliprail_core::config::PollPolicy;
use cliprail_core::types::{Clip, TrackKind};
use cliprail_core::units::Scale;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Media produced by a finished job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedAsset {
    pub kind: TrackKind,
    pub url: String,
    #[serde(default)]
    pub name: String,
    /// Length of the produced media, when the backend reports it.
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

impl GeneratedAsset {
    /// Build the clip to add. Only video and sound can be generated.
    pub fn into_clip(self, scale: &Scale) -> Result<Clip> {
        match self.kind {
            TrackKind::Video => Ok(Clip::video(self.url, self.name, None, self.duration_secs, scale)),
            TrackKind::Sound => Ok(Clip::sound(self.url, self.name, self.duration_secs, scale)),
            TrackKind::Text => bail!("text clips cannot come from a generation job"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Processing {
        #[serde(default)]
        progress: Option<f32>,
    },
    Completed {
        asset: GeneratedAsset,
    },
    Failed {
        reason: String,
    },
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed { .. } | JobState::Failed { .. })
    }

    /// Jobs only move forward. Repeating a non-terminal state is allowed,
    /// since that is what an unchanged poll looks like.
    pub fn can_transition_to(&self, next: &JobState) -> bool {
        match (self, next) {
            (JobState::Pending, _) => true,
            (JobState::Processing { .. }, JobState::Pending) => false,
            (JobState::Processing { .. }, _) => true,
            _ => false,
        }
    }
}

#[async_trait::async_trait]
pub trait JobBackend: Send + Sync {
    async fn poll(&self, job_id: &str) -> Result<JobState>;
}

/// Poll `job_id` until it finishes, backing off per `policy`, then hand the
/// asset to `on_complete`.
pub async fn track_job<B, F, T>(
    backend: &B,
    job_id: &str,
    policy: &PollPolicy,
    on_complete: F,
) -> Result<T>
where
    B: JobBackend + ?Sized,
    F: FnOnce(GeneratedAsset) -> Result<T>,
{
    let mut state = JobState::Pending;

    for attempt in 0..policy.max_attempts {
        match backend.poll(job_id).await {
            Ok(next) => {
                if !state.can_transition_to(&next) {
                    bail!("job {job_id} went from {state:?} to {next:?}");
                }
                if next != state {
                    tracing::info!(
                        job_id,
                        attempt,
                        state = ?next,
                        terminal = next.is_terminal(),
                        "job state changed"
                    );
                }
                state = next;
            }
            Err(e) => {
                tracing::warn!(job_id, attempt, error = %e, "job poll failed");
            }
        }

        match state {
            JobState::Completed { asset } => return on_complete(asset),
            JobState::Failed { reason } => bail!("job {job_id} failed: {reason}"),
            _ => {}
        }

        tokio::time::sleep(Duration::from_millis(policy.delay_ms(attempt))).await;
    }

    bail!(
        "job {job_id} did not finish after {} polls",
        policy.max_attempts
    )
}

/// Reads job states from `<dir>/<job_id>.json`, written by whatever
/// submitted the job. A missing file means the job is still pending.
pub struct SpoolBackend {
    dir: PathBuf,
}

impl SpoolBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait::async_trait]
impl JobBackend for SpoolBackend {
    async fn poll(&self, job_id: &str) -> Result<JobState> {
        let path = self.dir.join(format!("{job_id}.json"));
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(JobState::Pending),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }
}
