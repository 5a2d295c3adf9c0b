use cliprail_core::config::EditorConfig;
use cliprail_core::history::History;
use cliprail_core::types::{Project, Timeline};
use cliprail_core::units::Scale;
use cliprail_preview::Playhead;

/// Everything one editing session owns.
pub struct Session {
    pub project: Project,
    pub history: History,
    pub playhead: Playhead,
    pub config: EditorConfig,
}

impl Session {
    pub fn new(project: Project, config: EditorConfig) -> Self {
        let history = History::new(project.timeline.clone(), config.history_limit);
        Self {
            project,
            history,
            playhead: Playhead::new(),
            config,
        }
    }

    pub fn scale(&self) -> Scale {
        self.project.scale()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.project.timeline
    }

    pub fn duration_secs(&self) -> f64 {
        self.project.timeline.duration_seconds(&self.scale())
    }

    /// Commit the current timeline as one undo step.
    pub(crate) fn commit(&mut self, label: &str) {
        self.history.record(label, &self.project.timeline);
        self.clamp_playhead();
        tracing::info!(label, entries = self.history.len(), "edit committed");
    }

    /// Replace the live timeline with a snapshot from the history log.
    pub(crate) fn restore(&mut self, snapshot: Timeline) {
        self.project.timeline = snapshot;
        self.clamp_playhead();
    }

    fn clamp_playhead(&mut self) {
        let duration = self.duration_secs();
        let position = self.playhead.position_secs;
        self.playhead.seek(position, duration);
    }
}
