use crate::state::Session;
use anyhow::{Context, Result};
use cliprail_core::editing::AddAt;
use cliprail_core::error::CoreError;
use cliprail_core::resize::{Edge, ResizeOutcome, ResizeSession};
use cliprail_core::snapping::{collect_snap_points, snap_clip_start};
use cliprail_core::types::{Clip, TextEffect, TextStyle, TrackKind};
use cliprail_core::units::Px;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user-facing operation. Scripts carry these as JSON lines, e.g.
/// `{"op":"drag","id":"…","to":320}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    AddVideo {
        url: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        thumbnail: Option<String>,
        #[serde(default)]
        media_secs: Option<f64>,
        #[serde(default)]
        at: Option<AddAt>,
    },
    AddText {
        text: String,
        #[serde(default)]
        style: TextStyle,
        #[serde(default)]
        effect: TextEffect,
        #[serde(default)]
        at: Option<AddAt>,
    },
    AddSound {
        url: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        media_secs: Option<f64>,
        #[serde(default)]
        at: Option<AddAt>,
    },
    Delete {
        id: Uuid,
    },
    RippleDelete {
        id: Uuid,
    },
    Duplicate {
        id: Uuid,
    },
    Split {
        id: Uuid,
        at: Px,
    },
    SplitAtPlayhead {
        track: TrackKind,
    },
    /// Edge drag of `delta` pixels measured from pointer-down.
    Resize {
        id: Uuid,
        edge: Edge,
        delta: Px,
    },
    Drag {
        id: Uuid,
        to: Px,
    },
    Reorder {
        id: Uuid,
        index: usize,
    },
    RemoveGaps {
        track: TrackKind,
    },
    SetVolume {
        id: Uuid,
        volume: i32,
    },
    Seek {
        secs: f64,
    },
    Play,
    Pause,
    Undo,
    Redo,
}

impl EditCommand {
    /// History label for commands that edit the timeline.
    pub fn label(&self) -> &'static str {
        match self {
            EditCommand::AddVideo { .. } => "Add video clip",
            EditCommand::AddText { .. } => "Add text clip",
            EditCommand::AddSound { .. } => "Add sound clip",
            EditCommand::Delete { .. } => "Delete clip",
            EditCommand::RippleDelete { .. } => "Ripple delete",
            EditCommand::Duplicate { .. } => "Duplicate clip",
            EditCommand::Split { .. } | EditCommand::SplitAtPlayhead { .. } => "Split clip",
            EditCommand::Resize { .. } => "Resize clip",
            EditCommand::Drag { .. } => "Move clip",
            EditCommand::Reorder { .. } => "Reorder clips",
            EditCommand::RemoveGaps { .. } => "Remove gaps",
            EditCommand::SetVolume { .. } => "Set volume",
            EditCommand::Seek { .. } => "Seek",
            EditCommand::Play => "Play",
            EditCommand::Pause => "Pause",
            EditCommand::Undo => "Undo",
            EditCommand::Redo => "Redo",
        }
    }
}

/// What applying a command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The timeline changed and one history entry was recorded.
    Edited { clip: Option<Uuid> },
    /// Undo or redo moved through the history log.
    Restored,
    /// Playhead or transport only.
    Transport,
    /// Nothing changed: a split outside a clip, a resize under the
    /// activation threshold, undo at the start of history and so on.
    Unchanged,
}

impl Session {
    /// Apply one command. A command that fails leaves the timeline exactly as
    /// it was and records nothing.
    pub fn apply(&mut self, cmd: EditCommand) -> Result<Applied> {
        let before = self.project.timeline.clone();
        let label = cmd.label();
        let result = self.apply_edit(cmd);
        if let Err(e) = &result {
            tracing::warn!(label, error = %e, "edit rejected, timeline restored");
            self.project.timeline = before;
        }
        result
    }

    fn apply_edit(&mut self, cmd: EditCommand) -> Result<Applied> {
        let label = cmd.label();
        let scale = self.scale();
        let playhead_px = self.playhead.px(&scale);
        let add_at = |at: Option<AddAt>| at.unwrap_or(AddAt::End);

        let edited = match cmd {
            EditCommand::AddVideo {
                url,
                title,
                thumbnail,
                media_secs,
                at,
            } => {
                let clip = Clip::video(url, title, thumbnail, media_secs, &scale);
                Some(self.project.timeline.add_clip(TrackKind::Video, clip, add_at(at))?)
            }
            EditCommand::AddText {
                text,
                style,
                effect,
                at,
            } => {
                let clip = Clip::text(text, style, effect, &scale);
                Some(self.project.timeline.add_clip(TrackKind::Text, clip, add_at(at))?)
            }
            EditCommand::AddSound {
                url,
                name,
                media_secs,
                at,
            } => {
                let clip = Clip::sound(url, name, media_secs, &scale);
                Some(self.project.timeline.add_clip(TrackKind::Sound, clip, add_at(at))?)
            }
            EditCommand::Delete { id } => {
                self.project.timeline.delete_clip(id)?;
                Some(id)
            }
            EditCommand::RippleDelete { id } => {
                self.project.timeline.ripple_delete(id)?;
                Some(id)
            }
            EditCommand::Duplicate { id } => Some(self.project.timeline.duplicate_clip(id)?),
            EditCommand::Split { id, at } => {
                match self.project.timeline.split_clip(id, at, &scale)? {
                    Some(new_id) => Some(new_id),
                    None => return Ok(Applied::Unchanged),
                }
            }
            EditCommand::SplitAtPlayhead { track } => {
                match self.project.timeline.split_at(track, playhead_px, &scale) {
                    Some(new_id) => Some(new_id),
                    None => return Ok(Applied::Unchanged),
                }
            }
            EditCommand::Resize { id, edge, delta } => {
                let clip = self
                    .project
                    .timeline
                    .clip(id)
                    .ok_or(CoreError::ClipNotFound(id))?;
                let session = ResizeSession::begin(clip, edge, scale)
                    .with_threshold(self.config.resize_threshold());
                let requested = match session.finish(delta) {
                    ResizeOutcome::Reverted(_) => return Ok(Applied::Unchanged),
                    ResizeOutcome::Resized(preview) => match edge {
                        Edge::Right => preview.duration,
                        Edge::Left => preview.position,
                    },
                };
                self.project
                    .timeline
                    .resize_clip(id, edge, requested, &scale)?;
                Some(id)
            }
            EditCommand::Drag { id, to } => {
                let to = self.snapped(id, to, playhead_px)?;
                self.project.timeline.drag_clip(id, to)?;
                Some(id)
            }
            EditCommand::Reorder { id, index } => {
                self.project.timeline.reorder_clip(id, index)?;
                Some(id)
            }
            EditCommand::RemoveGaps { track } => {
                self.project.timeline.remove_gaps(track);
                None
            }
            EditCommand::SetVolume { id, volume } => {
                let clip = self
                    .project
                    .timeline
                    .clip_mut(id)
                    .ok_or(CoreError::ClipNotFound(id))?;
                clip.set_volume(volume)?;
                Some(id)
            }
            EditCommand::Seek { secs } => {
                let duration = self.duration_secs();
                self.playhead.seek(secs, duration);
                return Ok(Applied::Transport);
            }
            EditCommand::Play => {
                self.playhead.play();
                return Ok(Applied::Transport);
            }
            EditCommand::Pause => {
                self.playhead.pause();
                return Ok(Applied::Transport);
            }
            EditCommand::Undo => {
                let Some(snapshot) = self.history.undo().cloned() else {
                    return Ok(Applied::Unchanged);
                };
                self.restore(snapshot);
                tracing::info!("undo");
                return Ok(Applied::Restored);
            }
            EditCommand::Redo => {
                let Some(snapshot) = self.history.redo().cloned() else {
                    return Ok(Applied::Unchanged);
                };
                self.restore(snapshot);
                tracing::info!("redo");
                return Ok(Applied::Restored);
            }
        };

        self.project
            .timeline
            .validate(&scale)
            .with_context(|| format!("{label} left the timeline inconsistent"))?;
        self.commit(label);
        Ok(Applied::Edited { clip: edited })
    }

    /// Pull a drag request onto a nearby clip edge or the playhead.
    fn snapped(&self, id: Uuid, to: Px, playhead: Px) -> Result<Px> {
        let threshold = self.config.snap_threshold();
        if threshold <= Px::ZERO {
            return Ok(to);
        }
        let clip = self
            .project
            .timeline
            .clip(id)
            .ok_or(CoreError::ClipNotFound(id))?;
        let points = collect_snap_points(&self.project.timeline, Some(id), Some(playhead));
        Ok(snap_clip_start(to, clip.duration, &points, threshold))
    }

    /// Add media produced outside the editor (a finished generation job) and
    /// record it as one edit.
    pub fn add_generated(&mut self, kind: TrackKind, clip: Clip) -> Result<Uuid> {
        let id = self.project.timeline.add_clip(kind, clip, AddAt::End)?;
        self.commit("Add generated clip");
        Ok(id)
    }
}
