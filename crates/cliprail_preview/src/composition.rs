//! Frame-based view of a timeline for the external renderer.
//!
//! The renderer works in frames, the editor in pixels. A manifest is built
//! from one committed timeline and carries both so the renderer never has to
//! know the editing scale.

use cliprail_core::types::{ClipContent, TextEffect, TextStyle, Timeline, Track, TrackKind};
use cliprail_core::units::{Px, Scale};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a layer shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSource {
    Media {
        url: String,
    },
    Text {
        text: String,
        style: TextStyle,
        effect: TextEffect,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerEntry {
    pub id: Uuid,
    pub source: LayerSource,
    pub position: Px,
    pub duration: Px,
    pub from_frame: i64,
    pub duration_in_frames: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u8>,
}

impl LayerEntry {
    fn from_clip(clip: &cliprail_core::types::Clip, scale: &Scale) -> Self {
        let (source, volume) = match &clip.content {
            ClipContent::Video { url, .. } => (LayerSource::Media { url: url.clone() }, None),
            ClipContent::Sound { url, volume, .. } => {
                (LayerSource::Media { url: url.clone() }, Some(*volume))
            }
            ClipContent::Text {
                text,
                style,
                effect,
            } => (
                LayerSource::Text {
                    text: text.clone(),
                    style: style.clone(),
                    effect: *effect,
                },
                None,
            ),
        };
        // Round the edges, not the width: clips touching in pixels touch in frames.
        let from_frame = scale.px_to_frames(clip.position);
        let end_frame = scale.px_to_frames(clip.end());
        Self {
            id: clip.id,
            source,
            position: clip.position,
            duration: clip.duration,
            from_frame,
            duration_in_frames: (end_frame - from_frame).max(1),
            start_time: clip.start_time,
            end_time: clip.end_time,
            volume,
        }
    }

    pub fn end_frame(&self) -> i64 {
        self.from_frame + self.duration_in_frames
    }

    pub fn contains_frame(&self, frame: i64) -> bool {
        self.from_frame <= frame && frame < self.end_frame()
    }
}

/// A layer under a given frame, with where to seek in its source.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveLayer<'a> {
    pub track: TrackKind,
    pub entry: &'a LayerEntry,
    /// Seconds into the source media; `None` for text.
    pub source_offset_secs: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionManifest {
    pub fps: f64,
    pub pixels_per_second: f64,
    pub total_frames: i64,
    pub video: Vec<LayerEntry>,
    pub text: Vec<LayerEntry>,
    pub sound: Vec<LayerEntry>,
}

impl CompositionManifest {
    pub fn build(timeline: &Timeline, scale: &Scale) -> Self {
        let layers = |track: &Track| -> Vec<LayerEntry> {
            track
                .sorted()
                .into_iter()
                .map(|c| LayerEntry::from_clip(c, scale))
                .collect()
        };

        let video = layers(&timeline.video);
        let text = layers(&timeline.text);
        let sound = layers(&timeline.sound);
        let total_frames = video
            .iter()
            .chain(&text)
            .chain(&sound)
            .map(LayerEntry::end_frame)
            .max()
            .unwrap_or(0);

        tracing::debug!(
            video = video.len(),
            text = text.len(),
            sound = sound.len(),
            total_frames,
            "composition manifest built"
        );

        Self {
            fps: scale.frames_per_second,
            pixels_per_second: scale.pixels_per_second,
            total_frames,
            video,
            text,
            sound,
        }
    }

    pub fn layers(&self, kind: TrackKind) -> &[LayerEntry] {
        match kind {
            TrackKind::Video => &self.video,
            TrackKind::Text => &self.text,
            TrackKind::Sound => &self.sound,
        }
    }

    /// Every layer covering `frame`, video first, then text, then sound.
    pub fn active_at(&self, frame: i64) -> Vec<ActiveLayer<'_>> {
        TrackKind::ALL
            .into_iter()
            .flat_map(|track| {
                self.layers(track)
                    .iter()
                    .filter(move |e| e.contains_frame(frame))
                    .map(move |entry| ActiveLayer {
                        track,
                        entry,
                        source_offset_secs: entry.start_time.map(|start| {
                            start + (frame - entry.from_frame) as f64 / self.fps
                        }),
                    })
            })
            .collect()
    }

    pub fn duration_secs(&self) -> f64 {
        self.total_frames as f64 / self.fps
    }
}
