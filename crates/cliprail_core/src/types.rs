use crate::error::{CoreError, Result};
use crate::units::{Px, Scale, MIN_CLIP_WIDTH};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length given to clips whose media length is unknown, and to new text clips.
pub const PLACEHOLDER_DURATION_SECS: f64 = 5.0;

/// Tolerance, in seconds, when comparing a trim window against a pixel width.
const TRIM_TOLERANCE_SECS: f64 = 0.05;

// ---------------------------------------------------------------------------
// TrackKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Video,
    Text,
    Sound,
}

impl TrackKind {
    pub const ALL: [TrackKind; 3] = [TrackKind::Video, TrackKind::Text, TrackKind::Sound];
}

// ---------------------------------------------------------------------------
// Text styling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Where a text overlay sits on the output frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScreenPlacement {
    /// Output pixels from the top-left corner.
    Absolute { x: i32, y: i32 },
    /// Percentages of the output frame, 0..=100.
    Relative { x_pct: f64, y_pct: f64 },
}

impl Default for ScreenPlacement {
    fn default() -> Self {
        ScreenPlacement::Relative {
            x_pct: 50.0,
            y_pct: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: u32,
    pub color: String,
    pub background_color: Option<String>,
    pub alignment: TextAlignment,
    pub placement: ScreenPlacement,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 48,
            color: "#ffffff".to_string(),
            background_color: None,
            alignment: TextAlignment::Center,
            placement: ScreenPlacement::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextEffect {
    #[default]
    None,
    Fade,
    SlideUp,
    Typewriter,
    Zoom,
    Bounce,
}

// ---------------------------------------------------------------------------
// ClipContent
// ---------------------------------------------------------------------------

/// The track-specific payload of a clip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipContent {
    Video {
        url: String,
        thumbnail: Option<String>,
        title: String,
    },
    Text {
        text: String,
        style: TextStyle,
        effect: TextEffect,
    },
    Sound {
        url: String,
        name: String,
        volume: u8,
    },
}

impl ClipContent {
    pub fn kind(&self) -> TrackKind {
        match self {
            ClipContent::Video { .. } => TrackKind::Video,
            ClipContent::Text { .. } => TrackKind::Text,
            ClipContent::Sound { .. } => TrackKind::Sound,
        }
    }
}

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

/// A positioned, width-bounded item on one track.
///
/// `position` and `duration` are timeline pixels. `start_time`/`end_time` are
/// seconds into the source media (the trim window) and are only set on
/// media-backed clips; a missing `end_time` means "play to the source end".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub id: Uuid,
    pub position: Px,
    pub duration: Px,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<Px>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    pub content: ClipContent,
}

impl Clip {
    /// A video clip backed by media of `media_secs` length, if known.
    pub fn video(
        url: impl Into<String>,
        title: impl Into<String>,
        thumbnail: Option<String>,
        media_secs: Option<f64>,
        scale: &Scale,
    ) -> Self {
        Self::media_backed(
            ClipContent::Video {
                url: url.into(),
                thumbnail,
                title: title.into(),
            },
            media_secs,
            scale,
        )
    }

    /// A sound clip at full volume.
    pub fn sound(
        url: impl Into<String>,
        name: impl Into<String>,
        media_secs: Option<f64>,
        scale: &Scale,
    ) -> Self {
        Self::media_backed(
            ClipContent::Sound {
                url: url.into(),
                name: name.into(),
                volume: 100,
            },
            media_secs,
            scale,
        )
    }

    /// A text overlay of placeholder length with no width ceiling.
    pub fn text(text: impl Into<String>, style: TextStyle, effect: TextEffect, scale: &Scale) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: Px::ZERO,
            duration: placeholder_width(scale),
            max_duration: None,
            start_time: None,
            end_time: None,
            content: ClipContent::Text {
                text: text.into(),
                style,
                effect,
            },
        }
    }

    fn media_backed(content: ClipContent, media_secs: Option<f64>, scale: &Scale) -> Self {
        let known = media_secs.filter(|s| s.is_finite() && *s > 0.0);
        let (duration, max_duration) = match known {
            Some(secs) => {
                let width = scale.seconds_to_px(secs).max(MIN_CLIP_WIDTH);
                (width, Some(width))
            }
            None => {
                tracing::warn!("media length unknown, using placeholder width");
                (placeholder_width(scale), None)
            }
        };
        Self {
            id: Uuid::new_v4(),
            position: Px::ZERO,
            duration,
            max_duration,
            start_time: Some(0.0),
            end_time: None,
            content,
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.content.kind()
    }

    pub fn end(&self) -> Px {
        self.position + self.duration
    }

    pub fn center(&self) -> Px {
        self.position + self.duration / 2
    }

    /// Half-open intersection test against `[position, position + duration)`.
    pub fn overlaps(&self, position: Px, duration: Px) -> bool {
        self.position < position + duration && self.end() > position
    }

    pub fn is_media_backed(&self) -> bool {
        !matches!(self.content, ClipContent::Text { .. })
    }

    /// The trim window this clip exposes, in source seconds.
    /// Returns `None` for clips without source media.
    pub fn source_window(&self, scale: &Scale) -> Option<(f64, f64)> {
        if !self.is_media_backed() {
            return None;
        }
        let start = self.start_time.unwrap_or(0.0);
        let end = self
            .end_time
            .unwrap_or(start + scale.px_to_seconds(self.duration));
        Some((start, end))
    }

    /// Set the playback volume of a sound clip, clamped to 0..=100.
    pub fn set_volume(&mut self, new_volume: i32) -> Result<()> {
        match &mut self.content {
            ClipContent::Sound { volume, .. } => {
                *volume = new_volume.clamp(0, 100) as u8;
                Ok(())
            }
            _ => Err(CoreError::InvalidOperation(
                "only sound clips carry a volume".into(),
            )),
        }
    }

    /// Same clip content under a fresh id.
    pub fn clone_with_new_id(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}

fn placeholder_width(scale: &Scale) -> Px {
    scale
        .seconds_to_px(PLACEHOLDER_DURATION_SECS)
        .max(MIN_CLIP_WIDTH)
}

// ---------------------------------------------------------------------------
// Track
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub kind: TrackKind,
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            clips: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Clips ordered by position.
    pub fn sorted(&self) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.iter().collect();
        clips.sort_by_key(|c| c.position);
        clips
    }

    pub fn sort(&mut self) {
        self.clips.sort_by_key(|c| c.position);
    }

    /// Right edge of the last clip, or zero for an empty track.
    pub fn end(&self) -> Px {
        self.clips.iter().map(Clip::end).max().unwrap_or(Px::ZERO)
    }

    /// Check every per-track invariant, reporting the first one broken.
    pub fn validate(&self, scale: &Scale) -> Result<()> {
        let violation = |reason: String| CoreError::InvariantViolated {
            track: self.kind,
            reason,
        };

        for clip in &self.clips {
            if clip.kind() != self.kind {
                return Err(CoreError::TrackKindMismatch {
                    expected: self.kind,
                    actual: clip.kind(),
                });
            }
            if clip.duration < MIN_CLIP_WIDTH {
                return Err(violation(format!(
                    "clip {} is {} wide, below {}",
                    clip.id, clip.duration, MIN_CLIP_WIDTH
                )));
            }
            if let Some(max) = clip.max_duration {
                if clip.duration > max {
                    return Err(violation(format!(
                        "clip {} is {} wide, above its source width {}",
                        clip.id, clip.duration, max
                    )));
                }
            }
            if clip.position < Px::ZERO {
                return Err(violation(format!(
                    "clip {} starts at {}",
                    clip.id, clip.position
                )));
            }
            if let (Some(start), Some(end)) = (clip.start_time, clip.end_time) {
                if end <= start {
                    return Err(violation(format!(
                        "clip {} trim window {start}..{end} is empty",
                        clip.id
                    )));
                }
                let width_secs = scale.px_to_seconds(clip.duration);
                if ((end - start) - width_secs).abs() > TRIM_TOLERANCE_SECS {
                    return Err(violation(format!(
                        "clip {} trim window {start}..{end} does not match width {}",
                        clip.id, clip.duration
                    )));
                }
            }
        }

        let sorted = self.sorted();
        for pair in sorted.windows(2) {
            if pair[0].end() > pair[1].position {
                return Err(CoreError::OverlapDetected);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// The three independent tracks of a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timeline {
    pub video: Track,
    pub text: Track,
    pub sound: Track,
}

// ---------------------------------------------------------------------------
// ProjectSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Horizontal zoom of the editing surface.
    #[serde(default = "default_pixels_per_second")]
    pub pixels_per_second: f64,
}

fn default_pixels_per_second() -> f64 {
    crate::units::DEFAULT_PIXELS_PER_SECOND
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub settings: ProjectSettings,
    pub timeline: Timeline,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
