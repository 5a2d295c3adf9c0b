//! Edge-drag resizing with media trim bookkeeping.

use crate::types::Clip;
use crate::units::{Px, Scale, MIN_CLIP_WIDTH};
use serde::{Deserialize, Serialize};

/// Pointer travel at or below which an edge drag counts as a stray click.
pub const RESIZE_ACTIVATION_THRESHOLD: Px = Px(5);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Left,
    Right,
}

/// Drag the right edge so the clip becomes `requested_duration` wide.
///
/// The width is floored at [`MIN_CLIP_WIDTH`] and capped by the source media
/// left after the trim start. Media-backed clips get their `end_time` moved
/// to match.
pub fn resize_right(clip: &Clip, requested_duration: Px, scale: &Scale) -> Clip {
    let mut duration = requested_duration;
    if let Some(ceiling) = right_ceiling(clip, scale) {
        duration = duration.min(ceiling);
    }
    let duration = duration.max(MIN_CLIP_WIDTH);

    let mut resized = clip.clone();
    resized.duration = duration;
    if let Some(start) = resized.start_time {
        resized.end_time = Some(start + scale.px_to_seconds(duration));
    }
    resized
}

/// Drag the left edge to `requested_position`, keeping the right edge fixed.
///
/// The new position never goes below the origin, never exposes media before
/// the source start, never widens past `max_duration` and never narrows below
/// [`MIN_CLIP_WIDTH`]. The trim start moves with the edge; a defined
/// `end_time` stays put.
pub fn resize_left(clip: &Clip, requested_position: Px, scale: &Scale) -> Clip {
    let right = clip.end();

    let mut lowest = Px::ZERO;
    if let Some(max) = clip.max_duration {
        lowest = lowest.max(right - max);
    }
    if let Some(start) = clip.start_time {
        lowest = lowest.max(clip.position - scale.seconds_to_px(start));
    }
    let highest = right - MIN_CLIP_WIDTH;
    let position = requested_position.max(lowest).min(highest);

    let mut resized = clip.clone();
    resized.position = position;
    resized.duration = right - position;
    if let Some(start) = clip.start_time {
        let mut shifted = (start + scale.px_to_seconds(position - clip.position)).max(0.0);
        if let Some(max) = clip.max_duration {
            shifted = shifted.min(scale.px_to_seconds(max));
        }
        resized.start_time = Some(shifted);
    }
    resized
}

/// Widest a media clip may get given how much of its source the trim start
/// has already used.
pub(crate) fn right_ceiling(clip: &Clip, scale: &Scale) -> Option<Px> {
    let max = clip.max_duration?;
    let consumed = scale.seconds_to_px(clip.start_time.unwrap_or(0.0));
    Some((max - consumed).max(MIN_CLIP_WIDTH))
}

// ---------------------------------------------------------------------------
// ResizeSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ResizeOutcome {
    Resized(Clip),
    /// The drag never passed the activation threshold or was cancelled;
    /// carries the clip as it was at pointer-down.
    Reverted(Clip),
}

impl ResizeOutcome {
    pub fn into_clip(self) -> Clip {
        match self {
            ResizeOutcome::Resized(clip) | ResizeOutcome::Reverted(clip) => clip,
        }
    }

    pub fn is_reverted(&self) -> bool {
        matches!(self, ResizeOutcome::Reverted(_))
    }
}

/// One pointer-down to pointer-up edge drag on a single clip.
///
/// All deltas are measured from the pointer-down location, against the clip
/// as it was when the session began.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    original: Clip,
    edge: Edge,
    scale: Scale,
    threshold: Px,
}

impl ResizeSession {
    pub fn begin(clip: &Clip, edge: Edge, scale: Scale) -> Self {
        Self {
            original: clip.clone(),
            edge,
            scale,
            threshold: RESIZE_ACTIVATION_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: Px) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn original(&self) -> &Clip {
        &self.original
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// The clip as it should be drawn `delta` pixels into the drag. Clamped on
    /// every call, so the preview never exceeds the source bounds.
    pub fn preview(&self, delta: Px) -> Clip {
        match self.edge {
            Edge::Right => resize_right(&self.original, self.original.duration + delta, &self.scale),
            Edge::Left => resize_left(&self.original, self.original.position + delta, &self.scale),
        }
    }

    pub fn finish(self, delta: Px) -> ResizeOutcome {
        if delta.0.abs() <= self.threshold.0 {
            return ResizeOutcome::Reverted(self.original);
        }
        ResizeOutcome::Resized(self.preview(delta))
    }

    /// Abandon the drag, restoring both position and width.
    pub fn cancel(self) -> ResizeOutcome {
        ResizeOutcome::Reverted(self.original)
    }
}
