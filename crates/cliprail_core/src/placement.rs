//! Overlap detection and magnetic placement of clips within one track.
//!
//! Everything here is a pure function of a track's clips: callers pass the
//! current clips in and apply the returned positions themselves.

use crate::types::Clip;
use crate::units::Px;
use uuid::Uuid;

/// Outcome of resolving a drop: where the dragged clip lands and the other
/// clips of the track with any positions the drop pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub target_position: Px,
    /// Every clip of the track except the dragged one, in input order.
    pub adjusted: Vec<Clip>,
}

/// True if any clip other than `exclude_id` intersects
/// `[position, position + duration)`. Touching edges do not count.
pub fn check_overlap(clips: &[Clip], exclude_id: Option<Uuid>, position: Px, duration: Px) -> bool {
    clips
        .iter()
        .filter(|c| Some(c.id) != exclude_id)
        .any(|c| c.overlaps(position, duration))
}

/// `preferred` if it is free, otherwise the first gap from the origin wide
/// enough for `duration`, otherwise right after the last clip.
pub fn find_available_position(clips: &[Clip], duration: Px, preferred: Px) -> Px {
    let preferred = preferred.non_negative();
    if !check_overlap(clips, None, preferred, duration) {
        return preferred;
    }

    let mut sorted: Vec<&Clip> = clips.iter().collect();
    sorted.sort_by_key(|c| c.position);

    let mut cursor = Px::ZERO;
    for clip in sorted {
        if clip.position - cursor >= duration {
            return cursor;
        }
        cursor = cursor.max(clip.end());
    }
    cursor
}

/// Resolve dropping clip `dragged_id` (of width `duration`) at `requested`.
///
/// Rules, first match wins:
/// 1. The drop spans the gap between two neighbours: land flush against the
///    left neighbour, pushing the right side by the exact deficit if the gap
///    is too narrow.
/// 2. The drop ends at or before the first clip: land as requested.
/// 3. The drop overlaps the first clip from its left edge: push the whole
///    track right by the overlap and land as requested.
/// 4. The drop overlaps one clip: land flush after it when the dragged centre
///    is right of its centre, otherwise flush before it. A side that is too
///    narrow is handled like rule 1 (at the origin the whole track is pushed).
/// 5. No overlap: land as requested.
///
/// Negative requests are clamped to the origin. Inputs are never mutated.
pub fn magnetic_positioning(
    clips: &[Clip],
    dragged_id: Uuid,
    requested: Px,
    duration: Px,
) -> Placement {
    let start = requested.non_negative();
    let mut adjusted: Vec<Clip> = clips
        .iter()
        .filter(|c| c.id != dragged_id)
        .cloned()
        .collect();

    let mut spans: Vec<Span> = adjusted
        .iter()
        .map(|c| Span {
            start: c.position,
            end: c.end(),
        })
        .collect();
    spans.sort_by_key(|s| s.start);

    let resolution = resolve(&spans, start, duration);
    tracing::debug!(
        rule = resolution.rule,
        requested = requested.0,
        target = resolution.target.0,
        "magnetic placement"
    );

    if let Some(shift) = resolution.shift {
        for clip in adjusted.iter_mut().filter(|c| c.position >= shift.from) {
            clip.position += shift.by;
        }
    }

    Placement {
        target_position: resolution.target,
        adjusted,
    }
}

/// Compact a track: sort by position and butt every clip against the
/// previous one, the first at the origin.
pub fn remove_gaps(clips: &[Clip]) -> Vec<Clip> {
    let mut compacted = clips.to_vec();
    compacted.sort_by_key(|c| c.position);

    let mut cursor = Px::ZERO;
    for clip in &mut compacted {
        clip.position = cursor;
        cursor = clip.end();
    }
    compacted
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: Px,
    end: Px,
}

impl Span {
    fn center(&self) -> Px {
        self.start + (self.end - self.start) / 2
    }
}

/// Move every clip starting at or after `from` right by `by`.
#[derive(Debug, Clone, Copy)]
struct Shift {
    from: Px,
    by: Px,
}

#[derive(Debug)]
struct Resolution {
    rule: &'static str,
    target: Px,
    shift: Option<Shift>,
}

fn resolve(spans: &[Span], start: Px, duration: Px) -> Resolution {
    let place = |rule, target| Resolution {
        rule,
        target,
        shift: None,
    };

    let Some(first) = spans.first().copied() else {
        return place("empty-track", start);
    };

    let end = start + duration;
    let center = start + duration / 2;

    for pair in spans.windows(2) {
        let (gap_start, gap_end) = (pair[0].end, pair[1].start);
        let spans_gap = (center >= gap_start && center <= gap_end)
            || (start >= gap_start && start < gap_end)
            || (end > gap_start && end <= gap_end)
            || (start <= gap_start && end >= gap_end);
        if spans_gap {
            return insert_into_gap("between-neighbours", gap_start, gap_end, duration);
        }
    }

    if end <= first.start {
        return place("before-first", start);
    }

    if start < first.start {
        return Resolution {
            rule: "overlap-first-left-edge",
            target: start,
            shift: Some(Shift {
                from: first.start,
                by: end - first.start,
            }),
        };
    }

    if let Some(idx) = spans.iter().position(|s| s.start < end && s.end > start) {
        let hit = spans[idx];
        if center > hit.center() {
            return match spans.get(idx + 1) {
                Some(next) => insert_into_gap("flush-after", hit.end, next.start, duration),
                None => place("flush-after", hit.end),
            };
        }

        let gap_start = if idx == 0 { Px::ZERO } else { spans[idx - 1].end };
        let flush = hit.start - duration;
        if flush >= gap_start {
            return place("flush-before", flush);
        }
        return insert_into_gap("flush-before", gap_start, hit.start, duration);
    }

    place("no-overlap", start)
}

fn insert_into_gap(rule: &'static str, gap_start: Px, gap_end: Px, duration: Px) -> Resolution {
    let deficit = duration - (gap_end - gap_start);
    Resolution {
        rule,
        target: gap_start,
        shift: (deficit > Px::ZERO).then_some(Shift {
            from: gap_end,
            by: deficit,
        }),
    }
}
