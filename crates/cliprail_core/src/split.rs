use crate::types::Clip;
use crate::units::{Px, Scale};

/// Cut `clip` at timeline pixel `split_px`.
///
/// Returns `None` unless `split_px` lies strictly inside the clip. The left
/// half keeps the original id; the right half gets a fresh one. For
/// media-backed clips the trim window is divided in the same ratio as the
/// pixel span.
pub fn split_clip(clip: &Clip, split_px: Px, scale: &Scale) -> Option<(Clip, Clip)> {
    if split_px <= clip.position || split_px >= clip.end() {
        return None;
    }

    let mut first = clip.clone();
    first.duration = split_px - clip.position;

    let mut second = clip.clone_with_new_id();
    second.position = split_px;
    second.duration = clip.end() - split_px;

    if let Some((start, end)) = clip.source_window(scale) {
        let ratio = first.duration.0 as f64 / clip.duration.0 as f64;
        let boundary = start + (end - start) * ratio;

        first.start_time = Some(start);
        first.end_time = Some(boundary);
        second.start_time = Some(boundary);
        second.end_time = clip.end_time;
    }

    Some((first, second))
}

/// Copy `clip` under a new id, placed right after the original. If that spot
/// is taken, the copy hops past the furthest end of whatever it hits until it
/// sits in clear space.
pub fn duplicate_clip(clip: &Clip, track_clips: &[Clip]) -> Clip {
    let mut copy = clip.clone_with_new_id();
    let mut position = clip.end();

    while let Some(furthest) = track_clips
        .iter()
        .filter(|c| c.overlaps(position, copy.duration))
        .map(Clip::end)
        .max()
    {
        position = furthest;
    }

    copy.position = position;
    copy
}
