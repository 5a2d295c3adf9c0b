use crate::error::{CoreError, Result};
use crate::placement::{check_overlap, find_available_position, magnetic_positioning, remove_gaps};
use crate::resize::{resize_left, resize_right, right_ceiling, Edge};
use crate::split::{duplicate_clip, split_clip};
use crate::types::*;
use crate::units::{Px, Scale, MIN_CLIP_WIDTH};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a newly added clip should try to go.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AddAt {
    /// After the last clip of the track.
    End,
    /// At the given offset, typically the playhead.
    Position(Px),
}

impl Timeline {
    pub fn track(&self, kind: TrackKind) -> &Track {
        match kind {
            TrackKind::Video => &self.video,
            TrackKind::Text => &self.text,
            TrackKind::Sound => &self.sound,
        }
    }

    pub fn track_mut(&mut self, kind: TrackKind) -> &mut Track {
        match kind {
            TrackKind::Video => &mut self.video,
            TrackKind::Text => &mut self.text,
            TrackKind::Sound => &mut self.sound,
        }
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        [&self.video, &self.text, &self.sound].into_iter()
    }

    /// Look a clip up by id on any track.
    pub fn clip(&self, clip_id: Uuid) -> Option<&Clip> {
        self.tracks()
            .flat_map(|t| t.clips.iter())
            .find(|c| c.id == clip_id)
    }

    /// Mutable lookup for in-place property edits that leave position and
    /// width alone (volume, text, style).
    pub fn clip_mut(&mut self, clip_id: Uuid) -> Option<&mut Clip> {
        let (kind, idx) = self.locate(clip_id)?;
        Some(&mut self.track_mut(kind).clips[idx])
    }

    /// The clip on `kind` covering timeline pixel `at`, if any.
    pub fn clip_at(&self, kind: TrackKind, at: Px) -> Option<&Clip> {
        self.track(kind)
            .clips
            .iter()
            .find(|c| c.position <= at && at < c.end())
    }

    /// Add a clip to the track of its kind. The clip's width is brought within
    /// bounds and it is placed at the first free spot from `at`.
    pub fn add_clip(&mut self, kind: TrackKind, mut clip: Clip, at: AddAt) -> Result<Uuid> {
        if clip.kind() != kind {
            return Err(CoreError::TrackKindMismatch {
                expected: kind,
                actual: clip.kind(),
            });
        }

        let requested = clip.duration;
        if let Some(max) = clip.max_duration {
            clip.duration = clip.duration.min(max);
        }
        clip.duration = clip.duration.max(MIN_CLIP_WIDTH);
        if clip.duration != requested && requested > Px::ZERO {
            // Keep the played source span proportional to the new width.
            if let (Some(start), Some(end)) = (clip.start_time, clip.end_time) {
                let ratio = clip.duration.0 as f64 / requested.0 as f64;
                clip.end_time = Some(start + (end - start) * ratio);
            }
        }

        let track = self.track_mut(kind);
        let preferred = match at {
            AddAt::End => track.end(),
            AddAt::Position(px) => px,
        };
        clip.position = find_available_position(&track.clips, clip.duration, preferred);

        let id = clip.id;
        tracing::info!(?kind, %id, position = clip.position.0, "clip added");
        track.clips.push(clip);
        track.sort();
        Ok(id)
    }

    /// Remove a clip, leaving a gap where it was.
    pub fn delete_clip(&mut self, clip_id: Uuid) -> Result<Clip> {
        let (kind, idx) = self
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        Ok(self.track_mut(kind).clips.remove(idx))
    }

    /// Remove a clip and pull everything after it left by its width.
    pub fn ripple_delete(&mut self, clip_id: Uuid) -> Result<Clip> {
        let (kind, idx) = self
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        let track = self.track_mut(kind);
        let removed = track.clips.remove(idx);
        for clip in track.clips.iter_mut().filter(|c| c.position >= removed.end()) {
            clip.position -= removed.duration;
        }
        Ok(removed)
    }

    /// Clone a clip into the first clear space after it. Returns the new id.
    pub fn duplicate_clip(&mut self, clip_id: Uuid) -> Result<Uuid> {
        let (kind, idx) = self
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        let track = self.track_mut(kind);
        let copy = duplicate_clip(&track.clips[idx], &track.clips);
        let id = copy.id;
        track.clips.push(copy);
        track.sort();
        Ok(id)
    }

    /// Split a clip at `split_px`. Returns the id of the new right half, or
    /// `None` when the split point is not strictly inside the clip or either
    /// half would be narrower than [`MIN_CLIP_WIDTH`].
    pub fn split_clip(&mut self, clip_id: Uuid, split_px: Px, scale: &Scale) -> Result<Option<Uuid>> {
        let (kind, idx) = self
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        Ok(self.split_at_index(kind, idx, split_px, scale))
    }

    /// Split whichever clip on `kind` sits under `split_px`.
    pub fn split_at(&mut self, kind: TrackKind, split_px: Px, scale: &Scale) -> Option<Uuid> {
        let idx = self
            .track(kind)
            .clips
            .iter()
            .position(|c| c.position < split_px && split_px < c.end())?;
        self.split_at_index(kind, idx, split_px, scale)
    }

    fn split_at_index(&mut self, kind: TrackKind, idx: usize, split_px: Px, scale: &Scale) -> Option<Uuid> {
        let track = self.track_mut(kind);
        let (first, second) = split_clip(&track.clips[idx], split_px, scale)?;
        if first.duration < MIN_CLIP_WIDTH || second.duration < MIN_CLIP_WIDTH {
            tracing::debug!(split = split_px.0, "split would leave a clip below minimum width");
            return None;
        }
        let id = second.id;
        track.clips[idx] = first;
        track.clips.insert(idx + 1, second);
        Some(id)
    }

    /// Resize a clip by one edge. For [`Edge::Right`] `requested` is the new
    /// width and clips after it are pushed right by any overlap; for
    /// [`Edge::Left`] it is the new position and the edge stops at the end of
    /// the previous clip.
    pub fn resize_clip(
        &mut self,
        clip_id: Uuid,
        edge: Edge,
        requested: Px,
        scale: &Scale,
    ) -> Result<Clip> {
        let (kind, idx) = self
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        let track = self.track_mut(kind);
        let original = track.clips[idx].clone();

        let resized = match edge {
            Edge::Right => resize_right(&original, requested, scale),
            Edge::Left => {
                let previous_end = track
                    .clips
                    .iter()
                    .filter(|c| c.id != clip_id && c.end() <= original.position)
                    .map(Clip::end)
                    .max()
                    .unwrap_or(Px::ZERO);
                resize_left(&original, requested.max(previous_end), scale)
            }
        };

        if edge == Edge::Right {
            let nearest = track
                .clips
                .iter()
                .filter(|c| c.id != clip_id && c.position >= original.position)
                .map(|c| c.position)
                .min();
            if let Some(nearest) = nearest {
                let deficit = resized.end() - nearest;
                if deficit > Px::ZERO {
                    for clip in track
                        .clips
                        .iter_mut()
                        .filter(|c| c.id != clip_id && c.position >= nearest)
                    {
                        clip.position += deficit;
                    }
                }
            }
        }

        tracing::info!(
            %clip_id,
            ?edge,
            position = resized.position.0,
            duration = resized.duration.0,
            "clip resized"
        );
        track.clips[idx] = resized.clone();
        Ok(resized)
    }

    /// Drop a dragged clip at `requested`, resolving collisions magnetically.
    /// Returns the position the clip landed at.
    pub fn drag_clip(&mut self, clip_id: Uuid, requested: Px) -> Result<Px> {
        let (kind, idx) = self
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        let track = self.track_mut(kind);

        let mut dragged = track.clips[idx].clone();
        let placement = magnetic_positioning(&track.clips, clip_id, requested, dragged.duration);
        dragged.position = placement.target_position;

        let mut clips = placement.adjusted;
        clips.push(dragged);
        track.clips = clips;
        track.sort();
        Ok(placement.target_position)
    }

    /// Put the clips of `kind` in the sequence given by `order`, which must
    /// name every clip of the track once. Each clip takes the slot start of
    /// its new index, or the end of its predecessor if that is later.
    pub fn reorder_clips(&mut self, kind: TrackKind, order: &[Uuid]) -> Result<()> {
        let track = self.track_mut(kind);
        if order.len() != track.clips.len() {
            return Err(CoreError::InvalidOperation(format!(
                "order names {} clips but the track has {}",
                order.len(),
                track.clips.len()
            )));
        }

        let mut slots: Vec<Px> = track.clips.iter().map(|c| c.position).collect();
        slots.sort();

        let mut remaining = track.clips.clone();
        let mut reordered = Vec::with_capacity(order.len());
        let mut cursor = Px::ZERO;
        for (slot, id) in slots.into_iter().zip(order) {
            let at = remaining
                .iter()
                .position(|c| c.id == *id)
                .ok_or(CoreError::ClipNotFound(*id))?;
            let mut clip = remaining.swap_remove(at);
            clip.position = slot.max(cursor);
            cursor = clip.end();
            reordered.push(clip);
        }

        track.clips = reordered;
        Ok(())
    }

    /// Move one clip to `new_index` in its track's sequence.
    pub fn reorder_clip(&mut self, clip_id: Uuid, new_index: usize) -> Result<()> {
        let (kind, _) = self
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        let mut order: Vec<Uuid> = self.track(kind).sorted().iter().map(|c| c.id).collect();
        if new_index >= order.len() {
            return Err(CoreError::InvalidOperation(format!(
                "new_index {} out of bounds (track has {} clips)",
                new_index,
                order.len()
            )));
        }
        order.retain(|id| *id != clip_id);
        order.insert(new_index, clip_id);
        self.reorder_clips(kind, &order)
    }

    /// Move a clip without any magnetic resolution. Fails if the clip would
    /// overlap a neighbour.
    pub fn update_position(&mut self, clip_id: Uuid, position: Px) -> Result<()> {
        let (kind, idx) = self
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        let track = self.track_mut(kind);
        let position = position.non_negative();
        if check_overlap(&track.clips, Some(clip_id), position, track.clips[idx].duration) {
            return Err(CoreError::OverlapDetected);
        }
        track.clips[idx].position = position;
        track.sort();
        Ok(())
    }

    /// Set a clip's width, clamped to its bounds. Fails if the clip would
    /// overlap a neighbour.
    pub fn update_duration(&mut self, clip_id: Uuid, duration: Px, scale: &Scale) -> Result<()> {
        let (kind, idx) = self
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        let track = self.track_mut(kind);
        let clip = &track.clips[idx];

        let mut duration = duration;
        if let Some(ceiling) = right_ceiling(clip, scale) {
            duration = duration.min(ceiling);
        }
        let duration = duration.max(MIN_CLIP_WIDTH);
        if check_overlap(&track.clips, Some(clip_id), clip.position, duration) {
            return Err(CoreError::OverlapDetected);
        }

        let clip = &mut track.clips[idx];
        clip.duration = duration;
        if let (Some(start), Some(_)) = (clip.start_time, clip.end_time) {
            clip.end_time = Some(start + scale.px_to_seconds(duration));
        }
        Ok(())
    }

    /// Replace every clip of `kind` at once. The new set is validated first
    /// and the track is left untouched if it breaks an invariant.
    pub fn set_clips(&mut self, kind: TrackKind, clips: Vec<Clip>, scale: &Scale) -> Result<()> {
        let mut candidate = Track { kind, clips };
        candidate.validate(scale)?;
        candidate.sort();
        *self.track_mut(kind) = candidate;
        Ok(())
    }

    /// Close every gap on a track.
    pub fn remove_gaps(&mut self, kind: TrackKind) {
        let track = self.track_mut(kind);
        track.clips = remove_gaps(&track.clips);
    }

    pub fn timeline_end(&self, kind: TrackKind) -> Px {
        self.track(kind).end()
    }

    /// Furthest clip end across all tracks.
    pub fn duration_px(&self) -> Px {
        self.tracks().map(Track::end).max().unwrap_or(Px::ZERO)
    }

    pub fn duration_seconds(&self, scale: &Scale) -> f64 {
        scale.px_to_seconds(self.duration_px())
    }

    /// Check every track's invariants.
    pub fn validate(&self, scale: &Scale) -> Result<()> {
        for kind in TrackKind::ALL {
            let track = self.track(kind);
            if track.kind != kind {
                return Err(CoreError::InvariantViolated {
                    track: kind,
                    reason: format!("track is labelled {:?}", track.kind),
                });
            }
            track.validate(scale)?;
        }
        Ok(())
    }

    fn locate(&self, clip_id: Uuid) -> Option<(TrackKind, usize)> {
        TrackKind::ALL.into_iter().find_map(|kind| {
            self.track(kind)
                .clips
                .iter()
                .position(|c| c.id == clip_id)
                .map(|idx| (kind, idx))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> Scale {
        Scale::default()
    }

    fn text(duration: i64) -> Clip {
        let mut clip = Clip::text("t", TextStyle::default(), TextEffect::None, &scale());
        clip.duration = Px(duration);
        clip
    }

    fn video(secs: f64) -> Clip {
        Clip::video("a.mp4", "A", None, Some(secs), &scale())
    }

    fn positions(tl: &Timeline, kind: TrackKind) -> Vec<(i64, i64)> {
        tl.track(kind)
            .sorted()
            .iter()
            .map(|c| (c.position.0, c.duration.0))
            .collect()
    }

    /// Text track with clips at the given (position, duration) pairs.
    fn text_track(spans: &[(i64, i64)]) -> (Timeline, Vec<Uuid>) {
        let mut tl = Timeline::new();
        let mut ids = Vec::new();
        for &(pos, dur) in spans {
            let id = tl
                .add_clip(TrackKind::Text, text(dur), AddAt::Position(Px(pos)))
                .unwrap();
            ids.push(id);
        }
        assert_eq!(positions(&tl, TrackKind::Text), spans.to_vec());
        (tl, ids)
    }

    // -----------------------------------------------------------------------
    // add / delete
    // -----------------------------------------------------------------------

    #[test]
    fn add_appends_at_track_end() {
        let mut tl = Timeline::new();
        tl.add_clip(TrackKind::Video, video(3.0), AddAt::End).unwrap();
        tl.add_clip(TrackKind::Video, video(4.0), AddAt::End).unwrap();
        assert_eq!(positions(&tl, TrackKind::Video), vec![(0, 120), (120, 160)]);
    }

    #[test]
    fn add_at_taken_position_finds_gap() {
        let (mut tl, _) = text_track(&[(0, 100), (300, 100)]);
        tl.add_clip(TrackKind::Text, text(120), AddAt::Position(Px(50)))
            .unwrap();
        assert_eq!(
            positions(&tl, TrackKind::Text),
            vec![(0, 100), (100, 120), (300, 100)]
        );
    }

    #[test]
    fn add_to_wrong_track_fails() {
        let mut tl = Timeline::new();
        let result = tl.add_clip(TrackKind::Sound, video(3.0), AddAt::End);
        assert!(matches!(result, Err(CoreError::TrackKindMismatch { .. })));
    }

    #[test]
    fn add_clamps_width() {
        let mut tl = Timeline::new();
        let id = tl.add_clip(TrackKind::Text, text(10), AddAt::End).unwrap();
        assert_eq!(tl.clip(id).unwrap().duration, MIN_CLIP_WIDTH);
    }

    #[test]
    fn add_clamp_shortens_trim_window() {
        let mut tl = Timeline::new();
        let mut clip = video(6.0);
        clip.duration = Px(400);
        clip.start_time = Some(0.0);
        clip.end_time = Some(10.0);
        let id = tl.add_clip(TrackKind::Video, clip, AddAt::End).unwrap();

        let added = tl.clip(id).unwrap();
        assert_eq!(added.duration, Px(240));
        assert!((added.end_time.unwrap() - 6.0).abs() < 1e-9);
        assert!(tl.validate(&scale()).is_ok());
    }

    #[test]
    fn delete_leaves_gap() {
        let (mut tl, ids) = text_track(&[(0, 100), (100, 100), (200, 100)]);
        let removed = tl.delete_clip(ids[1]).unwrap();
        assert_eq!(removed.id, ids[1]);
        assert_eq!(positions(&tl, TrackKind::Text), vec![(0, 100), (200, 100)]);
    }

    #[test]
    fn delete_unknown_clip_fails() {
        let mut tl = Timeline::new();
        let result = tl.delete_clip(Uuid::new_v4());
        assert!(matches!(result, Err(CoreError::ClipNotFound(_))));
    }

    #[test]
    fn ripple_delete_closes_gap() {
        let (mut tl, ids) = text_track(&[(0, 100), (150, 100), (250, 100), (500, 100)]);
        tl.ripple_delete(ids[1]).unwrap();
        assert_eq!(
            positions(&tl, TrackKind::Text),
            vec![(0, 100), (150, 100), (400, 100)]
        );
    }

    // -----------------------------------------------------------------------
    // duplicate / split
    // -----------------------------------------------------------------------

    #[test]
    fn duplicate_goes_into_clear_space() {
        let (mut tl, ids) = text_track(&[(0, 100), (150, 100)]);
        let copy = tl.duplicate_clip(ids[0]).unwrap();
        assert_eq!(tl.clip(copy).unwrap().position, Px(250));
        assert!(tl.validate(&scale()).is_ok());
    }

    #[test]
    fn split_replaces_clip_with_two_halves() {
        let mut tl = Timeline::new();
        let id = tl.add_clip(TrackKind::Video, video(10.0), AddAt::End).unwrap();
        let right = tl.split_clip(id, Px(160), &scale()).unwrap().unwrap();

        let left = tl.clip(id).unwrap();
        let right = tl.clip(right).unwrap();
        assert_eq!((left.position, left.duration), (Px(0), Px(160)));
        assert_eq!((right.position, right.duration), (Px(160), Px(240)));
        assert_eq!(left.end_time, Some(4.0));
        assert_eq!(right.start_time, Some(4.0));
        assert!(tl.validate(&scale()).is_ok());
    }

    #[test]
    fn split_leaving_narrow_half_is_refused() {
        let (mut tl, ids) = text_track(&[(0, 200)]);
        assert_eq!(tl.split_clip(ids[0], Px(50), &scale()).unwrap(), None);
        assert_eq!(tl.split_clip(ids[0], Px(0), &scale()).unwrap(), None);
        assert_eq!(positions(&tl, TrackKind::Text), vec![(0, 200)]);
    }

    #[test]
    fn split_at_playhead_finds_clip() {
        let (mut tl, _) = text_track(&[(0, 200), (200, 200)]);
        assert!(tl.split_at(TrackKind::Text, Px(300), &scale()).is_some());
        assert_eq!(
            positions(&tl, TrackKind::Text),
            vec![(0, 200), (200, 100), (300, 100)]
        );
        assert!(tl.split_at(TrackKind::Text, Px(900), &scale()).is_none());
        assert!(tl.split_at(TrackKind::Video, Px(100), &scale()).is_none());
    }

    // -----------------------------------------------------------------------
    // resize
    // -----------------------------------------------------------------------

    #[test]
    fn right_resize_pushes_followers() {
        let (mut tl, ids) = text_track(&[(0, 100), (120, 100), (400, 100)]);
        tl.resize_clip(ids[0], Edge::Right, Px(200), &scale()).unwrap();
        assert_eq!(
            positions(&tl, TrackKind::Text),
            vec![(0, 200), (200, 100), (480, 100)]
        );
    }

    #[test]
    fn right_resize_into_free_space_moves_nothing() {
        let (mut tl, ids) = text_track(&[(0, 100), (300, 100)]);
        tl.resize_clip(ids[0], Edge::Right, Px(180), &scale()).unwrap();
        assert_eq!(positions(&tl, TrackKind::Text), vec![(0, 180), (300, 100)]);
    }

    #[test]
    fn left_resize_stops_at_previous_clip() {
        let (mut tl, ids) = text_track(&[(0, 100), (200, 100)]);
        let resized = tl.resize_clip(ids[1], Edge::Left, Px(20), &scale()).unwrap();
        assert_eq!(resized.position, Px(100));
        assert_eq!(resized.duration, Px(200));
        assert!(tl.validate(&scale()).is_ok());
    }

    #[test]
    fn left_resize_moves_trim_start() {
        let mut tl = Timeline::new();
        let id = tl.add_clip(TrackKind::Video, video(10.0), AddAt::End).unwrap();
        let resized = tl.resize_clip(id, Edge::Left, Px(80), &scale()).unwrap();
        assert_eq!(resized.position, Px(80));
        assert_eq!(resized.duration, Px(320));
        assert_eq!(resized.start_time, Some(2.0));
    }

    // -----------------------------------------------------------------------
    // drag / reorder
    // -----------------------------------------------------------------------

    #[test]
    fn drag_applies_magnetic_result() {
        let (mut tl, ids) = text_track(&[(0, 100), (200, 100), (600, 150)]);
        let landed = tl.drag_clip(ids[2], Px(120)).unwrap();
        assert_eq!(landed, Px(100));
        assert_eq!(
            positions(&tl, TrackKind::Text),
            vec![(0, 100), (100, 150), (250, 100)]
        );
    }

    #[test]
    fn reorder_swaps_sequence() {
        let (mut tl, ids) = text_track(&[(0, 100), (100, 200), (400, 100)]);
        tl.reorder_clips(TrackKind::Text, &[ids[1], ids[0], ids[2]])
            .unwrap();
        let sorted: Vec<Uuid> = tl.track(TrackKind::Text).sorted().iter().map(|c| c.id).collect();
        assert_eq!(sorted, vec![ids[1], ids[0], ids[2]]);
        assert_eq!(
            positions(&tl, TrackKind::Text),
            vec![(0, 200), (200, 100), (400, 100)]
        );
    }

    #[test]
    fn reorder_rejects_bad_order() {
        let (mut tl, ids) = text_track(&[(0, 100), (100, 100)]);
        assert!(tl.reorder_clips(TrackKind::Text, &[ids[0]]).is_err());
        let result = tl.reorder_clips(TrackKind::Text, &[ids[0], Uuid::new_v4()]);
        assert!(matches!(result, Err(CoreError::ClipNotFound(_))));
        assert_eq!(tl.track(TrackKind::Text).len(), 2);
    }

    #[test]
    fn reorder_single_clip_to_front() {
        let (mut tl, ids) = text_track(&[(0, 100), (100, 100), (200, 100)]);
        tl.reorder_clip(ids[2], 0).unwrap();
        let sorted: Vec<Uuid> = tl.track(TrackKind::Text).sorted().iter().map(|c| c.id).collect();
        assert_eq!(sorted, vec![ids[2], ids[0], ids[1]]);
        assert!(tl.reorder_clip(ids[0], 3).is_err());
    }

    // -----------------------------------------------------------------------
    // direct setters
    // -----------------------------------------------------------------------

    #[test]
    fn update_position_rejects_overlap() {
        let (mut tl, ids) = text_track(&[(0, 100), (200, 100)]);
        let result = tl.update_position(ids[1], Px(50));
        assert!(matches!(result, Err(CoreError::OverlapDetected)));
        tl.update_position(ids[1], Px(100)).unwrap();
        assert_eq!(positions(&tl, TrackKind::Text), vec![(0, 100), (100, 100)]);
    }

    #[test]
    fn update_duration_clamps_and_checks() {
        let (mut tl, ids) = text_track(&[(0, 100), (200, 100)]);
        tl.update_duration(ids[0], Px(10), &scale()).unwrap();
        assert_eq!(tl.clip(ids[0]).unwrap().duration, MIN_CLIP_WIDTH);
        let result = tl.update_duration(ids[0], Px(250), &scale());
        assert!(matches!(result, Err(CoreError::OverlapDetected)));
    }

    #[test]
    fn update_duration_respects_trim_start() {
        let mut tl = Timeline::new();
        let mut clip = video(10.0);
        clip.duration = Px(120);
        clip.start_time = Some(4.0);
        clip.end_time = Some(7.0);
        let id = tl.add_clip(TrackKind::Video, clip, AddAt::End).unwrap();

        tl.update_duration(id, Px(400), &scale()).unwrap();
        let clip = tl.clip(id).unwrap();
        assert_eq!(clip.duration, Px(240));
        assert_eq!(clip.end_time, Some(10.0));
        assert!(tl.validate(&scale()).is_ok());
    }

    #[test]
    fn set_clips_validates() {
        let mut tl = Timeline::new();
        let mut a = text(100);
        let mut b = text(100);
        a.position = Px(0);
        b.position = Px(50);
        let result = tl.set_clips(TrackKind::Text, vec![a.clone(), b.clone()], &scale());
        assert!(result.is_err());
        assert!(tl.track(TrackKind::Text).is_empty());

        b.position = Px(100);
        tl.set_clips(TrackKind::Text, vec![b, a], &scale()).unwrap();
        assert_eq!(positions(&tl, TrackKind::Text), vec![(0, 100), (100, 100)]);
    }

    #[test]
    fn remove_gaps_compacts_track() {
        let (mut tl, _) = text_track(&[(50, 100), (300, 100)]);
        tl.remove_gaps(TrackKind::Text);
        assert_eq!(positions(&tl, TrackKind::Text), vec![(0, 100), (100, 100)]);
    }

    // -----------------------------------------------------------------------
    // duration
    // -----------------------------------------------------------------------

    #[test]
    fn duration_is_max_across_tracks() {
        let mut tl = Timeline::new();
        assert_eq!(tl.duration_px(), Px::ZERO);
        tl.add_clip(TrackKind::Video, video(3.0), AddAt::End).unwrap();
        tl.add_clip(TrackKind::Sound, Clip::sound("a.mp3", "A", Some(8.0), &scale()), AddAt::End)
            .unwrap();
        tl.add_clip(TrackKind::Text, text(100), AddAt::Position(Px(20)))
            .unwrap();
        assert_eq!(tl.timeline_end(TrackKind::Video), Px(120));
        assert_eq!(tl.timeline_end(TrackKind::Text), Px(120));
        assert_eq!(tl.duration_px(), Px(320));
        assert_eq!(tl.duration_seconds(&scale()), 8.0);
    }

    #[test]
    fn clip_at_uses_half_open_span() {
        let (tl, ids) = text_track(&[(100, 100)]);
        assert_eq!(tl.clip_at(TrackKind::Text, Px(100)).map(|c| c.id), Some(ids[0]));
        assert!(tl.clip_at(TrackKind::Text, Px(200)).is_none());
    }
}
