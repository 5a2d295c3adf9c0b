use crate::types::*;
use crate::units::Px;
use uuid::Uuid;

/// Find the nearest snap point within the threshold.
/// Returns the snapped position if within threshold, otherwise the original position.
pub fn find_snap_point(position: Px, snap_points: &[Px], threshold: Px) -> Px {
    let mut best = position;
    let mut best_dist = threshold.0 + 1; // start beyond threshold

    for &point in snap_points {
        let dist = (position.0 - point.0).abs();
        if dist < best_dist {
            best = point;
            best_dist = dist;
        }
    }

    if best_dist <= threshold.0 {
        best
    } else {
        position
    }
}

/// Collect snap points from every track (clip edges) plus the origin and,
/// when given, the playhead.
pub fn collect_snap_points(
    timeline: &Timeline,
    exclude_clip_id: Option<Uuid>,
    playhead: Option<Px>,
) -> Vec<Px> {
    let mut points = vec![Px::ZERO];

    for track in timeline.tracks() {
        for clip in &track.clips {
            if Some(clip.id) == exclude_clip_id {
                continue;
            }
            points.push(clip.position);
            points.push(clip.end());
        }
    }

    points.extend(playhead);

    points.sort();
    points.dedup();
    points
}

/// Snap a dragged clip of width `duration` so that whichever of its edges is
/// closest to a snap point lands on it. Returns the adjusted start.
pub fn snap_clip_start(start: Px, duration: Px, snap_points: &[Px], threshold: Px) -> Px {
    let end = start + duration;
    let mut best = start;
    let mut best_dist = threshold.0 + 1;

    for &point in snap_points {
        let candidates = [
            ((point.0 - start.0).abs(), point),
            ((point.0 - end.0).abs(), point - duration),
        ];
        for (dist, candidate) in candidates {
            if dist < best_dist {
                best = candidate;
                best_dist = dist;
            }
        }
    }

    if best_dist <= threshold.0 {
        best
    } else {
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::AddAt;
    use crate::units::Scale;

    fn make_timeline_with_clips() -> (Timeline, Uuid) {
        let scale = Scale::default();
        let mut timeline = Timeline::new();
        let first = timeline
            .add_clip(
                TrackKind::Video,
                Clip::video("a.mp4", "A", None, Some(3.0), &scale),
                AddAt::Position(Px(40)),
            )
            .unwrap();
        timeline
            .add_clip(
                TrackKind::Sound,
                Clip::sound("b.mp3", "B", Some(2.0), &scale),
                AddAt::Position(Px(200)),
            )
            .unwrap();
        (timeline, first)
    }

    #[test]
    fn snap_to_nearest_point() {
        let points = vec![Px(0), Px(100), Px(500)];
        assert_eq!(find_snap_point(Px(108), &points, Px(10)), Px(100));
    }

    #[test]
    fn no_snap_beyond_threshold() {
        let points = vec![Px(0), Px(100), Px(500)];
        assert_eq!(find_snap_point(Px(300), &points, Px(10)), Px(300));
    }

    #[test]
    fn snap_to_closest_of_two() {
        let points = vec![Px(100), Px(120)];
        assert_eq!(find_snap_point(Px(108), &points, Px(15)), Px(100));
        assert_eq!(find_snap_point(Px(112), &points, Px(15)), Px(120));
    }

    #[test]
    fn empty_snap_points_returns_original() {
        assert_eq!(find_snap_point(Px(42), &[], Px(10)), Px(42));
    }

    #[test]
    fn collect_snap_points_from_all_tracks() {
        let (timeline, _) = make_timeline_with_clips();
        let points = collect_snap_points(&timeline, None, Some(Px(333)));
        assert_eq!(points, vec![Px(0), Px(40), Px(160), Px(200), Px(280), Px(333)]);
    }

    #[test]
    fn collect_excludes_clip() {
        let (timeline, first) = make_timeline_with_clips();
        let points = collect_snap_points(&timeline, Some(first), None);
        assert_eq!(points, vec![Px(0), Px(200), Px(280)]);
    }

    #[test]
    fn clip_end_can_snap() {
        let points = vec![Px(0), Px(300)];
        // start 95 is far from everything, end 295 is 5px from 300
        assert_eq!(snap_clip_start(Px(95), Px(200), &points, Px(8)), Px(100));
    }

    #[test]
    fn closer_edge_wins() {
        let points = vec![Px(100), Px(305)];
        // start is 3px from 100, end is 2px from 305
        assert_eq!(snap_clip_start(Px(103), Px(200), &points, Px(8)), Px(105));
        assert_eq!(snap_clip_start(Px(500), Px(200), &points, Px(8)), Px(500));
    }
}
