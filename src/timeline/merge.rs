//! Coalescing unassigned video segments into their neighbours.

use super::{Interval, VideoSegment};

/// Merge runs of empty segments into the preceding assigned segment.
///
/// A run that directly follows an assigned segment extends it. A run after a
/// gap is emitted with the previous segment's URL carried over, and a leading
/// run is kept as one empty segment. Total coverage is preserved.
pub fn merge_empty_intervals(segments: &[VideoSegment]) -> Vec<VideoSegment> {
    let mut merged: Vec<VideoSegment> = Vec::with_capacity(segments.len());
    let mut i = 0;

    while i < segments.len() {
        let segment = &segments[i];
        if !segment.is_empty() {
            merged.push(segment.clone());
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < segments.len() && segments[j].is_empty() {
            j += 1;
        }
        let run = Interval::new(segment.interval.start, segments[j - 1].interval.end);

        let contiguous = merged
            .last()
            .is_some_and(|prev| !prev.is_empty() && prev.interval.end == run.start);

        if contiguous {
            if let Some(prev) = merged.last_mut() {
                prev.interval.end = run.end;
            }
        } else {
            let url = merged.last().and_then(|prev| prev.url.clone());
            merged.push(VideoSegment { interval: run, url });
        }

        i = j;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, url: Option<&str>) -> VideoSegment {
        VideoSegment::new(start, end, url)
    }

    #[test]
    fn test_absorbs_single_empty() {
        let merged = merge_empty_intervals(&[
            seg(0.0, 2.0, Some("A")),
            seg(2.0, 4.0, None),
            seg(4.0, 6.0, Some("B")),
        ]);

        assert_eq!(merged, vec![seg(0.0, 4.0, Some("A")), seg(4.0, 6.0, Some("B"))]);
    }

    #[test]
    fn test_leading_empty_preserved() {
        let merged = merge_empty_intervals(&[seg(0.0, 2.0, None), seg(2.0, 4.0, Some("A"))]);

        assert_eq!(merged, vec![seg(0.0, 2.0, None), seg(2.0, 4.0, Some("A"))]);
    }

    #[test]
    fn test_absorbs_empty_run() {
        let merged = merge_empty_intervals(&[
            seg(0.0, 2.0, Some("A")),
            seg(2.0, 4.0, None),
            seg(4.0, 6.0, None),
            seg(6.0, 8.0, Some("B")),
        ]);

        assert_eq!(merged, vec![seg(0.0, 6.0, Some("A")), seg(6.0, 8.0, Some("B"))]);
    }

    #[test]
    fn test_leading_run_kept_whole() {
        let merged = merge_empty_intervals(&[
            seg(0.0, 1.0, None),
            seg(1.0, 3.0, None),
            seg(3.0, 5.0, Some("A")),
        ]);

        assert_eq!(merged, vec![seg(0.0, 3.0, None), seg(3.0, 5.0, Some("A"))]);
    }

    #[test]
    fn test_trailing_run_absorbed() {
        let merged = merge_empty_intervals(&[seg(0.0, 2.0, Some("A")), seg(2.0, 5.0, None)]);

        assert_eq!(merged, vec![seg(0.0, 5.0, Some("A"))]);
    }

    #[test]
    fn test_gap_carries_previous_url() {
        let merged = merge_empty_intervals(&[
            seg(0.0, 2.0, Some("A")),
            seg(3.0, 4.0, None),
            seg(4.0, 6.0, Some("B")),
        ]);

        assert_eq!(
            merged,
            vec![seg(0.0, 2.0, Some("A")), seg(3.0, 4.0, Some("A")), seg(4.0, 6.0, Some("B"))]
        );
    }

    #[test]
    fn test_nothing_to_merge() {
        let segments = vec![seg(0.0, 2.0, Some("A")), seg(2.0, 4.0, Some("B"))];
        assert_eq!(merge_empty_intervals(&segments), segments);
        assert!(merge_empty_intervals(&[]).is_empty());
    }

    #[test]
    fn test_all_empty() {
        let merged = merge_empty_intervals(&[seg(0.0, 2.0, None), seg(2.0, 4.0, None)]);
        assert_eq!(merged, vec![seg(0.0, 4.0, None)]);
    }
}
