use crate::models::{ColorBand, VideoSummary};

/// A video is "high quality" when at least this share of its comments is
/// positive. Part of the public contract: list badges, ranking cutoffs, and
/// downstream assertions all depend on the exact threshold.
pub const HIGH_QUALITY_THRESHOLD: u8 = 70;

/// Sentinel category that matches every video
pub const ALL_CATEGORIES: &str = "all";

/// Derived positivity percentage used for ranking and badging:
/// `positive_comments / total_comments`, rounded. 0 when the video has no
/// comments.
pub fn positivity_score(video: &VideoSummary) -> u8 {
    if video.comments_count == 0 {
        return 0;
    }
    let pct =
        (video.positive_comments_count as f64 / video.comments_count as f64 * 100.0).round();
    pct.min(100.0) as u8
}

pub fn is_high_quality(video: &VideoSummary) -> bool {
    positivity_score(video) >= HIGH_QUALITY_THRESHOLD
}

/// Color bucket for positivity meters and badges
pub fn score_color_band(percentage: u8) -> ColorBand {
    if percentage >= HIGH_QUALITY_THRESHOLD {
        ColorBand::High
    } else if percentage >= 50 {
        ColorBand::Medium
    } else {
        ColorBand::Low
    }
}

/// Sorts descending by positivity score. Ties keep their original relative
/// order.
pub fn rank(mut videos: Vec<VideoSummary>) -> Vec<VideoSummary> {
    videos.sort_by_key(|v| std::cmp::Reverse(positivity_score(v)));
    videos
}

/// Case-insensitive category filter over title and tag list. The
/// [`ALL_CATEGORIES`] sentinel passes every item unchanged.
pub fn filter_by_category(videos: &[VideoSummary], category: &str) -> Vec<VideoSummary> {
    if category.eq_ignore_ascii_case(ALL_CATEGORIES) {
        return videos.to_vec();
    }
    let needle = category.to_lowercase();
    videos
        .iter()
        .filter(|v| {
            v.title.to_lowercase().contains(&needle)
                || v.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, comments: u64, positive: u64) -> VideoSummary {
        VideoSummary {
            video_id: id.to_string(),
            title: format!("Video {}", id),
            thumbnail: None,
            views: 0,
            likes: 0,
            comments_count: comments,
            positive_comments_count: positive,
            negative_comments_count: 0,
            neutral_comments_count: 0,
            tags: vec![],
            embedded_link: None,
        }
    }

    #[test]
    fn test_positivity_score_rounds() {
        assert_eq!(positivity_score(&video("a", 10, 8)), 80);
        assert_eq!(positivity_score(&video("b", 3, 1)), 33);
        assert_eq!(positivity_score(&video("c", 3, 2)), 67);
    }

    #[test]
    fn test_positivity_score_without_comments_is_zero() {
        assert_eq!(positivity_score(&video("a", 0, 0)), 0);
    }

    #[test]
    fn test_high_quality_threshold_boundary() {
        assert!(is_high_quality(&video("a", 10, 7)));
        assert!(!is_high_quality(&video("b", 10, 6)));
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let ranked = rank(vec![video("low", 10, 3), video("high", 10, 8)]);
        assert_eq!(ranked[0].video_id, "high");
        assert_eq!(ranked[1].video_id, "low");
    }

    #[test]
    fn test_rank_preserves_order_of_ties() {
        let ranked = rank(vec![
            video("first", 10, 5),
            video("second", 20, 10),
            video("third", 10, 9),
        ]);
        assert_eq!(ranked[0].video_id, "third");
        assert_eq!(ranked[1].video_id, "first");
        assert_eq!(ranked[2].video_id, "second");
    }

    #[test]
    fn test_filter_all_sentinel_passes_everything() {
        let videos = vec![video("a", 0, 0), video("b", 0, 0)];
        assert_eq!(filter_by_category(&videos, "all").len(), 2);
        assert_eq!(filter_by_category(&videos, "ALL").len(), 2);
    }

    #[test]
    fn test_filter_matches_title_case_insensitively() {
        let mut rust_video = video("a", 0, 0);
        rust_video.title = "Advanced Rust Patterns".to_string();
        let videos = vec![rust_video, video("b", 0, 0)];
        let filtered = filter_by_category(&videos, "rust");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].video_id, "a");
    }

    #[test]
    fn test_filter_matches_tags() {
        let mut tagged = video("a", 0, 0);
        tagged.tags = vec!["Python".to_string(), "tutorial".to_string()];
        let videos = vec![tagged, video("b", 0, 0)];
        let filtered = filter_by_category(&videos, "python");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].video_id, "a");
    }

    #[test]
    fn test_score_color_bands() {
        assert_eq!(score_color_band(70), ColorBand::High);
        assert_eq!(score_color_band(69), ColorBand::Medium);
        assert_eq!(score_color_band(50), ColorBand::Medium);
        assert_eq!(score_color_band(49), ColorBand::Low);
    }
}
