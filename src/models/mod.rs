use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Deserializes a counter field leniently: missing or null becomes 0, and a
/// negative wire value is clamped to 0 rather than failing the whole payload.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?.unwrap_or(0);
    Ok(raw.max(0) as u64)
}

/// Deserializes a score field leniently: missing or null becomes 0.0.
fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// A video as it appears in listings and at the top of the detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoSummary {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub views: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub comments_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub positive_comments_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub negative_comments_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub neutral_comments_count: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub embedded_link: Option<String>,
}

impl VideoSummary {
    /// Reconciles counter inconsistencies from the wire: a positive-comment
    /// count never exceeds the total comment count.
    pub fn reconciled(mut self) -> Self {
        if self.positive_comments_count > self.comments_count {
            self.positive_comments_count = self.comments_count;
        }
        self
    }
}

/// A single comment on a video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Normalized sentiment counts with per-category percentages
///
/// Percentages are integer-rounded shares of `total`; all three are 0 when
/// `total` is 0. Whenever `total > 0` the three percentages sum to 100 within
/// rounding error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SentimentBreakdown {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    pub total: u64,
    pub positive_pct: u8,
    pub negative_pct: u8,
    pub neutral_pct: u8,
}

/// One scored relationship item from the similarity endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarVideo {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub similarity_score: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub views: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
}

/// Coarse three-level bucket derived from a continuous similarity score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorBand {
    High,
    Medium,
    Low,
}

/// Renderable graph node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub image: String,
    pub is_focus: bool,
}

/// Renderable weighted graph edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub display_weight: u32,
    pub color_band: ColorBand,
}

/// View-model graph describing how the selected video relates to others
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VideoGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl VideoGraph {
    /// The node representing the currently selected video. Builders guarantee
    /// exactly one per graph.
    pub fn focus(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.is_focus)
    }
}

/// An issued search query. Immutable; only the most recently issued query's
/// response may be accepted into the listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    pub id: Uuid,
    pub text: String,
    pub issued_at: DateTime<Utc>,
    pub seq: u64,
}

/// Where the current listing came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum ListingOrigin {
    #[default]
    Trending,
    Query(SearchQuery),
    Analysis {
        url: String,
    },
}

/// Shared list-screen state, replaced wholesale by each accepted response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchListing {
    pub videos: Vec<VideoSummary>,
    pub origin: ListingOrigin,
    /// User-visible failure of the last issued request; retrying re-issues
    /// the same operation from scratch.
    pub error: Option<String>,
}

/// Non-fatal warning that one detail source degraded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceWarning {
    CommentsUnavailable,
    RelationshipsUnavailable,
    MetadataStale,
}

impl Display for SourceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            SourceWarning::CommentsUnavailable => "comments unavailable",
            SourceWarning::RelationshipsUnavailable => {
                "relationships unavailable, showing alternatives"
            }
            SourceWarning::MetadataStale => "metadata may be out of date",
        };
        write!(f, "{}", message)
    }
}

/// Composed per-video detail bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailViewModel {
    pub video: VideoSummary,
    pub comments: Vec<Comment>,
    pub sentiment: SentimentBreakdown,
    pub graph: VideoGraph,
    pub warnings: Vec<SourceWarning>,
}

// ============================================================================
// Raw backend response envelopes
// ============================================================================

/// `GET /videos/random/` and `POST /videos/` → `{videos: [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct VideosResponse {
    #[serde(default)]
    pub videos: Vec<VideoSummary>,
}

/// `GET /videos/{id}/` → `{video: {...}}`
#[derive(Debug, Deserialize)]
pub struct VideoResponse {
    pub video: VideoSummary,
}

/// `GET /videos/{id}/comments/` → `{comments: [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// `GET /videos/{id}/similar/` → `{similar_videos: [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct SimilarVideosResponse {
    #[serde(default)]
    pub similar_videos: Vec<SimilarVideo>,
}

/// `POST /analyze-youtube/` → `{video: {...}, comments: [...]}`
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub video: VideoSummary,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Backend-assembled graph payload from `GET /videos/{id}/graph/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<RawGraphNode>,
    #[serde(default)]
    pub edges: Vec<RawGraphEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGraphNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Raw graph edge; `value` is a similarity percentage on the 0..=100 scale
#[derive(Debug, Clone, Deserialize)]
pub struct RawGraphEdge {
    pub from: String,
    pub to: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub value: f64,
}
