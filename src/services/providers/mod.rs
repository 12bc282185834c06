/// Video data source abstraction
///
/// The discovery core never talks to the network directly: every backend
/// endpoint is reached through this capability, so callers can inject
/// transport, auth, and environment concerns — or a scripted source in tests.
use crate::{
    error::AppResult,
    models::{Comment, GraphData, SimilarVideo, VideoSummary},
};

#[cfg(test)]
use mockall::automock;

pub mod http;

pub use http::HttpVideoSource;

/// Trait for video data sources
///
/// Implementations must return well-typed values; tolerating malformed or
/// partial payloads is the parsing boundary's job, not the core's.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VideoDataSource: Send + Sync {
    /// Trending/random listing shown before any query has been issued
    async fn random_videos(&self) -> AppResult<Vec<VideoSummary>>;

    /// Prompt-driven search
    async fn search_videos(&self, prompt: &str, quick_mode: bool)
        -> AppResult<Vec<VideoSummary>>;

    /// Fresh metadata for one video
    async fn video(&self, video_id: &str) -> AppResult<VideoSummary>;

    /// Comment list for one video
    async fn comments(&self, video_id: &str) -> AppResult<Vec<Comment>>;

    /// Scored similarity relationships for one video
    async fn similar_videos(&self, video_id: &str) -> AppResult<Vec<SimilarVideo>>;

    /// Backend-assembled relationship graph for one video
    async fn graph(&self, video_id: &str) -> AppResult<GraphData>;

    /// One-off analysis of an external video URL
    async fn analyze_url(&self, url: &str) -> AppResult<(VideoSummary, Vec<Comment>)>;
}
