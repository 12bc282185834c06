use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{DetailViewModel, SimilarVideo, SourceWarning, VideoGraph, VideoSummary},
    sequence::RequestSequence,
    services::{graph, providers::VideoDataSource, sentiment},
};

/// Orchestrates the per-video detail bundle.
///
/// Metadata, comments, and similarity relationships are fetched concurrently
/// and joined; each source degrades independently, so one failing source never
/// blocks another's success. The composed view model publishes into a shared
/// slot that only the newest outstanding load may write; superseded loads
/// resolve to `Ok(None)`.
pub struct DetailLoader {
    source: Arc<dyn VideoDataSource>,
    state: Arc<RwLock<Option<DetailViewModel>>>,
    sequence: RequestSequence,
    fallback_score: f64,
}

impl DetailLoader {
    pub fn new(source: Arc<dyn VideoDataSource>, config: &Config) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(None)),
            sequence: RequestSequence::new(),
            fallback_score: config.fallback_similarity_score,
        }
    }

    /// Currently published view model, if any.
    pub async fn current(&self) -> Option<DetailViewModel> {
        self.state.read().await.clone()
    }

    /// Discards the published view model and revokes all outstanding loads.
    /// Called when the user navigates away from the detail screen.
    pub async fn clear(&self) {
        self.sequence.invalidate();
        *self.state.write().await = None;
    }

    /// Loads the detail bundle for `video_id`.
    ///
    /// `known` is the summary from the listing the user clicked; it serves as
    /// the metadata fallback, and without it a metadata failure is the one
    /// path that fails the whole load. Returns `Ok(None)` when a newer load
    /// superseded this one before it could publish.
    ///
    /// There is no timeout layer: a source fetch that never resolves leaves
    /// the whole load pending rather than being treated as failed.
    pub async fn load(
        &self,
        video_id: &str,
        known: Option<VideoSummary>,
    ) -> AppResult<Option<DetailViewModel>> {
        let token = self.sequence.begin();
        tracing::info!(video_id = %video_id, seq = token.seq(), "Detail load started");

        let (video_res, comments_res, similar_res) = tokio::join!(
            self.source.video(video_id),
            self.source.comments(video_id),
            self.source.similar_videos(video_id),
        );

        let mut warnings = Vec::new();

        let video = match video_res {
            Ok(video) => video,
            Err(e) => match known {
                Some(snapshot) => {
                    tracing::warn!(
                        video_id = %video_id,
                        error = %e,
                        "Metadata fetch failed, using listing snapshot"
                    );
                    warnings.push(SourceWarning::MetadataStale);
                    snapshot
                }
                None => {
                    tracing::error!(
                        video_id = %video_id,
                        error = %e,
                        "Detail load failed with no usable metadata"
                    );
                    return Err(AppError::AggregateFailure(format!(
                        "unable to load video {}: {}",
                        video_id, e
                    )));
                }
            },
        };

        let comments = match comments_res {
            Ok(comments) => comments,
            Err(e) => {
                tracing::warn!(video_id = %video_id, error = %e, "Comments source failed");
                warnings.push(SourceWarning::CommentsUnavailable);
                Vec::new()
            }
        };

        let graph = match similar_res {
            Ok(related) => graph::build(&video.video_id, video.thumbnail.as_deref(), &related),
            Err(e) => {
                tracing::warn!(
                    video_id = %video_id,
                    error = %e,
                    "Relationship source failed, falling back to trending"
                );
                warnings.push(SourceWarning::RelationshipsUnavailable);
                self.fallback_graph(&video).await
            }
        };

        let sentiment = sentiment::aggregate(
            video.positive_comments_count as i64,
            video.negative_comments_count as i64,
            video.neutral_comments_count as i64,
        );

        let model = DetailViewModel {
            video,
            comments,
            sentiment,
            graph,
            warnings,
        };

        if !token.is_current() {
            tracing::debug!(
                video_id = %video_id,
                seq = token.seq(),
                "Discarded superseded detail load"
            );
            return Ok(None);
        }

        *self.state.write().await = Some(model.clone());
        tracing::info!(
            video_id = %model.video.video_id,
            comments = model.comments.len(),
            graph_nodes = model.graph.nodes.len(),
            warnings = model.warnings.len(),
            "Detail load completed"
        );
        Ok(Some(model))
    }

    /// Backend-assembled relationship graph, normalized into the view model.
    pub async fn graph_snapshot(&self, video_id: &str) -> AppResult<VideoGraph> {
        let raw = self.source.graph(video_id).await?;
        Ok(graph::normalize_server_graph(video_id, &raw))
    }

    /// Stand-in graph when relationship data is unavailable: trending items
    /// with one nominal similarity score each. A failing fallback degrades
    /// further to a focus-only graph rather than an error.
    async fn fallback_graph(&self, video: &VideoSummary) -> VideoGraph {
        let related = match self.source.random_videos().await {
            Ok(trending) => trending
                .into_iter()
                .map(|v| SimilarVideo {
                    video_id: v.video_id,
                    title: v.title,
                    thumbnail: v.thumbnail,
                    similarity_score: self.fallback_score,
                    views: v.views,
                    likes: v.likes,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Trending fallback failed");
                Vec::new()
            }
        };
        graph::build(&video.video_id, video.thumbnail.as_deref(), &related)
    }
}
