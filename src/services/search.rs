use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Comment, ListingOrigin, SearchListing, SearchQuery, VideoSummary},
    sequence::RequestSequence,
    services::providers::VideoDataSource,
};

/// Debounced search coordinator for the list screen.
///
/// Text-input changes funnel through [`submit`](Self::submit); each submission
/// restarts the quiet window, and only when the window elapses without further
/// input does exactly one query go out, carrying the latest text. Blank input
/// falls back to the trending listing instead of a search. A response may
/// publish into the shared listing only while its query is still the newest
/// issued one; in-flight requests are never aborted, just suppressed.
pub struct SearchController {
    input_tx: mpsc::UnboundedSender<String>,
    listing: Arc<RwLock<SearchListing>>,
    sequence: RequestSequence,
    source: Arc<dyn VideoDataSource>,
}

impl SearchController {
    /// Creates the controller and spawns its debounce worker.
    pub fn new(source: Arc<dyn VideoDataSource>, config: &Config) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let listing = Arc::new(RwLock::new(SearchListing::default()));
        let sequence = RequestSequence::new();

        let worker = DebounceWorker {
            input_rx,
            quiet_window: Duration::from_millis(config.search_debounce_ms),
            source: Arc::clone(&source),
            listing: Arc::clone(&listing),
            sequence: sequence.clone(),
            quick_mode: config.search_quick_mode,
        };
        tokio::spawn(worker.run());

        Self {
            input_tx,
            listing,
            sequence,
            source,
        }
    }

    /// Feeds one text-input change into the debouncer.
    pub fn submit(&self, text: impl Into<String>) {
        // A closed channel means the worker is gone and the controller is
        // being torn down; there is nothing left to deliver to.
        let _ = self.input_tx.send(text.into());
    }

    /// Snapshot of the current listing.
    pub async fn listing(&self) -> SearchListing {
        self.listing.read().await.clone()
    }

    /// Revokes every outstanding query's right to mutate the listing. Called
    /// when the user selects a video or navigates away.
    pub fn invalidate(&self) {
        self.sequence.invalidate();
    }

    /// Loads the trending listing immediately: the initial screen state, and
    /// the retry affordance after a failed load.
    pub async fn load_trending(&self) -> AppResult<()> {
        let token = self.sequence.begin();
        let videos = self.source.random_videos().await?;
        if token.is_current() {
            *self.listing.write().await = SearchListing {
                videos,
                origin: ListingOrigin::Trending,
                error: None,
            };
        }
        Ok(())
    }

    /// Analyzes an external video URL and replaces the listing with the
    /// single analyzed video. Returns the analyzed video and its comments so
    /// the caller can open the detail view directly.
    pub async fn analyze_url(&self, url: &str) -> AppResult<(VideoSummary, Vec<Comment>)> {
        if url.trim().is_empty() {
            return Err(AppError::InvalidInput("URL cannot be empty".to_string()));
        }

        let token = self.sequence.begin();
        let (video, comments) = self.source.analyze_url(url).await?;
        if token.is_current() {
            *self.listing.write().await = SearchListing {
                videos: vec![video.clone()],
                origin: ListingOrigin::Analysis {
                    url: url.to_string(),
                },
                error: None,
            };
        }
        Ok((video, comments))
    }
}

/// Coalesces input events into at most one outbound query per quiet window.
struct DebounceWorker {
    input_rx: mpsc::UnboundedReceiver<String>,
    quiet_window: Duration,
    source: Arc<dyn VideoDataSource>,
    listing: Arc<RwLock<SearchListing>>,
    sequence: RequestSequence,
    quick_mode: bool,
}

impl DebounceWorker {
    async fn run(mut self) {
        'outer: loop {
            let Some(mut text) = self.input_rx.recv().await else {
                break;
            };
            // Every further input restarts the quiet window; the timer only
            // wins once input has gone quiet.
            loop {
                tokio::select! {
                    maybe = self.input_rx.recv() => {
                        match maybe {
                            Some(newer) => text = newer,
                            None => break 'outer,
                        }
                    }
                    _ = tokio::time::sleep(self.quiet_window) => break,
                }
            }
            self.issue(text);
        }
    }

    /// Issues the coalesced query on its own task so a new quiet window can
    /// start while the request is still in flight.
    fn issue(&self, text: String) {
        let token = self.sequence.begin();
        let source = Arc::clone(&self.source);
        let listing = Arc::clone(&self.listing);
        let quick_mode = self.quick_mode;

        tokio::spawn(async move {
            let trimmed = text.trim().to_string();
            if trimmed.is_empty() {
                match source.random_videos().await {
                    Ok(videos) => {
                        if token.is_current() {
                            *listing.write().await = SearchListing {
                                videos,
                                origin: ListingOrigin::Trending,
                                error: None,
                            };
                        } else {
                            tracing::debug!("Discarded stale trending response");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Trending fetch failed");
                        if token.is_current() {
                            listing.write().await.error = Some(e.to_string());
                        }
                    }
                }
                return;
            }

            let query = SearchQuery {
                id: Uuid::new_v4(),
                text: trimmed,
                issued_at: Utc::now(),
                seq: token.seq(),
            };
            tracing::info!(query_id = %query.id, text = %query.text, "Issuing search query");

            match source.search_videos(&query.text, quick_mode).await {
                Ok(videos) => {
                    if token.is_current() {
                        *listing.write().await = SearchListing {
                            videos,
                            origin: ListingOrigin::Query(query),
                            error: None,
                        };
                    } else {
                        tracing::debug!(query_id = %query.id, "Discarded stale search response");
                    }
                }
                Err(e) => {
                    tracing::warn!(query_id = %query.id, error = %e, "Search failed");
                    if token.is_current() {
                        listing.write().await.error = Some(e.to_string());
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, GraphData, SimilarVideo, VideoSummary};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn video(id: &str) -> VideoSummary {
        VideoSummary {
            video_id: id.to_string(),
            title: format!("Video {}", id),
            thumbnail: None,
            views: 0,
            likes: 0,
            comments_count: 0,
            positive_comments_count: 0,
            negative_comments_count: 0,
            neutral_comments_count: 0,
            tags: vec![],
            embedded_link: None,
        }
    }

    /// Scripted source: canned results per prompt, optional per-prompt gates
    /// to hold a response in flight until the test releases it.
    #[derive(Default)]
    struct FakeSource {
        trending: Vec<VideoSummary>,
        results: HashMap<String, Vec<VideoSummary>>,
        gates: HashMap<String, Arc<Notify>>,
        fail_search: bool,
        search_calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl VideoDataSource for FakeSource {
        async fn random_videos(&self) -> AppResult<Vec<VideoSummary>> {
            Ok(self.trending.clone())
        }

        async fn search_videos(
            &self,
            prompt: &str,
            _quick_mode: bool,
        ) -> AppResult<Vec<VideoSummary>> {
            self.search_calls.lock().unwrap().push(prompt.to_string());
            if let Some(gate) = self.gates.get(prompt) {
                gate.notified().await;
            }
            if self.fail_search {
                return Err(AppError::ExternalApi("search backend down".to_string()));
            }
            Ok(self.results.get(prompt).cloned().unwrap_or_default())
        }

        async fn video(&self, video_id: &str) -> AppResult<VideoSummary> {
            Ok(video(video_id))
        }

        async fn comments(&self, _video_id: &str) -> AppResult<Vec<Comment>> {
            Ok(vec![])
        }

        async fn similar_videos(&self, _video_id: &str) -> AppResult<Vec<SimilarVideo>> {
            Ok(vec![])
        }

        async fn graph(&self, _video_id: &str) -> AppResult<GraphData> {
            Ok(GraphData::default())
        }

        async fn analyze_url(&self, url: &str) -> AppResult<(VideoSummary, Vec<Comment>)> {
            Ok((video(url), vec![]))
        }
    }

    async fn settle() {
        // Lets the worker drain its channel and any spawned query task run;
        // paused time fast-forwards the quiet window.
        tokio::time::sleep(Duration::from_millis(600)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_coalesces_into_one_query() {
        let source = Arc::new(FakeSource {
            results: HashMap::from([("abc".to_string(), vec![video("r1")])]),
            ..FakeSource::default()
        });
        let controller = SearchController::new(source.clone(), &Config::default());

        controller.submit("a");
        controller.submit("ab");
        controller.submit("abc");
        settle().await;

        assert_eq!(*source.search_calls.lock().unwrap(), vec!["abc"]);
        let listing = controller.listing().await;
        assert_eq!(listing.videos.len(), 1);
        assert_eq!(listing.videos[0].video_id, "r1");
        match listing.origin {
            ListingOrigin::Query(query) => assert_eq!(query.text, "abc"),
            other => panic!("unexpected origin: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_falls_back_to_trending() {
        let source = Arc::new(FakeSource {
            trending: vec![video("t1"), video("t2")],
            ..FakeSource::default()
        });
        let controller = SearchController::new(source.clone(), &Config::default());

        controller.submit("   ");
        settle().await;

        assert!(source.search_calls.lock().unwrap().is_empty());
        let listing = controller.listing().await;
        assert_eq!(listing.origin, ListingOrigin::Trending);
        assert_eq!(listing.videos.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_discards_in_flight_response() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(FakeSource {
            results: HashMap::from([("rust".to_string(), vec![video("r1")])]),
            gates: HashMap::from([("rust".to_string(), Arc::clone(&gate))]),
            ..FakeSource::default()
        });
        let controller = SearchController::new(source.clone(), &Config::default());

        controller.submit("rust");
        settle().await;
        assert_eq!(*source.search_calls.lock().unwrap(), vec!["rust"]);

        // The user selects a video while the search is still in flight.
        controller.invalidate();
        gate.notify_one();
        settle().await;

        let listing = controller.listing().await;
        assert!(listing.videos.is_empty());
        assert_eq!(listing.origin, ListingOrigin::Trending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_loses_to_newer_query() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(FakeSource {
            results: HashMap::from([
                ("first".to_string(), vec![video("old")]),
                ("second".to_string(), vec![video("new")]),
            ]),
            gates: HashMap::from([("first".to_string(), Arc::clone(&gate))]),
            ..FakeSource::default()
        });
        let controller = SearchController::new(source.clone(), &Config::default());

        controller.submit("first");
        settle().await;
        controller.submit("second");
        settle().await;

        // "second" has already published; releasing "first" must not clobber it.
        gate.notify_one();
        settle().await;

        let listing = controller.listing().await;
        assert_eq!(listing.videos.len(), 1);
        assert_eq!(listing.videos[0].video_id, "new");
        match listing.origin {
            ListingOrigin::Query(query) => assert_eq!(query.text, "second"),
            other => panic!("unexpected origin: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_failure_surfaces_retryable_error() {
        let source = Arc::new(FakeSource {
            fail_search: true,
            ..FakeSource::default()
        });
        let controller = SearchController::new(source.clone(), &Config::default());

        controller.submit("rust");
        settle().await;

        let listing = controller.listing().await;
        assert!(listing.error.is_some());
        assert!(listing.videos.is_empty());

        // Retry is a plain re-issue of the same operation.
        controller.load_trending().await.unwrap();
        assert!(controller.listing().await.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_url_rejects_blank_input() {
        let source = Arc::new(FakeSource::default());
        let controller = SearchController::new(source, &Config::default());

        let result = controller.analyze_url("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_url_replaces_listing() {
        let source = Arc::new(FakeSource::default());
        let controller = SearchController::new(source, &Config::default());

        let (analyzed, _comments) = controller
            .analyze_url("https://youtube.com/watch?v=abc")
            .await
            .unwrap();
        let listing = controller.listing().await;
        assert_eq!(listing.videos, vec![analyzed]);
        assert!(matches!(listing.origin, ListingOrigin::Analysis { .. }));
    }
}
