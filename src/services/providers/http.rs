/// HTTP-backed video data source
///
/// Talks to the discovery backend's REST routes. Transport details — base
/// URL, request shapes, status handling — live here so the rest of the core
/// stays free of them.
use crate::{
    error::{AppError, AppResult},
    models::{
        AnalyzeResponse, Comment, CommentsResponse, GraphData, SimilarVideo,
        SimilarVideosResponse, VideoResponse, VideoSummary, VideosResponse,
    },
    services::providers::VideoDataSource,
};
use reqwest::Client as HttpClient;
use serde_json::json;

#[derive(Clone)]
pub struct HttpVideoSource {
    http_client: HttpClient,
    base_url: String,
}

impl HttpVideoSource {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Maps a non-2xx response to `ExternalApi` with status and body,
    /// otherwise deserializes the JSON payload.
    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Backend returned status {}: {}",
                status, body
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl VideoDataSource for HttpVideoSource {
    async fn random_videos(&self) -> AppResult<Vec<VideoSummary>> {
        let url = format!("{}/videos/random/", self.base_url);
        let response = self.http_client.get(&url).send().await?;
        let body: VideosResponse = Self::decode(response).await?;

        let videos: Vec<VideoSummary> =
            body.videos.into_iter().map(VideoSummary::reconciled).collect();
        tracing::info!(results = videos.len(), "Trending videos fetched");
        Ok(videos)
    }

    async fn search_videos(
        &self,
        prompt: &str,
        quick_mode: bool,
    ) -> AppResult<Vec<VideoSummary>> {
        if prompt.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search prompt cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/videos/", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "prompt": prompt, "quick_mode": quick_mode }))
            .send()
            .await?;
        let body: VideosResponse = Self::decode(response).await?;

        let videos: Vec<VideoSummary> =
            body.videos.into_iter().map(VideoSummary::reconciled).collect();
        tracing::info!(prompt = %prompt, results = videos.len(), "Search completed");
        Ok(videos)
    }

    async fn video(&self, video_id: &str) -> AppResult<VideoSummary> {
        let url = format!("{}/videos/{}/", self.base_url, video_id);
        let response = self.http_client.get(&url).send().await?;
        let body: VideoResponse = Self::decode(response).await?;

        tracing::debug!(video_id = %video_id, "Video metadata fetched");
        Ok(body.video.reconciled())
    }

    async fn comments(&self, video_id: &str) -> AppResult<Vec<Comment>> {
        let url = format!("{}/videos/{}/comments/", self.base_url, video_id);
        let response = self.http_client.get(&url).send().await?;
        let body: CommentsResponse = Self::decode(response).await?;

        tracing::debug!(video_id = %video_id, results = body.comments.len(), "Comments fetched");
        Ok(body.comments)
    }

    async fn similar_videos(&self, video_id: &str) -> AppResult<Vec<SimilarVideo>> {
        let url = format!("{}/videos/{}/similar/", self.base_url, video_id);
        let response = self.http_client.get(&url).send().await?;
        let body: SimilarVideosResponse = Self::decode(response).await?;

        tracing::debug!(
            video_id = %video_id,
            results = body.similar_videos.len(),
            "Similarity data fetched"
        );
        Ok(body.similar_videos)
    }

    async fn graph(&self, video_id: &str) -> AppResult<GraphData> {
        let url = format!("{}/videos/{}/graph/", self.base_url, video_id);
        let response = self.http_client.get(&url).send().await?;
        let body: GraphData = Self::decode(response).await?;

        tracing::debug!(
            video_id = %video_id,
            nodes = body.nodes.len(),
            edges = body.edges.len(),
            "Server graph fetched"
        );
        Ok(body)
    }

    async fn analyze_url(&self, url: &str) -> AppResult<(VideoSummary, Vec<Comment>)> {
        let endpoint = format!("{}/analyze-youtube/", self.base_url);
        let response = self
            .http_client
            .post(&endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await?;
        let body: AnalyzeResponse = Self::decode(response).await?;

        tracing::info!(
            video_id = %body.video.video_id,
            comments = body.comments.len(),
            "URL analysis completed"
        );
        Ok((body.video.reconciled(), body.comments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let source = HttpVideoSource::new("http://localhost:8000/api/".to_string());
        assert_eq!(source.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_videos_response_deserialization() {
        let json = r#"{
            "videos": [{
                "video_id": "dQw4w9WgXcQ",
                "title": "Graph Theory Basics",
                "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg",
                "views": 1200,
                "likes": 300,
                "comments_count": 45,
                "positive_comments_count": 30
            }]
        }"#;

        let response: VideosResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.videos.len(), 1);
        assert_eq!(response.videos[0].video_id, "dQw4w9WgXcQ");
        assert_eq!(response.videos[0].positive_comments_count, 30);
    }

    #[test]
    fn test_similar_videos_response_deserialization() {
        let json = r#"{
            "similar_videos": [
                {"video_id": "v2", "title": "Related", "similarity_score": 0.82},
                {"video_id": "v3", "title": "Other"}
            ]
        }"#;

        let response: SimilarVideosResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.similar_videos.len(), 2);
        assert_eq!(response.similar_videos[0].similarity_score, 0.82);
        assert_eq!(response.similar_videos[1].similarity_score, 0.0);
    }

    #[test]
    fn test_analyze_response_deserialization() {
        let json = r#"{
            "video": {"video_id": "v1", "title": "Analyzed"},
            "comments": [{"id": "c1", "text": "great", "author": "ann"}]
        }"#;

        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.video.video_id, "v1");
        assert_eq!(response.comments.len(), 1);
        assert_eq!(response.comments[0].author, "ann");
    }
}
