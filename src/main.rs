use std::sync::Arc;

use revision_core::{
    config::Config,
    services::{ranking, DetailLoader, HttpVideoSource, VideoDataSource},
};

/// Smoke CLI: fetches the trending listing from the configured backend,
/// prints it ranked by positivity, then loads the top video's detail bundle.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let source = Arc::new(HttpVideoSource::new(config.api_base_url.clone()));

    let videos = source.random_videos().await?;
    let ranked = ranking::rank(videos);
    for video in &ranked {
        let badge = if ranking::is_high_quality(video) {
            "  [highly positive]"
        } else {
            ""
        };
        println!(
            "{:>3}%  {}{}",
            ranking::positivity_score(video),
            video.title,
            badge
        );
    }

    let Some(first) = ranked.first().cloned() else {
        println!("No videos available");
        return Ok(());
    };

    let loader = DetailLoader::new(source, &config);
    let first_id = first.video_id.clone();
    match loader.load(&first_id, Some(first)).await? {
        Some(detail) => {
            println!(
                "\n{}: {} comments, {} graph nodes, {}% positive",
                detail.video.title,
                detail.comments.len(),
                detail.graph.nodes.len(),
                detail.sentiment.positive_pct
            );
            for warning in &detail.warnings {
                println!("  warning: {}", warning);
            }
        }
        None => println!("Detail load superseded"),
    }

    Ok(())
}
