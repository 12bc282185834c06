use std::collections::HashSet;

use crate::models::{
    ColorBand, GraphData, GraphEdge, GraphNode, SimilarVideo, VideoGraph,
};

/// Label shown on the node for the currently selected video
const FOCUS_LABEL: &str = "Selected Video";

/// Stand-in image for nodes with no thumbnail
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150?text=No+Thumb";

/// Related-node labels are cut to this many characters
const LABEL_MAX_CHARS: usize = 20;

/// Builds the renderable similarity graph for one selected video.
///
/// Related items are deduplicated by id (first occurrence wins, input order
/// preserved) and any item referring back to the focus video is dropped. The
/// result always contains exactly one focus node; an empty or fully filtered
/// input yields a focus-only graph with no edges.
pub fn build(
    focus_id: &str,
    focus_thumbnail: Option<&str>,
    related: &[SimilarVideo],
) -> VideoGraph {
    let mut nodes = vec![GraphNode {
        id: focus_id.to_string(),
        label: FOCUS_LABEL.to_string(),
        image: focus_thumbnail.unwrap_or(PLACEHOLDER_IMAGE).to_string(),
        is_focus: true,
    }];
    let mut edges = Vec::new();

    let mut seen: HashSet<&str> = HashSet::new();
    for item in related {
        if item.video_id == focus_id || !seen.insert(item.video_id.as_str()) {
            continue;
        }
        let score = clamp_score(item.similarity_score);
        nodes.push(GraphNode {
            id: item.video_id.clone(),
            label: truncate_label(&item.title),
            image: item
                .thumbnail
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            is_focus: false,
        });
        edges.push(GraphEdge {
            from: focus_id.to_string(),
            to: item.video_id.clone(),
            display_weight: display_weight(score),
            color_band: color_band(score),
        });
    }

    VideoGraph { nodes, edges }
}

/// Normalizes a backend-assembled graph payload into the view model.
///
/// Dedups node ids, marks (or inserts) the focus node, drops self-edges and
/// edges referencing unknown nodes, and derives display weight and color band
/// from the raw edge value, a similarity percentage on the 0..=100 scale.
pub fn normalize_server_graph(focus_id: &str, raw: &GraphData) -> VideoGraph {
    let mut nodes = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for node in &raw.nodes {
        if node.id.is_empty() || !seen.insert(node.id.as_str()) {
            continue;
        }
        let is_focus = node.id == focus_id;
        nodes.push(GraphNode {
            id: node.id.clone(),
            label: if is_focus {
                FOCUS_LABEL.to_string()
            } else {
                truncate_label(&node.label)
            },
            image: node
                .image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            is_focus,
        });
    }

    if !nodes.iter().any(|n| n.is_focus) {
        nodes.insert(
            0,
            GraphNode {
                id: focus_id.to_string(),
                label: FOCUS_LABEL.to_string(),
                image: PLACEHOLDER_IMAGE.to_string(),
                is_focus: true,
            },
        );
    }

    let known_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = raw
        .edges
        .iter()
        .filter(|e| {
            e.from != e.to && known_ids.contains(e.from.as_str()) && known_ids.contains(e.to.as_str())
        })
        .map(|e| {
            let score = clamp_score(e.value / 100.0);
            GraphEdge {
                from: e.from.clone(),
                to: e.to.clone(),
                display_weight: display_weight(score),
                color_band: color_band(score),
            }
        })
        .collect();

    VideoGraph { nodes, edges }
}

/// Buckets a similarity score for visual weighting. The focus node is never
/// scored through this rule.
pub fn color_band(score: f64) -> ColorBand {
    if score > 0.7 {
        ColorBand::High
    } else if score > 0.4 {
        ColorBand::Medium
    } else {
        ColorBand::Low
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Edge thickness on the renderer's scale: a base width of 2 plus one step
/// per 25 similarity points.
fn display_weight(score: f64) -> u32 {
    2 + ((score * 100.0) / 25.0).round() as u32
}

fn truncate_label(title: &str) -> String {
    if title.chars().count() > LABEL_MAX_CHARS {
        let head: String = title.chars().take(LABEL_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}
