//! Client-side data-aggregation and recommendation-graph core for a video
//! discovery UI.
//!
//! For a selected video the crate gathers several independent, partially
//! unreliable data sources (metadata, comments, similarity relationships)
//! through an injected [`services::VideoDataSource`], tolerates any subset
//! failing without blocking the others, and composes the results into a
//! single consistent view model. It also coalesces free-text input into
//! debounced search queries and ranks result sets by a derived positivity
//! score. Rendering, routing, auth, and the backend itself are external
//! collaborators.

pub mod config;
pub mod error;
pub mod models;
pub mod sequence;
pub mod services;
