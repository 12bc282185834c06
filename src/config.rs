use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Discovery backend base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Quiet window for coalescing search input, in milliseconds
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Nominal similarity score assigned to trending items when relationship
    /// data is unavailable
    #[serde(default = "default_fallback_similarity_score")]
    pub fallback_similarity_score: f64,

    /// Ask the backend for its faster, shallower search pass
    #[serde(default)]
    pub search_quick_mode: bool,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_fallback_similarity_score() -> f64 {
    0.5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            search_debounce_ms: default_search_debounce_ms(),
            fallback_similarity_score: default_fallback_similarity_score(),
            search_quick_mode: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
