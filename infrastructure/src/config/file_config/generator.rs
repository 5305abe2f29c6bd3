//! Generator configuration from TOML (`[generator]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Raw generator configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeneratorConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for FileGeneratorConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 1000,
        }
    }
}

impl FileGeneratorConfig {
    /// Resolve the API key: inline value first, then the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
