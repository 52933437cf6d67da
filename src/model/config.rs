use serde::Deserialize;
use serde::Serialize;

/// model invocation parameters, threaded from the CLI into every agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub temperature: f64,
    pub max_tokens: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-2.0".to_string(),
            temperature: 0.7,
            max_tokens: 8192,
        }
    }
}
