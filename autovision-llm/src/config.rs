use serde::{Deserialize, Serialize};

/// Environment variables checked for the collaborator credential, in order
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Configuration for the identification collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentificationConfig {
    /// Collaborator model name
    pub model: String,
    /// Request timeout in seconds for one identification call
    pub timeout_secs: u64,
}

impl Default for IdentificationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 30,
        }
    }
}

impl IdentificationConfig {
    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.model.is_empty() {
            return Err("Model name must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }
        if self.timeout_secs > 600 {
            return Err("Timeout must be at most 600 seconds".to_string());
        }
        Ok(())
    }
}
