use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use parking_lot::RwLock;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::{IdentificationConfig, API_KEY_ENV_VARS};
use crate::error::{LLMError, Result};
use crate::providers::trait_impl::IdentificationProvider;

/// Instruction sent alongside the image. The collaborator is told to answer
/// with bare JSON; replies still go through the fence-stripping parser
/// because it does not always comply.
pub const IDENTIFICATION_PROMPT: &str = r#"Analyze this image of a vehicle.
1. Identify the vehicle brand (Make).
2. Identify the vehicle model (Name).

Return the result in valid JSON format with this structure:
{
    "brand": "Brand Name",
    "model": "Model Name"
}
Do not use markdown formatting, just return the raw JSON string."#;

pub struct GoogleProvider {
    api_key: Arc<RwLock<Option<String>>>,
    client: Client,
    base_url: String,
    model: String,
}

impl GoogleProvider {
    pub fn new(config: &IdentificationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            api_key: Arc::new(RwLock::new(None)),
            client,
            base_url: "https://generativelanguage.googleapis.com/v1".to_string(),
            model: config.model.clone(),
        })
    }

    pub fn with_api_key(config: &IdentificationConfig, api_key: String) -> Result<Self> {
        let provider = Self::new(config)?;
        provider.set_api_key(api_key);
        Ok(provider)
    }

    /// Resolve the credential from the process environment.
    ///
    /// Checks `GEMINI_API_KEY` first, then `GOOGLE_API_KEY`.
    pub fn from_env(config: &IdentificationConfig) -> Result<Self> {
        let key = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
            .ok_or_else(|| LLMError::MissingApiKey("google".to_string()))?;
        Self::with_api_key(config, key)
    }

    pub fn set_api_key(&self, key: String) {
        *self.api_key.write() = Some(key);
    }

    fn get_api_key(&self) -> Result<String> {
        self.api_key
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| LLMError::MissingApiKey("google".to_string()))
    }
}

/// Request body for one multimodal generateContent call
pub(crate) fn build_request_body(image: &[u8], mime_type: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                {
                    "inline_data": {
                        "mime_type": mime_type,
                        "data": general_purpose::STANDARD.encode(image),
                    }
                },
                {
                    "text": IDENTIFICATION_PROMPT
                }
            ]
        }]
    })
}

/// Pull the reply text out of a generateContent response
pub(crate) fn extract_reply_text(response: &serde_json::Value) -> Result<String> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| LLMError::InvalidResponse("no text content in response".to_string()))
}

#[async_trait]
impl IdentificationProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn has_api_key(&self) -> bool {
        self.api_key.read().is_some()
    }

    async fn identify(&self, image: &[u8], mime_type: &str) -> Result<String> {
        let api_key = self.get_api_key()?;

        // Validate base_url to prevent SSRF
        if !self.base_url.starts_with("https://") {
            return Err(LLMError::InvalidResponse("Invalid base URL".to_string()));
        }

        // URL encode model name to prevent injection
        let model_encoded = urlencoding::encode(&self.model);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model_encoded, api_key
        );

        let body = build_request_body(image, mime_type);
        debug!(
            "Sending identification request to {} ({} image bytes, {})",
            self.model,
            image.len(),
            mime_type
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LLMError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        let json: serde_json::Value = response.json().await?;
        extract_reply_text(&json)
    }
}
