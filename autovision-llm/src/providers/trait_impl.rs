use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait IdentificationProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Check if API key is set
    fn has_api_key(&self) -> bool;

    /// Send one image and return the collaborator's raw text reply
    async fn identify(&self, image: &[u8], mime_type: &str) -> Result<String>;
}

/// Provider returning a canned reply.
///
/// Stands in for the real collaborator in tests and offline wiring.
pub struct StaticProvider {
    reply: String,
}

impl StaticProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl IdentificationProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    fn has_api_key(&self) -> bool {
        true
    }

    async fn identify(&self, _image: &[u8], _mime_type: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}
