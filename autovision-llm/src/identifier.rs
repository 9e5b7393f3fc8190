//! Vehicle identification entry point.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use autovision_core::VehicleIdentity;

use crate::error::Result;
use crate::parse::parse_identity_reply;
use crate::providers::IdentificationProvider;

/// Wraps an identification provider and normalizes its free-form reply.
pub struct VehicleIdentifier {
    provider: Arc<dyn IdentificationProvider>,
}

impl VehicleIdentifier {
    pub fn new(provider: Arc<dyn IdentificationProvider>) -> Self {
        Self { provider }
    }

    /// Identify the vehicle in an image.
    ///
    /// Returns the normalized identity plus the raw parsed reply for the
    /// report's diagnostics section.
    pub async fn identify(&self, image: &[u8], mime_type: &str) -> Result<(VehicleIdentity, Value)> {
        debug!(
            "Requesting vehicle identification from provider '{}'",
            self.provider.name()
        );
        let reply = self.provider.identify(image, mime_type).await?;
        let (identity, raw) = parse_identity_reply(&reply)?;
        debug!("Identified vehicle: {} {}", identity.brand, identity.model);
        Ok((identity, raw))
    }
}
