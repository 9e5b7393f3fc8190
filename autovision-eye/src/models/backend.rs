//! Backend trait for the detection models.

use image::DynamicImage;

use autovision_core::DetectionRecord;

use crate::error::VisionError;

/// A black-box detection model: one decoded image in, labeled records out.
///
/// Implementations are shared across concurrent calls, so inference takes
/// `&self`; any internal state must be read-only or synchronized.
pub trait DetectionBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Detect objects in the image, in model emission order
    fn detect(&self, image: &DynamicImage) -> Result<Vec<DetectionRecord>, VisionError>;
}

/// Backend returning a preset record list.
///
/// Stands in for a real model in tests and offline wiring.
pub struct StaticBackend {
    name: String,
    records: Vec<DetectionRecord>,
}

impl StaticBackend {
    pub fn new(name: impl Into<String>, records: Vec<DetectionRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// A backend that never detects anything
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

impl DetectionBackend for StaticBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, _image: &DynamicImage) -> Result<Vec<DetectionRecord>, VisionError> {
        Ok(self.records.clone())
    }
}
