//! Configuration for autovision-eye

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Vision pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Path to the damage-detection ONNX model
    pub damage_model_path: PathBuf,
    /// Path to the part-detection ONNX model
    pub part_model_path: PathBuf,
    /// Minimum confidence for a detection to be kept
    pub confidence_threshold: f32,
    /// IoU threshold for non-maximum suppression
    pub nms_threshold: f32,
    /// Model input size (width, height)
    pub input_size: (u32, u32),
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            damage_model_path: PathBuf::from("models/damage.onnx"),
            part_model_path: PathBuf::from("models/parts.onnx"),
            confidence_threshold: 0.25,
            nms_threshold: 0.45,
            input_size: (640, 640),
        }
    }
}

impl VisionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err("Confidence threshold must be between 0 and 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.nms_threshold) {
            return Err("NMS threshold must be between 0 and 1".to_string());
        }

        if self.input_size.0 == 0 || self.input_size.1 == 0 {
            return Err("Input size must be non-zero".to_string());
        }

        if self.input_size.0 > 4096 || self.input_size.1 > 4096 {
            return Err("Input size too large (max 4096)".to_string());
        }

        if self.damage_model_path.as_os_str().is_empty()
            || self.part_model_path.as_os_str().is_empty()
        {
            return Err("Model paths must not be empty".to_string());
        }

        Ok(())
    }
}
