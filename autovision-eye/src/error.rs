//! Error types for autovision-eye

use thiserror::Error;

use autovision_core::Error as CoreError;
use autovision_llm::LLMError;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Model error: {0}")]
    Model(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Identification error: {0}")]
    Identification(#[from] LLMError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<VisionError> for CoreError {
    fn from(err: VisionError) -> Self {
        CoreError::Inference(format!("Vision error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vision_error_display() {
        let err = VisionError::Model("Test error".to_string());
        assert!(err.to_string().contains("Model error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_vision_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let vision_err: VisionError = io_err.into();
        match vision_err {
            VisionError::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_vision_error_from_llm() {
        let llm_err = LLMError::InvalidResponse("no text content".to_string());
        let vision_err: VisionError = llm_err.into();
        match vision_err {
            VisionError::Identification(_) => {}
            _ => panic!("Expected Identification error"),
        }
    }

    #[test]
    fn test_vision_error_to_core_error() {
        let vision_err = VisionError::Model("Test".to_string());
        let core_err: CoreError = vision_err.into();
        match core_err {
            CoreError::Inference(msg) => {
                assert!(msg.contains("Vision error"));
                assert!(msg.contains("Test"));
            }
            _ => panic!("Expected Inference error"),
        }
    }
}
