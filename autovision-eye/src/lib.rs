//! autovision-eye: detection and reporting for the damage assessment pipeline
//!
//! Wraps the two object-detection models behind a backend trait, attributes
//! each detected damage to the vehicle part that contains it, renders the
//! annotated visualization, and assembles the final report.

pub mod assessor;
pub mod config;
pub mod error;
pub mod models;
pub mod processing;
pub mod render;

pub use assessor::{run_assessment, AssessmentContext};
pub use config::VisionConfig;
pub use error::VisionError;
pub use models::{DetectionBackend, StaticBackend, DAMAGE_CLASSES, PART_CLASSES};
pub use processing::{fuse_damages, UNKNOWN_PART};
