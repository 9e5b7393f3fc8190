pub mod error;
pub mod report;
pub mod types;

pub use error::{Error, Result};
pub use report::{AssessmentOutcome, DamageEntry, DetectionReport, ErrorReport, RawDetails};
pub use types::{BoundingBox, DetectionRecord, FusedDamage, VehicleIdentity};
