use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{FusedDamage, VehicleIdentity};

/// One fused damage in report form.
///
/// `box_2d` is always the zero placeholder: consumers read pixel coordinates
/// from the rendered visualization, not from the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEntry {
    pub label: String,
    pub damage_type: String,
    pub box_2d: [i32; 4],
    pub conf: f32,
}

impl From<FusedDamage> for DamageEntry {
    fn from(fused: FusedDamage) -> Self {
        Self {
            label: fused.part_label,
            damage_type: fused.damage_type,
            box_2d: [0, 0, 0, 0],
            conf: fused.confidence,
        }
    }
}

/// Raw per-collaborator diagnostics carried alongside the fused damage list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetails {
    /// Parsed identification reply, exactly as the collaborator returned it
    pub gemini: Value,
    /// Part detections before fusion
    pub yolo_parts: usize,
    /// Damage detections before fusion
    pub yolo_damages: usize,
}

/// Successful assessment report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub num_detections: usize,
    pub visual_output_base64: Option<String>,
    pub brand: String,
    pub model: String,
    pub parts: Vec<DamageEntry>,
    pub raw_details: RawDetails,
}

impl DetectionReport {
    pub fn new(
        identity: VehicleIdentity,
        damages: Vec<FusedDamage>,
        visualization: Option<String>,
        raw_identification: Value,
        damage_count: usize,
        part_count: usize,
    ) -> Self {
        let parts: Vec<DamageEntry> = damages.into_iter().map(DamageEntry::from).collect();
        Self {
            num_detections: parts.len(),
            visual_output_base64: visualization,
            brand: identity.brand,
            model: identity.model,
            parts,
            raw_details: RawDetails {
                gemini: raw_identification,
                yolo_parts: part_count,
                yolo_damages: damage_count,
            },
        }
    }
}

/// Failure envelope: a short message plus the full cause chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
    pub details: String,
    pub visual_output_base64: Option<String>,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
            visual_output_base64: None,
        }
    }
}

/// Terminal result of one assessment.
///
/// Serializes untagged, so callers see exactly one of the two report shapes
/// with no enum wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssessmentOutcome {
    Report(DetectionReport),
    Failure(ErrorReport),
}

impl AssessmentOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, AssessmentOutcome::Failure(_))
    }
}
