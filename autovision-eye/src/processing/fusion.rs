//! Damage-to-part fusion.
//!
//! Attributes each detected damage to the vehicle part whose box contains
//! the damage center. A center-point test is used instead of IoU: damage
//! boxes are typically small relative to part boxes, so containment
//! attributes them without tuning an overlap threshold.

use tracing::debug;

use autovision_core::{DetectionRecord, FusedDamage};

/// Part label assigned when no part box contains the damage center
pub const UNKNOWN_PART: &str = "Unknown Part";

/// Attribute each damage record to the first part record whose box contains
/// the damage center.
///
/// Parts are scanned in emission order and the first containing box wins,
/// so overlaps are resolved by detector output order, not by confidence or
/// area. Box edges count as inside. Every damage produces exactly one
/// output entry, in input order; a damage whose center lies outside every
/// part box falls back to [`UNKNOWN_PART`].
pub fn fuse_damages(damages: &[DetectionRecord], parts: &[DetectionRecord]) -> Vec<FusedDamage> {
    let mut fused = Vec::with_capacity(damages.len());

    for damage in damages {
        let (cx, cy) = damage.bbox.center();

        let part_label = parts
            .iter()
            .find(|part| part.bbox.contains_point(cx, cy))
            .map(|part| part.label.clone())
            .unwrap_or_else(|| UNKNOWN_PART.to_string());

        fused.push(FusedDamage {
            part_label,
            damage_type: damage.label.clone(),
            confidence: damage.confidence,
        });
    }

    debug!(
        "Fused {} damage detections against {} part detections",
        damages.len(),
        parts.len()
    );
    fused
}
