use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned box in integer pixel coordinates, `x1 <= x2` and `y1 <= y2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Build a box from two corner points, reordering so the invariant holds
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Center point, computed in floating point
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x1 + self.x2) as f32 / 2.0,
            (self.y1 + self.y2) as f32 / 2.0,
        )
    }

    /// Whether the point lies inside the box, edges included
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.x1 as f32 <= x && x <= self.x2 as f32 && self.y1 as f32 <= y && y <= self.y2 as f32
    }

    pub fn width(&self) -> u32 {
        (self.x2 - self.x1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 - self.y1) as u32
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x1, self.y1, self.x2, self.y2)
    }
}

/// One raw detection from a single model: label, pixel box, confidence.
///
/// Damage detections and part detections share this shape; they come from
/// two independent models and never reference each other directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub label: String,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

impl DetectionRecord {
    pub fn new(label: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            label: label.into(),
            bbox,
            confidence,
        }
    }
}

/// Vehicle make and model as reported by the identification collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleIdentity {
    pub brand: String,
    pub model: String,
}

impl VehicleIdentity {
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
        }
    }

    /// Identity used when the collaborator omits a field
    pub fn unknown() -> Self {
        Self::new("Unknown", "Unknown")
    }
}

impl Default for VehicleIdentity {
    fn default() -> Self {
        Self::unknown()
    }
}

/// One damage detection attributed to the vehicle part that contains it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedDamage {
    pub part_label: String,
    pub damage_type: String,
    pub confidence: f32,
}
