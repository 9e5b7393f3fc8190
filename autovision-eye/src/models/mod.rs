//! Detection model backends

pub mod backend;
#[cfg(feature = "backend-tract")]
pub mod tract;

pub use backend::{DetectionBackend, StaticBackend};
#[cfg(feature = "backend-tract")]
pub use tract::TractBackend;

/// Class table for the damage-detection model, in model output order
pub const DAMAGE_CLASSES: &[&str] = &[
    "dent",
    "scratch",
    "crack",
    "glass shatter",
    "lamp broken",
    "tire flat",
];

/// Class table for the part-detection model, in model output order
pub const PART_CLASSES: &[&str] = &[
    "back bumper",
    "back door",
    "back glass",
    "back light",
    "front bumper",
    "front door",
    "front glass",
    "front light",
    "fender",
    "hood",
    "mirror",
    "tailgate",
    "trunk",
    "wheel",
    "windshield",
];
