//! Detection post-processing

pub mod fusion;

pub use fusion::{fuse_damages, UNKNOWN_PART};
