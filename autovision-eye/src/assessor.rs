//! Assessment orchestration.
//!
//! Owns the full pipeline for one request: decode, identification and the
//! two detection calls (run concurrently), fusion, rendering, and report
//! assembly. Every failure past argument handling folds into the single
//! failure envelope; the caller never sees an error type.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::DynamicImage;
use serde_json::Value;
use tokio::task;
use tracing::{info, warn};

use autovision_core::{
    AssessmentOutcome, DetectionRecord, DetectionReport, ErrorReport, VehicleIdentity,
};
use autovision_llm::VehicleIdentifier;

use crate::models::DetectionBackend;
use crate::processing::fuse_damages;
use crate::render::{self, BoxStyle};

/// Everything one assessment needs, constructed once at process start
pub struct AssessmentContext {
    pub identifier: VehicleIdentifier,
    pub damage_detector: Arc<dyn DetectionBackend>,
    pub part_detector: Arc<dyn DetectionBackend>,
}

impl AssessmentContext {
    pub fn new(
        identifier: VehicleIdentifier,
        damage_detector: Arc<dyn DetectionBackend>,
        part_detector: Arc<dyn DetectionBackend>,
    ) -> Self {
        Self {
            identifier,
            damage_detector,
            part_detector,
        }
    }
}

/// Run one assessment.
///
/// Never fails: any error becomes the failure report, with the full cause
/// chain in `details`.
pub async fn run_assessment(ctx: &AssessmentContext, image_path: &Path) -> AssessmentOutcome {
    match assess(ctx, image_path).await {
        Ok(report) => AssessmentOutcome::Report(report),
        Err(err) => {
            warn!("Assessment failed: {:#}", err);
            AssessmentOutcome::Failure(ErrorReport::new(err.to_string(), format!("{:?}", err)))
        }
    }
}

async fn assess(ctx: &AssessmentContext, image_path: &Path) -> anyhow::Result<DetectionReport> {
    if !image_path.exists() {
        anyhow::bail!("Image not found: {}", image_path.display());
    }

    let bytes = std::fs::read(image_path)
        .with_context(|| format!("Failed to read image: {}", image_path.display()))?;
    let image = image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to decode image: {}", image_path.display()))?;
    let mime_type = mime_for_path(image_path);

    info!(
        "Assessing {} ({} bytes, {})",
        image_path.display(),
        bytes.len(),
        mime_type
    );

    let image = Arc::new(image);
    let damage_backend = Arc::clone(&ctx.damage_detector);
    let part_backend = Arc::clone(&ctx.part_detector);
    let damage_image = Arc::clone(&image);
    let part_image = Arc::clone(&image);

    // Identification and both detection calls are independent; join them
    // all before fusion.
    let (identification, damages, parts) = tokio::try_join!(
        async {
            ctx.identifier
                .identify(&bytes, mime_type)
                .await
                .context("Vehicle identification failed")
        },
        async {
            task::spawn_blocking(move || damage_backend.detect(&damage_image))
                .await
                .context("Damage detection task panicked")?
                .context("Damage detection failed")
        },
        async {
            task::spawn_blocking(move || part_backend.detect(&part_image))
                .await
                .context("Part detection task panicked")?
                .context("Part detection failed")
        },
    )?;

    let (identity, raw_identification) = identification;
    Ok(assemble_report(
        &image,
        identity,
        raw_identification,
        &damages,
        &parts,
    ))
}

/// Fuse, render, and shape the final report.
///
/// Kept separate from the async driver so the encode-tolerance path is
/// directly exercisable.
pub fn assemble_report(
    image: &DynamicImage,
    identity: VehicleIdentity,
    raw_identification: Value,
    damages: &[DetectionRecord],
    parts: &[DetectionRecord],
) -> DetectionReport {
    let fused = fuse_damages(damages, parts);

    let canvas = render::annotate(image, damages, BoxStyle::damage());
    // A failed encode drops the visualization, not the report: the damage
    // data was already computed.
    let visualization = match render::encode_png_base64(&canvas) {
        Ok(encoded) => Some(encoded),
        Err(err) => {
            warn!("Visualization encoding failed: {}", err);
            None
        }
    };

    DetectionReport::new(
        identity,
        fused,
        visualization,
        raw_identification,
        damages.len(),
        parts.len(),
    )
}

/// Mime type for the identification request, from the file extension.
/// Unknown extensions fall back to JPEG, the dominant camera format.
fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
