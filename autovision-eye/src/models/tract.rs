//! Tract-based ONNX backend for the detection models.
//!
//! Loads a local model file and runs inference on decoded images. Expects
//! the ultralytics export layout: input `[1, 3, H, W]` RGB normalized to
//! `[0, 1]`, output `[1, 4 + num_classes, num_candidates]` where rows
//! `0..4` are center-x, center-y, width, height in input pixels and the
//! remaining rows are per-class scores.

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use tract_onnx::prelude::*;
use tracing::debug;

use autovision_core::{BoundingBox, DetectionRecord};

use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::models::backend::DetectionBackend;

/// Candidate box in model input coordinates, pre-suppression
#[derive(Debug, Clone, Copy)]
struct Candidate {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    confidence: f32,
    class_id: usize,
}

pub struct TractBackend {
    plan: TypedSimplePlan<TypedModel>,
    classes: &'static [&'static str],
    input_size: (u32, u32),
    confidence_threshold: f32,
    nms_threshold: f32,
    name: String,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        classes: &'static [&'static str],
        config: &VisionConfig,
    ) -> Result<Self, VisionError> {
        let model_path = model_path.as_ref();
        let (width, height) = config.input_size;

        let plan = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(|e| {
                VisionError::Model(format!(
                    "Failed to load ONNX model from {}: {}",
                    model_path.display(),
                    e
                ))
            })?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, height as usize, width as usize),
                ),
            )
            .map_err(|e| VisionError::Model(format!("Failed to set input fact: {}", e)))?
            .into_optimized()
            .map_err(|e| VisionError::Model(format!("Failed to optimize ONNX model: {}", e)))?
            .into_runnable()
            .map_err(|e| VisionError::Model(format!("Failed to build runnable model: {}", e)))?;

        let name = model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("tract")
            .to_string();

        debug!(
            "Loaded ONNX model '{}' ({} classes, input {}x{})",
            name,
            classes.len(),
            width,
            height
        );

        Ok(Self {
            plan,
            classes,
            input_size: (width, height),
            confidence_threshold: config.confidence_threshold,
            nms_threshold: config.nms_threshold,
            name,
        })
    }

    fn build_input(&self, image: &DynamicImage) -> Tensor {
        let (width, height) = self.input_size;
        let resized = image.resize_exact(width, height, FilterType::Triangle);
        let rgb = resized.to_rgb8();

        let input = tract_ndarray::Array4::from_shape_fn(
            (1, 3, height as usize, width as usize),
            |(_, channel, y, x)| rgb.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0,
        );

        input.into_tensor()
    }

    fn collect_candidates(
        &self,
        view: &tract_ndarray::ArrayViewD<f32>,
    ) -> Result<Vec<Candidate>, VisionError> {
        let shape = view.shape();
        if shape.len() != 3 || shape[0] != 1 {
            return Err(VisionError::Model(format!(
                "Unexpected output shape {:?}, expected [1, attrs, candidates]",
                shape
            )));
        }

        let attrs = shape[1];
        let count = shape[2];
        if attrs != 4 + self.classes.len() {
            return Err(VisionError::Model(format!(
                "Output has {} attributes, expected {} for {} classes",
                attrs,
                4 + self.classes.len(),
                self.classes.len()
            )));
        }

        let mut candidates = Vec::new();
        for i in 0..count {
            let mut best_class = 0usize;
            let mut best_score = 0.0f32;
            for class_id in 0..self.classes.len() {
                let score = view[[0, 4 + class_id, i]];
                if score > best_score {
                    best_score = score;
                    best_class = class_id;
                }
            }

            if best_score < self.confidence_threshold || !best_score.is_finite() {
                continue;
            }

            let cx = view[[0, 0, i]];
            let cy = view[[0, 1, i]];
            let w = view[[0, 2, i]];
            let h = view[[0, 3, i]];
            let finite = cx.is_finite() && cy.is_finite() && w.is_finite() && h.is_finite();
            if !finite || w <= 0.0 || h <= 0.0 {
                continue;
            }

            candidates.push(Candidate {
                x1: cx - w / 2.0,
                y1: cy - h / 2.0,
                x2: cx + w / 2.0,
                y2: cy + h / 2.0,
                confidence: best_score,
                class_id: best_class,
            });
        }

        Ok(candidates)
    }

    fn apply_nms(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut kept: Vec<Candidate> = Vec::new();
        for candidate in candidates {
            let suppressed = kept.iter().any(|k| {
                k.class_id == candidate.class_id
                    && compute_iou(k, &candidate) > self.nms_threshold
            });
            if !suppressed {
                kept.push(candidate);
            }
        }
        kept
    }

    /// Scale a kept candidate from input space back to original pixels
    fn to_record(&self, candidate: &Candidate, original: (u32, u32)) -> DetectionRecord {
        let (orig_w, orig_h) = original;
        let scale_x = orig_w as f32 / self.input_size.0 as f32;
        let scale_y = orig_h as f32 / self.input_size.1 as f32;

        let max_x = (orig_w.saturating_sub(1)) as f32;
        let max_y = (orig_h.saturating_sub(1)) as f32;
        let x1 = (candidate.x1 * scale_x).round().clamp(0.0, max_x) as i32;
        let y1 = (candidate.y1 * scale_y).round().clamp(0.0, max_y) as i32;
        let x2 = (candidate.x2 * scale_x).round().clamp(0.0, max_x) as i32;
        let y2 = (candidate.y2 * scale_y).round().clamp(0.0, max_y) as i32;

        DetectionRecord::new(
            self.classes[candidate.class_id],
            BoundingBox::new(x1, y1, x2, y2),
            candidate.confidence,
        )
    }
}

fn compute_iou(a: &Candidate, b: &Candidate) -> f32 {
    let ix1 = a.x1.max(b.x1);
    let iy1 = a.y1.max(b.y1);
    let ix2 = a.x2.min(b.x2);
    let iy2 = a.y2.min(b.y2);

    let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    let union = area_a + area_b - intersection;

    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

impl DetectionBackend for TractBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, image: &DynamicImage) -> Result<Vec<DetectionRecord>, VisionError> {
        let original = (image.width(), image.height());
        let input = self.build_input(image);

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| VisionError::Model(format!("ONNX inference failed: {}", e)))?;
        let output = outputs
            .first()
            .ok_or_else(|| VisionError::Model("Model produced no outputs".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| VisionError::Model(format!("Model output was not f32: {}", e)))?;

        let candidates = self.collect_candidates(&view)?;
        let candidate_count = candidates.len();
        let kept = self.apply_nms(candidates);
        let records: Vec<DetectionRecord> = kept
            .iter()
            .map(|candidate| self.to_record(candidate, original))
            .collect();

        debug!(
            "Model '{}' detected {} objects ({} before suppression)",
            self.name,
            records.len(),
            candidate_count
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class_id: usize) -> Candidate {
        Candidate {
            x1,
            y1,
            x2,
            y2,
            confidence,
            class_id,
        }
    }

    #[test]
    fn test_compute_iou_identical() {
        let a = candidate(0.0, 0.0, 10.0, 10.0, 0.9, 0);
        assert!((compute_iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_compute_iou_disjoint() {
        let a = candidate(0.0, 0.0, 10.0, 10.0, 0.9, 0);
        let b = candidate(20.0, 20.0, 30.0, 30.0, 0.9, 0);
        assert_eq!(compute_iou(&a, &b), 0.0);
    }

    #[test]
    fn test_compute_iou_partial() {
        let a = candidate(0.0, 0.0, 10.0, 10.0, 0.9, 0);
        let b = candidate(5.0, 0.0, 15.0, 10.0, 0.9, 0);
        let iou = compute_iou(&a, &b);
        assert!(iou > 0.3 && iou < 0.4);
    }
}
