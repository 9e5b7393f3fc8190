// autovision: single-photo vehicle damage assessment
// Emits exactly one JSON value on stdout; all logging goes to stderr

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use tracing::debug;

use autovision_eye::{run_assessment, AssessmentContext, DetectionBackend, VisionConfig};
use autovision_llm::{GoogleProvider, IdentificationConfig, VehicleIdentifier};

#[derive(Parser)]
#[command(name = "autovision")]
#[command(about = "Vehicle damage assessment from a single photograph", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the vehicle photograph
    image: Option<PathBuf>,

    /// Path to the damage-detection ONNX model
    #[arg(long, default_value = "models/damage.onnx")]
    damage_model: PathBuf,

    /// Path to the part-detection ONNX model
    #[arg(long, default_value = "models/parts.onnx")]
    part_model: PathBuf,

    /// Minimum confidence for a detection to be kept
    #[arg(long, default_value_t = 0.25)]
    confidence_threshold: f32,

    /// Identification collaborator model name
    #[arg(long, default_value = "gemini-2.5-flash")]
    identification_model: String,

    /// Identification request timeout in seconds
    #[arg(long, default_value_t = 30)]
    identification_timeout: u64,

    /// Verbose logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr; stdout carries only the report
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }

    let Some(image_path) = cli.image.clone() else {
        // A missing argument is reported on stdout like everything else,
        // and is not a process failure
        emit_json(&json!({"error": "No image path"}).to_string());
        return Ok(());
    };

    let ctx = match build_context(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            // Startup failures (models, credentials) happen before any
            // assessment and are the one case that exits non-zero
            emit_json(&json!({"error": format!("{:#}", err)}).to_string());
            std::process::exit(1);
        }
    };

    let outcome = run_assessment(&ctx, &image_path).await;
    match serde_json::to_string(&outcome) {
        Ok(line) => emit_json(&line),
        Err(err) => {
            let line = json!({"error": format!("Failed to serialize report: {}", err)});
            emit_json(&line.to_string());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn emit_json(line: &str) {
    println!("{}", line);
    let _ = io::stdout().flush();
}

fn build_context(cli: &Cli) -> anyhow::Result<AssessmentContext> {
    let identification_config = IdentificationConfig {
        model: cli.identification_model.clone(),
        timeout_secs: cli.identification_timeout,
    };
    identification_config
        .validate()
        .map_err(anyhow::Error::msg)?;

    let provider = GoogleProvider::from_env(&identification_config)?;
    let identifier = VehicleIdentifier::new(Arc::new(provider));

    let vision_config = VisionConfig {
        damage_model_path: cli.damage_model.clone(),
        part_model_path: cli.part_model.clone(),
        confidence_threshold: cli.confidence_threshold,
        ..VisionConfig::default()
    };
    vision_config.validate().map_err(anyhow::Error::msg)?;

    let (damage_detector, part_detector) = build_backends(&vision_config)?;
    debug!(
        "Context ready: damage backend '{}', part backend '{}'",
        damage_detector.name(),
        part_detector.name()
    );

    Ok(AssessmentContext::new(
        identifier,
        damage_detector,
        part_detector,
    ))
}

#[cfg(feature = "backend-tract")]
fn build_backends(
    config: &VisionConfig,
) -> anyhow::Result<(Arc<dyn DetectionBackend>, Arc<dyn DetectionBackend>)> {
    use autovision_eye::models::{TractBackend, DAMAGE_CLASSES, PART_CLASSES};

    let damage = TractBackend::new(&config.damage_model_path, DAMAGE_CLASSES, config)?;
    let parts = TractBackend::new(&config.part_model_path, PART_CLASSES, config)?;
    Ok((Arc::new(damage), Arc::new(parts)))
}

#[cfg(not(feature = "backend-tract"))]
fn build_backends(
    _config: &VisionConfig,
) -> anyhow::Result<(Arc<dyn DetectionBackend>, Arc<dyn DetectionBackend>)> {
    anyhow::bail!("No detection backend compiled in; rebuild with --features backend-tract")
}
