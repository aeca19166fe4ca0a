use clap::Parser;
use std::path::PathBuf;

use cardcrop::{CardDetector, DetectorConfig, Outcome, PipelineContext, PortraitStrategy, load_image};

#[derive(Parser)]
#[command(name = "cardcrop")]
#[command(about = "Detect and extract ID cards and their portrait from images")]
struct Cli {
    /// Path to the input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Enable debug output, including intermediate image files and debug.log
    #[arg(long)]
    debug: bool,

    /// Prefix for output images (e.g. 'test_' or 'out/run1_')
    #[arg(long, value_name = "PATH", default_value = "")]
    output_prefix: String,

    /// JSON file with detector thresholds
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Portrait detection strategy
    #[arg(long, value_enum)]
    portrait_strategy: Option<PortraitStrategy>,

    /// SeetaFace frontal cascade (seeta_fd_frontal_v1.0.bin) for the classifier
    /// strategy. The model is not bundled and must be supplied; defaults to
    /// assets/seeta_fd_frontal_v1.0.bin
    #[arg(long, value_name = "FILE")]
    face_model: Option<PathBuf>,

    /// Longest side of the working image
    #[arg(long, value_name = "PIXELS")]
    max_dimension: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let context = PipelineContext::new()
        .with_verbose(args.debug)
        .with_debug(args.debug)
        .with_output_prefix(args.output_prefix.clone());
    let _log_guard = cardcrop::logging::init(&context);

    let mut config = match &args.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::default(),
    };
    if let Some(strategy) = args.portrait_strategy {
        config = config.with_strategy(strategy);
    }
    if let Some(model) = args.face_model {
        config = config.with_face_model(model);
    }
    if let Some(max_dimension) = args.max_dimension {
        config = config.with_max_dimension(max_dimension);
    }
    config.validate()?;

    tracing::debug!(path = %args.image_path.display(), "loading image");
    let img = load_image(&args.image_path)?;
    tracing::debug!(width = img.width(), height = img.height(), "image loaded");

    let detector = CardDetector::new(config);
    let detection = detector.detect(&img, &context);
    detector.write_outputs(&detection, &context);

    let outcome = detection.outcome();
    println!("{}", outcome.message());
    if outcome == Outcome::NoCard {
        println!(
            "Processed image size: {} x {}",
            detection.processed.width(),
            detection.processed.height()
        );
    }

    Ok(())
}
