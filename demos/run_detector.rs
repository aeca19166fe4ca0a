use cardcrop::{CardDetector, CardSelection, DetectorConfig, PipelineContext, PortraitStrategy, load_image};
use std::env;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path> [face_model]", args[0]);
        std::process::exit(1);
    }

    let img = load_image(Path::new(&args[1]))?;
    println!("Loaded image: {}x{}", img.width(), img.height());

    let context = PipelineContext::new().with_verbose(true);
    let _guard = cardcrop::logging::init(&context);

    // Example 1: default thresholds, geometric portrait search
    println!("\n=== Geometric Portrait Search ===");
    let detector = CardDetector::new(DetectorConfig::default());
    let detection = detector.detect(&img, &context);

    match &detection.selection {
        CardSelection::Found(candidate) | CardSelection::FoundByFallback(candidate) => {
            let rect = &candidate.rect;
            println!(
                "Card: contour #{} with {} vertices, {:.0}x{:.0} at ({:.0}, {:.0}), ratio {:.2}{}",
                candidate.contour_index,
                candidate.vertices,
                rect.long_side(),
                rect.short_side(),
                rect.center.x,
                rect.center.y,
                rect.aspect_ratio(),
                if matches!(detection.selection, CardSelection::FoundByFallback(_)) {
                    " (fallback)"
                } else {
                    ""
                }
            );
        }
        CardSelection::NotFound { rejected } => {
            println!("No card. Largest contours:");
            for rect in rejected {
                println!("  area {:.0}, ratio {:.2}", rect.area(), rect.aspect_ratio());
            }
        }
    }
    if let Some(portrait) = &detection.portrait {
        let r = &portrait.region;
        println!("Portrait: {}x{} at ({}, {})", r.width, r.height, r.x, r.y);
    }
    println!("{}", detection.outcome().message());

    // Example 2: face classifier with a stricter aspect band
    if let Some(model) = args.get(2) {
        println!("\n=== Face Classifier ===");
        let mut config = DetectorConfig::default()
            .with_strategy(PortraitStrategy::Classifier)
            .with_face_model(model);
        config.card.min_aspect = 1.4;
        config.card.max_aspect = 1.75;
        config.validate()?;

        let detection = CardDetector::new(config).detect(&img, &context);
        if let Some(portrait) = &detection.portrait {
            println!(
                "Face at ({}, {}) score {:.2}",
                portrait.region.x,
                portrait.region.y,
                portrait.confidence.unwrap_or(0.0)
            );
        }
        println!("{}", detection.outcome().message());
    }

    Ok(())
}
