mod common;

use cardcrop::{ClassifierLocator, FaceModelSource, PortraitLocator, PortraitParams};
use cardcrop::detection::portrait::locator_for;
use common::*;

fn geometric() -> Box<dyn PortraitLocator> {
    locator_for(&DetectorConfig::default())
}

#[test]
fn test_portrait_box_on_left_is_found() {
    let card = card_with_box(30, 50, 120, 160);
    let portrait = geometric()
        .locate(&card, &PipelineContext::new())
        .expect("portrait should be found");

    let limit = card.width() as f32 * 0.4;
    assert!((portrait.region.x as f32) < limit);
    assert!(portrait.region.center().0 < limit);
    assert!(portrait.confidence.is_none());
    // Either side of the drawn outline is acceptable.
    assert!(portrait.region.x <= 40 && portrait.region.x + portrait.region.width >= 140);
}

#[test]
fn test_portrait_box_on_right_is_ignored() {
    let card = card_with_box(380, 50, 120, 160);
    assert!(geometric().locate(&card, &PipelineContext::new()).is_none());
}

#[test]
fn test_square_box_is_not_a_portrait() {
    let card = card_with_box(30, 50, 150, 150);
    assert!(geometric().locate(&card, &PipelineContext::new()).is_none());
}

#[test]
fn test_tiny_box_is_ignored() {
    let card = card_with_box(30, 50, 30, 40);
    assert!(geometric().locate(&card, &PipelineContext::new()).is_none());
}

#[test]
fn test_blank_card_has_no_portrait() {
    let card = uniform_image(560, 350);
    assert!(geometric().locate(&card, &PipelineContext::new()).is_none());
}

#[test]
fn test_strategy_is_chosen_by_config() {
    let config = DetectorConfig::default();
    assert_eq!(locator_for(&config).name(), "Geometric Portrait Search");

    let config = config.with_strategy(PortraitStrategy::Classifier);
    assert_eq!(locator_for(&config).name(), "Face Classifier");
}

#[test]
fn test_missing_face_model_means_no_portrait() {
    let locator = ClassifierLocator::new(
        FaceModelSource::Path("does/not/exist/model.bin".into()),
        PortraitParams::default(),
    );
    let card = card_with_box(30, 50, 120, 160);
    assert!(locator.locate(&card, &PipelineContext::new()).is_none());
}

#[test]
fn test_empty_embedded_model_means_no_portrait() {
    let locator = ClassifierLocator::new(FaceModelSource::Bytes(Vec::new()), PortraitParams::default());
    let card = card_with_box(30, 50, 120, 160);
    assert!(locator.locate(&card, &PipelineContext::new()).is_none());
}

#[test]
fn test_debug_mode_writes_annotated_card() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let prefix = format!("{}/", dir.path().display());
    let context = PipelineContext::new().with_debug(true).with_output_prefix(prefix);

    let card = card_with_box(30, 50, 120, 160);
    assert!(geometric().locate(&card, &context).is_some());
    assert!(dir.path().join("portrait_detection_debug.jpg").exists());
    Ok(())
}
