mod common;

use common::*;
use std::process::Command;
use tempfile::TempDir;

fn cardcrop() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cardcrop"))
}

#[test]
fn test_blank_image_reports_no_card() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let image = dir.path().join("blank.png");
    uniform_image(400, 300).save(&image)?;

    let output = cardcrop().arg(&image).current_dir(dir.path()).output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No card-like rectangles found."));
    assert!(stdout.contains("Processed image size: 400 x 300"));
    Ok(())
}

#[test]
fn test_card_image_writes_crops_with_prefix() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let image = dir.path().join("card.png");
    synthetic_card_image().save(&image)?;

    let output = cardcrop()
        .arg(&image)
        .args(["--output-prefix", "out/id_"])
        .current_dir(dir.path())
        .output()?;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Card with portrait detected."));
    assert!(dir.path().join("out/id_cropped_card.jpg").exists());
    assert!(dir.path().join("out/id_cropped_portrait.jpg").exists());
    assert!(!dir.path().join("out/id_canny_edges.jpg").exists());
    Ok(())
}

#[test]
fn test_debug_flag_writes_log_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let image = dir.path().join("card.png");
    synthetic_card_image().save(&image)?;

    let output = cardcrop()
        .arg(&image)
        .arg("--debug")
        .current_dir(dir.path())
        .output()?;
    assert!(output.status.success());
    assert!(dir.path().join("debug.log").exists());
    assert!(dir.path().join("detected_rectangles.jpg").exists());
    Ok(())
}

#[test]
fn test_debug_log_follows_prefix_into_new_directory() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let image = dir.path().join("card.png");
    synthetic_card_image().save(&image)?;

    let output = cardcrop()
        .arg(&image)
        .args(["--debug", "--output-prefix", "runs/first/id_"])
        .current_dir(dir.path())
        .output()?;
    assert!(output.status.success());

    let log = dir.path().join("runs/first/id_debug.log");
    assert!(log.exists(), "missing {}", log.display());
    assert!(std::fs::metadata(&log)?.len() > 0);
    assert!(dir.path().join("runs/first/id_cropped_card.jpg").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("could not open"), "stderr: {}", stderr);
    Ok(())
}

#[test]
fn test_classifier_without_model_still_crops_card() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let image = dir.path().join("card.png");
    synthetic_card_image().save(&image)?;

    let output = cardcrop()
        .arg(&image)
        .args(["--portrait-strategy", "classifier"])
        .current_dir(dir.path())
        .output()?;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No portrait detected."));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--face-model"));
    assert!(dir.path().join("cropped_card.jpg").exists());
    Ok(())
}

#[test]
fn test_missing_image_fails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let output = cardcrop().arg("missing.png").current_dir(dir.path()).output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.png"));
    Ok(())
}

#[test]
fn test_help_lists_options() -> anyhow::Result<()> {
    let output = cardcrop().arg("--help").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--debug"));
    assert!(stdout.contains("--output-prefix"));
    assert!(stdout.contains("--portrait-strategy"));
    assert!(stdout.contains("must be supplied"));
    Ok(())
}
