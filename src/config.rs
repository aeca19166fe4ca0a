use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which portrait locator runs on the normalized card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PortraitStrategy {
    /// Secondary contour search for a portrait-shaped box on the left side.
    Geometric,
    /// Pretrained frontal face cascade.
    Classifier,
}

/// Thresholds for picking the card rectangle out of the contour set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardParams {
    /// Polygon simplification tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_fraction: f64,
    pub min_vertices: usize,
    pub max_vertices: usize,
    /// Candidate area must be strictly above this fraction of the image area.
    pub min_area_fraction: f64,
    /// Candidate area must be strictly below this fraction of the image area.
    pub max_area_fraction: f64,
    /// Inclusive "ID-card-like" aspect band (long side / short side).
    pub min_aspect: f64,
    pub max_aspect: f64,
    /// How many of the largest candidates are checked against the aspect band.
    pub top_k: usize,
    /// How many entries the diagnostics report when listing contours.
    pub report_top: usize,
}

impl Default for CardParams {
    fn default() -> Self {
        Self {
            approx_epsilon_fraction: 0.02,
            min_vertices: 4,
            max_vertices: 15,
            min_area_fraction: 0.10,
            max_area_fraction: 0.80,
            // ISO/IEC 7810 ID-1 is ~1.586; leave room for perspective distortion.
            min_aspect: 1.25,
            max_aspect: 1.90,
            top_k: 5,
            report_top: 5,
        }
    }
}

/// Parameters shared by both portrait strategies plus the strategy switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitParams {
    pub strategy: PortraitStrategy,
    /// A portrait must start within this fraction of the card width, counted from the left.
    pub max_left_fraction: f64,

    // Geometric variant
    pub blur_sigma: f32,
    /// Inclusive band for short side / long side.
    pub min_aspect: f64,
    pub max_aspect: f64,
    pub min_area_fraction: f64,

    // Classifier variant
    /// SeetaFace frontal cascade; not shipped with the crate.
    pub face_model: PathBuf,
    /// Smallest accepted face as a fraction of the card width and height.
    pub min_face_fraction: f64,
    pub score_threshold: f64,
    pub pyramid_scale: f32,
    pub window_step: u32,
}

impl Default for PortraitParams {
    fn default() -> Self {
        Self {
            strategy: PortraitStrategy::Geometric,
            max_left_fraction: 0.4,
            blur_sigma: 1.1,
            min_aspect: 0.6,
            max_aspect: 0.9,
            min_area_fraction: 0.05,
            face_model: PathBuf::from("assets/seeta_fd_frontal_v1.0.bin"),
            min_face_fraction: 0.2,
            score_threshold: 2.0,
            pyramid_scale: 1.0 / 1.1,
            window_step: 4,
        }
    }
}

/// Full set of tunables for one detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Longest side of the working image; larger inputs are downscaled.
    pub max_dimension: u32,
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// L-infinity radius of the closing applied to the edge mask (2 = 5x5 square).
    pub close_radius: u8,
    pub card: CardParams,
    pub portrait: PortraitParams,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_dimension: 800,
            blur_sigma: 1.7,
            canny_low: 50.0,
            canny_high: 150.0,
            close_radius: 2,
            card: CardParams::default(),
            portrait: PortraitParams::default(),
        }
    }
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_strategy(mut self, strategy: PortraitStrategy) -> Self {
        self.portrait.strategy = strategy;
        self
    }

    pub fn with_face_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.portrait.face_model = path.into();
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Reject values the imaging primitives cannot work with.
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Result<()> {
            Err(Error::InvalidConfig(msg.into()))
        }

        if self.max_dimension == 0 {
            return invalid("max_dimension must be positive");
        }
        if !(self.blur_sigma > 0.0) || !(self.portrait.blur_sigma > 0.0) {
            return invalid("blur sigma must be positive");
        }
        if self.canny_low > self.canny_high {
            return invalid("canny_low must not exceed canny_high");
        }

        let card = &self.card;
        if !(card.approx_epsilon_fraction > 0.0) {
            return invalid("card.approx_epsilon_fraction must be positive");
        }
        if card.min_vertices > card.max_vertices {
            return invalid("card.min_vertices must not exceed card.max_vertices");
        }
        if card.min_area_fraction >= card.max_area_fraction {
            return invalid("card area band is empty");
        }
        if card.min_aspect > card.max_aspect {
            return invalid("card aspect band is empty");
        }
        if card.top_k == 0 {
            return invalid("card.top_k must be at least 1");
        }

        let portrait = &self.portrait;
        if portrait.min_aspect > portrait.max_aspect {
            return invalid("portrait aspect band is empty");
        }
        if !(0.0..=1.0).contains(&portrait.max_left_fraction) {
            return invalid("portrait.max_left_fraction must lie in [0, 1]");
        }
        if !(portrait.pyramid_scale > 0.01 && portrait.pyramid_scale < 0.99) {
            return invalid("portrait.pyramid_scale must lie in (0.01, 0.99)");
        }
        if !(portrait.score_threshold > 0.0) {
            return invalid("portrait.score_threshold must be positive");
        }
        if portrait.window_step == 0 {
            return invalid("portrait.window_step must be positive");
        }

        Ok(())
    }
}
