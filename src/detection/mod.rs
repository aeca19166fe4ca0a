pub mod annotate;
pub mod contours;
pub mod perspective;
pub mod portrait;
pub mod preprocessing;
pub mod selector;

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader, RgbImage};
use tracing::{debug, info, instrument};

use crate::config::DetectorConfig;
use crate::detection::contours::Retrieval;
use crate::detection::portrait::{PortraitLocator, locator_for};
use crate::error::{Error, Result};
use crate::models::{CardSelection, Outcome, Portrait};
use crate::pipeline::PipelineContext;

/// Load and decode the input image. The only fatal step of a run.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let read_error = |source| Error::ImageRead {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(read_error)?
        .with_guessed_format()
        .map_err(read_error)?
        .decode()
        .map_err(|source| Error::ImageDecode {
            path: path.to_path_buf(),
            source,
        })
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct Detection {
    /// The downscaled working image all coordinates refer to.
    pub processed: RgbImage,
    pub selection: CardSelection,
    /// Perspective-corrected card, present when a card was selected and warped.
    pub card: Option<RgbImage>,
    /// Portrait inside `card`.
    pub portrait: Option<Portrait>,
}

impl Detection {
    pub fn outcome(&self) -> Outcome {
        match (&self.card, &self.portrait) {
            (None, _) => Outcome::NoCard,
            (Some(_), None) => Outcome::CardWithoutPortrait,
            (Some(_), Some(_)) => Outcome::CardWithPortrait,
        }
    }

    /// Crop of the portrait region out of the normalized card.
    pub fn portrait_image(&self) -> Option<RgbImage> {
        let card = self.card.as_ref()?;
        let region = &self.portrait.as_ref()?.region;
        Some(
            image::imageops::crop_imm(card, region.x, region.y, region.width, region.height)
                .to_image(),
        )
    }
}

/// Card and portrait detection orchestrator
pub struct CardDetector {
    config: DetectorConfig,
    locator: Box<dyn PortraitLocator>,
}

impl CardDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let locator = locator_for(&config);
        Self { config, locator }
    }

    /// Replace the portrait locator chosen by the configuration.
    pub fn with_locator(mut self, locator: Box<dyn PortraitLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the full pipeline on an image
    #[instrument(skip_all, fields(width = img.width(), height = img.height()))]
    pub fn detect(&self, img: &DynamicImage, context: &PipelineContext) -> Detection {
        let processed = preprocessing::limit_size(img, self.config.max_dimension);
        debug!(width = processed.width(), height = processed.height(), "working image");
        context.save_debug_image("original_image.jpg", &DynamicImage::ImageRgb8(processed.clone()));

        let selection = self.find_card(&processed, context);

        let card = selection
            .rect()
            .and_then(|rect| perspective::normalize_card(&processed, rect));
        if let Some(card) = &card {
            context.save_debug_image("detected_card.jpg", &DynamicImage::ImageRgb8(card.clone()));
        }

        let portrait = card.as_ref().and_then(|card| {
            debug!(locator = self.locator.name(), "searching for portrait");
            self.locator.locate(card, context)
        });

        let detection = Detection {
            processed,
            selection,
            card,
            portrait,
        };
        info!(outcome = ?detection.outcome(), "detection finished");
        detection
    }

    /// Preprocess, extract contours and select the card rectangle.
    pub fn find_card(&self, processed: &RgbImage, context: &PipelineContext) -> CardSelection {
        let (width, height) = processed.dimensions();

        let gray = preprocessing::to_grayscale(processed);
        let blurred = preprocessing::apply_blur(&gray, self.config.blur_sigma);
        let edges = preprocessing::detect_edges(&blurred, self.config.canny_low, self.config.canny_high);
        let edges = preprocessing::close_edges(&edges, self.config.close_radius);
        context.save_debug_image("canny_edges.jpg", &DynamicImage::ImageLuma8(edges.clone()));

        let all_contours = contours::find_contours(&edges, Retrieval::External);
        debug!(count = all_contours.len(), "total contours found");

        let image_area = width as f64 * height as f64;
        let selection = selector::select_card(&all_contours, image_area, &self.config.card);

        if context.debug_enabled() {
            let polygons: Vec<_> = all_contours
                .iter()
                .map(|c| c.simplify(self.config.card.approx_epsilon_fraction))
                .collect();
            let overlay = annotate::contour_overlay(processed, &polygons, selection.rect());
            context.save_debug_image("detected_rectangles.jpg", &DynamicImage::ImageRgb8(overlay));
        }

        if !selection.is_found() {
            debug!(width, height, "no card found in processed image");
        }
        selection
    }

    /// Write the final crops. Returns the files that were written.
    pub fn write_outputs(&self, detection: &Detection, context: &PipelineContext) -> Vec<PathBuf> {
        let mut written = Vec::new();
        if let Some(card) = &detection.card {
            written.extend(context.save_output("cropped_card.jpg", &DynamicImage::ImageRgb8(card.clone())));
        }
        if let Some(portrait) = detection.portrait_image() {
            written.extend(context.save_output("cropped_portrait.jpg", &DynamicImage::ImageRgb8(portrait)));
        }
        written
    }
}
