use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, RgbImage};
use rustface::{Detector, ImageData};
use tracing::{debug, warn};

use crate::config::{DetectorConfig, PortraitParams, PortraitStrategy};
use crate::detection::annotate::{self, BLUE, GREEN, RED};
use crate::detection::contours::{Retrieval, find_contours};
use crate::detection::preprocessing;
use crate::detection::selector::in_band;
use crate::error::{Error, Result};
use crate::models::{BoundingBox, Portrait};
use crate::pipeline::PipelineContext;

const DEBUG_IMAGE: &str = "portrait_detection_debug.jpg";

/// Smallest window the face cascade accepts.
const MIN_CASCADE_FACE: u32 = 20;

/// Finds a portrait inside a normalized (landscape) card image.
pub trait PortraitLocator: Send + Sync {
    /// Return the portrait region, or `None` if the card has no acceptable portrait.
    ///
    /// Implementations only accept regions starting in the left part of the card.
    fn locate(&self, card: &RgbImage, context: &PipelineContext) -> Option<Portrait>;

    /// Human-readable name for this locator (used in diagnostics)
    fn name(&self) -> &str;
}

/// Build the locator selected by the configuration.
pub fn locator_for(config: &DetectorConfig) -> Box<dyn PortraitLocator> {
    match config.portrait.strategy {
        PortraitStrategy::Geometric => Box::new(GeometricLocator {
            params: config.portrait.clone(),
            canny_low: config.canny_low,
            canny_high: config.canny_high,
        }),
        PortraitStrategy::Classifier => Box::new(ClassifierLocator::new(
            FaceModelSource::Path(config.portrait.face_model.clone()),
            config.portrait.clone(),
        )),
    }
}

/// Looks for a portrait-shaped box in the card's own edge map.
pub struct GeometricLocator {
    pub params: PortraitParams,
    pub canny_low: f32,
    pub canny_high: f32,
}

impl PortraitLocator for GeometricLocator {
    fn locate(&self, card: &RgbImage, context: &PipelineContext) -> Option<Portrait> {
        let (width, height) = card.dimensions();
        let card_area = width as f64 * height as f64;
        let left_limit = width as f64 * self.params.max_left_fraction;

        let gray = preprocessing::to_grayscale(card);
        let blurred = preprocessing::apply_blur(&gray, self.params.blur_sigma);
        let edges = preprocessing::detect_edges(&blurred, self.canny_low, self.canny_high);

        // The card's own frame encloses the photo, so nested outlines count too.
        let contours = find_contours(&edges, Retrieval::AllOuter);
        debug!(count = contours.len(), "portrait contours");

        let mut annotated = context.debug_enabled().then(|| card.clone());
        let mut found = None;

        for (index, contour) in contours.iter().enumerate() {
            let Some(rect) = contour.min_area_rect() else {
                continue;
            };
            let ratio = rect.portrait_ratio();
            let area = rect.area();
            if !in_band(ratio, self.params.min_aspect, self.params.max_aspect)
                || area <= card_area * self.params.min_area_fraction
            {
                continue;
            }

            let left_side = (rect.center.x as f64) < left_limit;
            if let Some(canvas) = annotated.as_mut() {
                annotate::draw_rotated_rect(canvas, &rect, if left_side { GREEN } else { BLUE });
            }
            if !left_side {
                debug!(contour = index, center_x = rect.center.x, "portrait-shaped box outside the left side");
                continue;
            }

            if let Some(region) = rect.bounding_box(width, height) {
                debug!(contour = index, aspect_ratio = ratio, area, "detected possible portrait region");
                found = Some(Portrait {
                    region,
                    confidence: None,
                });
                break;
            }
        }

        if let Some(canvas) = annotated {
            context.save_debug_image(DEBUG_IMAGE, &DynamicImage::ImageRgb8(canvas));
        }
        found
    }

    fn name(&self) -> &str {
        "Geometric Portrait Search"
    }
}

/// Decide whether a detected face at `(x, y)` of size `w` x `h` is the card's portrait.
///
/// The face must cover `min_face_fraction` of the card in both directions and
/// its left edge must lie within `max_left_fraction` of the card width. The
/// accepted region is clamped to the card.
pub fn accept_face(
    x: i64,
    y: i64,
    w: u32,
    h: u32,
    card_width: u32,
    card_height: u32,
    params: &PortraitParams,
) -> Option<BoundingBox> {
    let min_w = card_width as f64 * params.min_face_fraction;
    let min_h = card_height as f64 * params.min_face_fraction;
    if (w as f64) < min_w || (h as f64) < min_h {
        return None;
    }
    if x as f64 >= card_width as f64 * params.max_left_fraction {
        return None;
    }
    BoundingBox::clamped(x, y, x + w as i64, y + h as i64, card_width, card_height)
}

/// Where the face cascade model comes from.
#[derive(Debug, Clone)]
pub enum FaceModelSource {
    Path(PathBuf),
    /// Model bytes already in memory, e.g. from `include_bytes!`.
    Bytes(Vec<u8>),
}

/// Runs a pretrained frontal face cascade over the equalized card.
pub struct ClassifierLocator {
    source: FaceModelSource,
    params: PortraitParams,
}

impl ClassifierLocator {
    pub fn new(source: FaceModelSource, params: PortraitParams) -> Self {
        Self { source, params }
    }

    fn load_detector(&self) -> Result<Box<dyn Detector>> {
        match &self.source {
            FaceModelSource::Path(path) => rustface::create_detector(&path.to_string_lossy())
                .map_err(|e| Error::FaceModel(format!("{}: {}", path.display(), e))),
            FaceModelSource::Bytes(bytes) => rustface::model::read_model(Cursor::new(bytes.as_slice()))
                .map(rustface::create_detector_with_model)
                .map_err(|e| Error::FaceModel(format!("embedded model: {}", e))),
        }
    }
}

impl PortraitLocator for ClassifierLocator {
    fn locate(&self, card: &RgbImage, context: &PipelineContext) -> Option<Portrait> {
        let (width, height) = card.dimensions();
        if width.min(height) < MIN_CASCADE_FACE {
            debug!(width, height, "card too small for face detection");
            return None;
        }

        let mut detector = match self.load_detector() {
            Ok(detector) => detector,
            Err(err) => {
                warn!(
                    error = %err,
                    "face classifier unavailable (supply the model with --face-model); reporting no portrait"
                );
                return None;
            }
        };

        let min_face = (width.max(height) as f64 * self.params.min_face_fraction).ceil() as u32;
        let min_face = min_face.max(MIN_CASCADE_FACE);
        detector.set_min_face_size(min_face);
        detector.set_score_thresh(self.params.score_threshold);
        detector.set_pyramid_scale_factor(self.params.pyramid_scale);
        detector.set_slide_window_step(self.params.window_step, self.params.window_step);

        let gray = preprocessing::equalize(&preprocessing::to_grayscale(card));
        let mut image = ImageData::new(gray.as_raw(), width, height);
        let faces = detector.detect(&mut image);
        debug!(count = faces.len(), min_face, "faces detected");

        let mut annotated = context.debug_enabled().then(|| card.clone());
        let mut found = None;

        for face in &faces {
            let bbox = face.bbox();
            let (x, y, w, h) = (bbox.x() as i64, bbox.y() as i64, bbox.width(), bbox.height());
            if let Some(canvas) = annotated.as_mut() {
                if let Some(region) = BoundingBox::clamped(x, y, x + w as i64, y + h as i64, width, height) {
                    annotate::draw_box(canvas, &region, RED);
                }
            }
            if found.is_some() {
                continue;
            }
            if let Some(region) = accept_face(x, y, w, h, width, height, &self.params) {
                debug!(x, score = face.score(), "face detected in portrait region");
                found = Some(Portrait {
                    region,
                    confidence: Some(face.score()),
                });
            }
        }

        if let Some(canvas) = annotated {
            context.save_debug_image(DEBUG_IMAGE, &DynamicImage::ImageRgb8(canvas));
        }
        found
    }

    fn name(&self) -> &str {
        "Face Classifier"
    }
}
