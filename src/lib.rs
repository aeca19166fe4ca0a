pub mod config;
pub mod detection;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;

pub use config::{CardParams, DetectorConfig, PortraitParams, PortraitStrategy};
pub use detection::portrait::{ClassifierLocator, FaceModelSource, GeometricLocator, PortraitLocator};
pub use detection::{CardDetector, Detection, load_image};
pub use error::{Error, Result};
pub use models::{BoundingBox, CardCandidate, CardSelection, Contour, Outcome, Portrait, RotatedRect};
pub use pipeline::PipelineContext;
