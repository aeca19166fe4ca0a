mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from cardcrop for tests
pub use cardcrop::{
    CardDetector, CardParams, CardSelection, Contour, DetectorConfig, Outcome, PipelineContext,
    PortraitStrategy, RotatedRect,
};
