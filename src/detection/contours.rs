use image::GrayImage;
use imageproc::contours::{BorderType, find_contours as trace_borders};

use crate::models::Contour;

/// Which traced borders are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retrieval {
    /// Outermost borders only; anything nested inside another region is dropped.
    External,
    /// Every outer border regardless of nesting. Hole borders are still dropped.
    AllOuter,
}

/// Trace contours in a binary edge image (non-zero pixels are foreground).
///
/// Contours come back in tracing order (raster scan of their starting
/// pixel), which later stages rely on for tie-breaking.
pub fn find_contours(edges: &GrayImage, retrieval: Retrieval) -> Vec<Contour> {
    trace_borders::<i32>(edges)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer))
        .filter(|c| match retrieval {
            Retrieval::External => c.parent.is_none(),
            Retrieval::AllOuter => true,
        })
        .map(|c| Contour::new(c.points))
        .filter(|c| !c.is_empty())
        .collect()
}
