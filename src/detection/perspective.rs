use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use imageproc::point::Point;
use tracing::{debug, warn};

use crate::models::RotatedRect;

fn distance(a: Point<f32>, b: Point<f32>) -> f32 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Put the rectangle's corners in a fixed order, independent of how they were enumerated.
///
/// Corners are sorted clockwise (as seen on screen, y pointing down) and
/// rotated so the top-left-most corner comes first. If the first edge is
/// then the short one, the order is shifted back by one corner so the first
/// edge is always a long edge. The result maps directly onto a landscape
/// destination `[top-left, top-right, bottom-right, bottom-left]`.
pub fn canonical_corners(rect: &RotatedRect) -> [Point<f32>; 4] {
    let center = rect.center;
    let mut corners = rect.corners;
    corners.sort_by(|a, b| {
        let angle_a = (a.y - center.y).atan2(a.x - center.x);
        let angle_b = (b.y - center.y).atan2(b.x - center.x);
        angle_a.total_cmp(&angle_b)
    });

    let start = corners
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.x + a.y).total_cmp(&(b.x + b.y)).then(a.x.total_cmp(&b.x)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    corners.rotate_left(start);

    if distance(corners[0], corners[1]) < distance(corners[1], corners[2]) {
        corners.rotate_right(1);
    }
    corners
}

/// Warp the rectangle's contents into an axis-aligned landscape image.
///
/// The output is `long_side` x `short_side` pixels. Returns `None` for
/// degenerate rectangles or when no projective transform exists.
pub fn normalize_card(image: &RgbImage, rect: &RotatedRect) -> Option<RgbImage> {
    let corners = canonical_corners(rect);
    let width = distance(corners[0], corners[1]).round() as u32;
    let height = distance(corners[1], corners[2]).round() as u32;
    if width == 0 || height == 0 {
        warn!(width, height, "degenerate card rectangle; skipping warp");
        return None;
    }

    let (w, h) = (width as f32, height as f32);
    let src = corners.map(|p| (p.x, p.y));
    let dest = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];

    let Some(projection) = Projection::from_control_points(src, dest) else {
        warn!("failed to compute projective transform");
        return None;
    };

    let mut output = RgbImage::new(width, height);
    warp_into(image, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut output);
    debug!(width, height, "card normalized");
    Some(output)
}
