use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::point::Point;

use crate::models::{BoundingBox, RotatedRect};

pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// Outline a closed polygon.
pub fn draw_polygon(canvas: &mut RgbImage, points: &[Point<f32>], color: Rgb<u8>) {
    if points.len() < 2 {
        return;
    }
    for (i, start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        draw_line_segment_mut(canvas, (start.x, start.y), (end.x, end.y), color);
    }
}

pub fn draw_rotated_rect(canvas: &mut RgbImage, rect: &RotatedRect, color: Rgb<u8>) {
    draw_polygon(canvas, &rect.corners, color);
}

/// Outline a box two pixels thick.
pub fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    draw_hollow_rect_mut(canvas, bbox.to_rect(), color);
    if bbox.width > 2 && bbox.height > 2 {
        let inner = BoundingBox {
            x: bbox.x + 1,
            y: bbox.y + 1,
            width: bbox.width - 2,
            height: bbox.height - 2,
        };
        draw_hollow_rect_mut(canvas, inner.to_rect(), color);
    }
}

/// Copy of `image` with every simplified contour in green and the chosen card in red.
pub fn contour_overlay(
    image: &RgbImage,
    polygons: &[Vec<Point<i32>>],
    selected: Option<&RotatedRect>,
) -> RgbImage {
    let mut canvas = image.clone();
    for polygon in polygons {
        let points: Vec<Point<f32>> = polygon
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();
        draw_polygon(&mut canvas, &points, GREEN);
    }
    if let Some(rect) = selected {
        draw_rotated_rect(&mut canvas, rect, RED);
    }
    canvas
}
