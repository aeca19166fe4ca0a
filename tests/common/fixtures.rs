#![allow(dead_code)]

use cardcrop::Contour;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::point::Point;
use imageproc::rect::Rect;
use tempfile::NamedTempFile;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Card outline drawn by [`synthetic_card_image`]: 706x446 (ratio ~1.583, half the image area).
pub const CARD_X: u32 = 147;
pub const CARD_Y: u32 = 92;
pub const CARD_W: u32 = 706;
pub const CARD_H: u32 = 446;

/// Outline a rectangle with lines `thickness` pixels wide, drawn inwards.
pub fn draw_frame(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, thickness: u32, color: Rgb<u8>) {
    let (x, y) = (x as i32, y as i32);
    let t = thickness;
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(w, t), color);
    draw_filled_rect_mut(img, Rect::at(x, y + (h - t) as i32).of_size(w, t), color);
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(t, h), color);
    draw_filled_rect_mut(img, Rect::at(x + (w - t) as i32, y).of_size(t, h), color);
}

/// 1000x630 white image with one black card outline and a 3:4 photo box in
/// the card's top-left area.
pub fn synthetic_card_image() -> RgbImage {
    let mut img = RgbImage::from_pixel(1000, 630, WHITE);
    draw_frame(&mut img, CARD_X, CARD_Y, CARD_W, CARD_H, 6, BLACK);
    draw_frame(&mut img, CARD_X + 40, CARD_Y + 60, 150, 200, 5, BLACK);
    img
}

/// A normalized-card-sized image with a single box outline.
pub fn card_with_box(x: u32, y: u32, w: u32, h: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(560, 350, WHITE);
    draw_frame(&mut img, x, y, w, h, 4, BLACK);
    img
}

pub fn uniform_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([128, 128, 128]))
}

/// Axis-aligned rectangle given by its four corners.
pub fn rect_contour(x: i32, y: i32, w: i32, h: i32) -> Contour {
    Contour::new(vec![
        Point::new(x, y),
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ])
}

pub fn triangle_contour(size: i32) -> Contour {
    Contour::new(vec![Point::new(0, 0), Point::new(size, 0), Point::new(size / 2, size)])
}

/// Ten-pointed star: too many sharp vertices to pass as a rectangle.
pub fn star_contour(cx: f64, cy: f64, outer: f64, inner: f64) -> Contour {
    let points = (0..20)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = i as f64 * std::f64::consts::PI / 10.0;
            Point::new(
                (cx + radius * angle.cos()).round() as i32,
                (cy + radius * angle.sin()).round() as i32,
            )
        })
        .collect();
    Contour::new(points)
}

/// Saves an image as PNG to a temp file that is removed on drop.
pub fn save_temp_png(img: &RgbImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}
