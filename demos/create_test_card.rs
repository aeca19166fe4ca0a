use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Rotate `(x, y)` around `(cx, cy)` by `angle` radians.
fn rotate(x: f32, y: f32, cx: f32, cy: f32, angle: f32) -> Point<i32> {
    let (sin, cos) = angle.sin_cos();
    let (dx, dy) = (x - cx, y - cy);
    Point::new(
        (cx + dx * cos - dy * sin).round() as i32,
        (cy + dx * sin + dy * cos).round() as i32,
    )
}

fn rotated_rect(x: f32, y: f32, w: f32, h: f32, cx: f32, cy: f32, angle: f32) -> Vec<Point<i32>> {
    vec![
        rotate(x, y, cx, cy, angle),
        rotate(x + w, y, cx, cy, angle),
        rotate(x + w, y + h, cx, cy, angle),
        rotate(x, y + h, cx, cy, angle),
    ]
}

fn main() -> anyhow::Result<()> {
    let (width, height) = (1200u32, 900u32);
    let mut img = RgbImage::from_pixel(width, height, Rgb([70, 60, 55]));

    // Some clutter on the table
    draw_filled_rect_mut(&mut img, Rect::at(40, 40).of_size(120, 60), Rgb([200, 180, 60]));
    draw_filled_rect_mut(&mut img, Rect::at(1020, 760).of_size(140, 90), Rgb([40, 90, 160]));

    // ID-1 proportions (85.6 x 54 mm), tilted by 12 degrees.
    let (card_w, card_h) = (640.0, 404.0);
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let (left, top) = (cx - card_w / 2.0, cy - card_h / 2.0);
    let angle = 12f32.to_radians();

    let card = rotated_rect(left, top, card_w, card_h, cx, cy, angle);
    draw_polygon_mut(&mut img, &card, Rgb([235, 235, 225]));

    // Portrait: 3:4 box near the left edge of the card
    let photo = rotated_rect(left + 40.0, top + 80.0, 165.0, 220.0, cx, cy, angle);
    draw_polygon_mut(&mut img, &photo, Rgb([60, 60, 70]));

    // Text lines on the right
    for row in 0..5 {
        let y = top + 100.0 + row as f32 * 45.0;
        let line = rotated_rect(left + 260.0, y, 320.0, 14.0, cx, cy, angle);
        draw_polygon_mut(&mut img, &line, Rgb([120, 120, 120]));
    }

    let path = "test_card.png";
    img.save(path)?;
    println!("Created {} ({}x{}, card tilted 12 degrees)", path, width, height);
    Ok(())
}
