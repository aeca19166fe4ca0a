use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::contrast::equalize_histogram;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;

/// Downscale so the longest side is at most `max_dimension`. Never upscales.
pub fn limit_size(img: &DynamicImage, max_dimension: u32) -> RgbImage {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let longest = width.max(height);
    if longest <= max_dimension || max_dimension == 0 {
        return rgb;
    }

    let scale = max_dimension as f64 / longest as f64;
    let new_width = ((width as f64 * scale).round() as u32).max(1);
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    image::imageops::resize(&rgb, new_width, new_height, FilterType::Triangle)
}

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Morphological closing to bridge small gaps in an edge mask.
pub fn close_edges(edges: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return edges.clone();
    }
    close(edges, Norm::LInf, radius)
}

/// Spread the intensity histogram; used before face detection.
pub fn equalize(img: &GrayImage) -> GrayImage {
    equalize_histogram(img)
}
