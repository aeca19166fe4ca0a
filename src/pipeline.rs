use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::Error;

/// Context handed to every pipeline stage.
///
/// Carries where outputs go and whether intermediate images are written, so
/// stages never reach for global state.
#[derive(Clone, Debug)]
pub struct PipelineContext {
    pub verbose: bool,
    /// Write intermediate images next to the final outputs.
    pub debug: bool,
    /// Prepended verbatim to every output file name (may contain a directory).
    pub output_prefix: String,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self {
            verbose: false,
            debug: false,
            output_prefix: String::new(),
        }
    }

    /// Enable verbose diagnostics
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable writing of intermediate images
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Full path of an output file: the prefix followed by `name`.
    pub fn output_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.output_prefix, name))
    }

    /// Save an intermediate image if debug mode is on. Failures are logged, never fatal.
    pub fn save_debug_image(&self, name: &str, image: &DynamicImage) {
        if !self.debug_enabled() {
            return;
        }
        self.save_output(name, image);
    }

    /// Save a final output image. Failures are logged, never fatal.
    pub fn save_output(&self, name: &str, image: &DynamicImage) -> Option<PathBuf> {
        let path = self.output_path(name);
        match write_image(&path, image) {
            Ok(()) => {
                debug!(path = %path.display(), "saved image");
                Some(path)
            }
            Err(err) => {
                warn!(error = %err, "failed to save image");
                None
            }
        }
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}

fn write_image(path: &Path, image: &DynamicImage) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::Output {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?;
    }

    // JPEG has no alpha channel.
    let image = match image {
        DynamicImage::ImageRgba8(_) | DynamicImage::ImageLumaA8(_) => {
            DynamicImage::ImageRgb8(image.to_rgb8())
        }
        other => other.clone(),
    };

    image.save(path).map_err(|source| Error::Output {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_prepended_verbatim() {
        let ctx = PipelineContext::new().with_output_prefix("out/test_");
        assert_eq!(ctx.output_path("cropped_card.jpg"), PathBuf::from("out/test_cropped_card.jpg"));
    }

    #[test]
    fn debug_flag_round_trips() {
        assert!(!PipelineContext::new().debug_enabled());
        assert!(PipelineContext::new().with_debug(true).debug_enabled());
        assert!(!PipelineContext::new().with_debug(false).debug_enabled());
    }

    #[test]
    fn debug_images_are_only_written_in_debug_mode() {
        let dir = tempfile::TempDir::new().unwrap();
        let prefix = format!("{}/", dir.path().display());
        let image = DynamicImage::ImageRgb8(image::RgbImage::new(8, 8));

        let quiet = PipelineContext::new().with_output_prefix(prefix.clone());
        quiet.save_debug_image("quiet.jpg", &image);
        assert!(!dir.path().join("quiet.jpg").exists());

        let loud = quiet.with_debug(true);
        loud.save_debug_image("loud.jpg", &image);
        assert!(dir.path().join("loud.jpg").exists());
    }
}
