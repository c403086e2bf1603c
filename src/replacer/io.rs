use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage};

use crate::Result;

/// Open and decode an image file
pub(crate) fn open_image(file: &Path) -> Result<DynamicImage> {
    Ok(image::open(file)?)
}

/// Helper to avoid having to specify common information for saving images over and over again
pub(crate) struct ImageSaver {
    base_path: PathBuf,
    is_debugging: bool,
}

impl ImageSaver {
    /// Construct a new ImageSaver with the specified base path
    pub(crate) fn new(base_path: &Path, is_debugging: bool) -> Self {
        Self {
            base_path: base_path.to_owned(),
            is_debugging,
        }
    }

    /// Save RGB image to PNG file with suffix appended before extension
    pub(crate) fn save_rgb_image_as(&self, img: &RgbImage, suffix: &str) -> Result<()> {
        let filename = self.compute_path(suffix);
        img.save(&filename)?;
        println!("{}: saved", filename.display());
        Ok(())
    }

    /// Save grayscale image to file with suffix appended before extension
    pub(crate) fn save_luma_image_as(&self, img: &GrayImage, suffix: &str) -> Result<()> {
        let filename = self.compute_path(suffix);
        img.save(&filename)?;
        println!("{}: saved", filename.display());
        Ok(())
    }

    /// Save debug grayscale image to file with suffix appended before extension
    /// Do nothing if we've been asked to not save intermediaries
    pub(crate) fn save_debug_luma_image_as(&self, img: &GrayImage, suffix: &str) -> Result<()> {
        if self.is_debugging {
            return self.save_luma_image_as(img, suffix);
        }
        Ok(())
    }

    /// Compute full file path from base path and suffix
    pub(crate) fn compute_path(&self, suffix: &str) -> PathBuf {
        format!("{}-{suffix}.png", self.base_path.display()).into()
    }
}
