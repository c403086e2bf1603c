use std::path::PathBuf;

use image::{GrayImage, Rgb};
use imageproc::point::Point;

use crate::replacer::color_space::{Hsv8, HsvImage};
use crate::{Args, Error, Result};

pub mod blend;
pub mod color_space;
mod detection;
mod io;
pub mod mask;

pub struct ColorReplacer {
    file: PathBuf,
    base_path: PathBuf,
    pick: Option<Point<u32>>,
    source_color: Option<Rgb<u8>>,
    new_color: Rgb<u8>,
    tolerance: u8,
    feather: u32,
    morph_iterations: u8,
    strength: u8,
    blend_brightness: bool,
    save_preview: bool,
    save_intermediary_images: bool,
    verbose: bool,
}

impl ColorReplacer {
    pub fn new(file: PathBuf, args: &Args) -> Self {
        let base_path = file.parent().unwrap().join(file.file_stem().unwrap());
        Self {
            file,
            base_path,
            pick: args.pick,
            source_color: args.source_color,
            new_color: args.new_color,
            tolerance: args.tolerance,
            feather: args.feather,
            morph_iterations: args.morph_iterations,
            strength: args.strength,
            blend_brightness: args.blend_brightness,
            save_preview: args.save_preview,
            save_intermediary_images: args.save_intermediary_images,
            verbose: args.verbose,
        }
    }

    pub fn process(self) -> Result<()> {
        let image = io::open_image(&self.file)?;
        let image_rgb = image.to_rgb8();
        if self.verbose {
            println!(
                "{}: {}x{}",
                self.file.display(),
                image_rgb.width(),
                image_rgb.height()
            );
            let color = detection::find_dominant_color_hex(&image_rgb);
            println!("{}: dominant color is {}", self.file.display(), color);
        }

        let saver = io::ImageSaver::new(&self.base_path, self.save_intermediary_images);

        let image_hsv = HsvImage::from_rgb(&image_rgb);
        if image_hsv.is_empty() {
            return Err(Error::MissingInput);
        }

        let source = self.resolve_source_color(&image_hsv)?;
        let destination = color_space::rgb_to_hsv(
            i32::from(self.new_color[0]),
            i32::from(self.new_color[1]),
            i32::from(self.new_color[2]),
        );
        if self.verbose {
            println!(
                "{}: changing hsv({}, {}, {}) towards hsv({}, {}, {})",
                self.file.display(),
                source.h,
                source.s,
                source.v,
                destination.h,
                destination.s,
                destination.v
            );
        }

        let selection = self.build_selection_mask(&image_hsv, source, &saver)?;
        let selected = selection.pixels().filter(|p| p[0] > 0).count();
        let total = u64::from(selection.width()) * u64::from(selection.height());
        println!(
            "{}: selected {} of {} pixels",
            self.file.display(),
            selected,
            total
        );

        if self.save_preview {
            let preview = blend::preview_selection(&image_rgb, &selection)?;
            saver.save_rgb_image_as(&preview, "preview")?;
        }

        let replaced = blend::replace_color(
            &image_hsv,
            &selection,
            destination,
            self.strength,
            !self.blend_brightness,
        )?;
        saver.save_rgb_image_as(&replaced, "replaced")?;

        Ok(())
    }

    /// Build the selection mask stage by stage so each stage can be saved for inspection
    fn build_selection_mask(
        &self,
        image: &HsvImage,
        source: Hsv8,
        saver: &io::ImageSaver,
    ) -> Result<GrayImage> {
        let raw = mask::threshold_mask(image, source, self.tolerance);
        saver.save_debug_luma_image_as(&raw, "a-mask-raw")?;
        let feathered = mask::feather_mask(raw, self.feather);
        saver.save_debug_luma_image_as(&feathered, "b-mask-feathered")?;
        let cleaned = mask::cleanup_mask(feathered, self.morph_iterations);
        saver.save_debug_luma_image_as(&cleaned, "c-mask-cleaned")?;
        Ok(cleaned)
    }

    /// Resolve the color to change from the picked pixel or the given color
    ///
    /// Pick coordinates outside the image are clamped to the nearest edge pixel.
    fn resolve_source_color(&self, image: &HsvImage) -> Result<Hsv8> {
        if let Some(point) = self.pick {
            let x = point.x.min(image.width() - 1);
            let y = point.y.min(image.height() - 1);
            return Ok(image.get_pixel(x, y));
        }
        match self.source_color {
            Some(color) => Ok(color_space::rgb_to_hsv(
                i32::from(color[0]),
                i32::from(color[1]),
                i32::from(color[2]),
            )),
            None => Err(Error::MissingInput),
        }
    }
}
