use image::{GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};

use super::color_space::{Hsv8, HsvImage, HUE_MAX};
use crate::{Error, Result};

/// Build a selection mask marking the pixels similar to a target color
///
/// The mask has the same dimensions as the image, with 255 for a full
/// selection, 0 for none and intermediate values along feathered edges.
pub fn build_mask(
    image: &HsvImage,
    target: Hsv8,
    tolerance: u8,
    feather: u32,
    morph_iterations: u8,
) -> Result<GrayImage> {
    if image.is_empty() {
        return Err(Error::MissingInput);
    }
    let mask = threshold_mask(image, target, tolerance);
    let mask = feather_mask(mask, feather);
    Ok(cleanup_mask(mask, morph_iterations))
}

/// Binary mask of the pixels whose channels all fall within tolerance of the target
///
/// Saturation and value windows are clamped to 0-255. The hue window is
/// circular over 0-179: when it crosses either end it splits in two
/// segments whose memberships are OR-ed together.
pub(crate) fn threshold_mask(image: &HsvImage, target: Hsv8, tolerance: u8) -> GrayImage {
    let tolerance = i32::from(tolerance);
    let hue_ceil = i32::from(HUE_MAX);

    let sat_min = (i32::from(target.s) - tolerance).max(0);
    let sat_max = (i32::from(target.s) + tolerance).min(255);
    let val_min = (i32::from(target.v) - tolerance).max(0);
    let val_max = (i32::from(target.v) + tolerance).min(255);
    let hue_min = i32::from(target.h) - tolerance;
    let hue_max = i32::from(target.h) + tolerance;

    if hue_min < 0 {
        let head = in_range(
            image,
            [0, sat_min, val_min],
            [hue_max, sat_max, val_max],
        );
        let wrapped = in_range(
            image,
            [hue_ceil + hue_min, sat_min, val_min],
            [hue_ceil, sat_max, val_max],
        );
        or_masks(head, &wrapped)
    } else if hue_max > hue_ceil {
        let wrapped = in_range(
            image,
            [0, sat_min, val_min],
            [hue_max - hue_ceil, sat_max, val_max],
        );
        let tail = in_range(
            image,
            [hue_min, sat_min, val_min],
            [hue_ceil, sat_max, val_max],
        );
        or_masks(wrapped, &tail)
    } else {
        in_range(
            image,
            [hue_min, sat_min, val_min],
            [hue_max, sat_max, val_max],
        )
    }
}

/// Soften the mask edges into a gradient with a gaussian blur
///
/// The radius is forced to the next odd kernel size and the standard
/// deviation is derived from that size. A radius of 1 or less skips the
/// blur entirely.
pub(crate) fn feather_mask(mask: GrayImage, feather: u32) -> GrayImage {
    if feather <= 1 {
        return mask;
    }
    let kernel_size = if feather % 2 == 0 { feather + 1 } else { feather };
    let sigma = 0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    gaussian_blur_f32(&mask, sigma)
}

/// Morphological opening then closing over a 3x3 neighborhood
///
/// Opening erodes away isolated specks, closing fills small holes. Both
/// run `iterations` times; 0 leaves the mask untouched.
pub(crate) fn cleanup_mask(mask: GrayImage, iterations: u8) -> GrayImage {
    if iterations == 0 {
        return mask;
    }
    let kernel = Mask::square(1);
    let mut mask = mask;
    for _ in 0..iterations {
        mask = grayscale_erode(&mask, &kernel);
    }
    for _ in 0..iterations {
        mask = grayscale_dilate(&mask, &kernel);
    }
    for _ in 0..iterations {
        mask = grayscale_dilate(&mask, &kernel);
    }
    for _ in 0..iterations {
        mask = grayscale_erode(&mask, &kernel);
    }
    mask
}

/// Per-pixel window test, 255 where every channel lies inside [lower, upper]
fn in_range(image: &HsvImage, lower: [i32; 3], upper: [i32; 3]) -> GrayImage {
    let mut mask = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let [h, s, v] = [i32::from(pixel.h), i32::from(pixel.s), i32::from(pixel.v)];
        let inside = (lower[0]..=upper[0]).contains(&h)
            && (lower[1]..=upper[1]).contains(&s)
            && (lower[2]..=upper[2]).contains(&v);
        if inside {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    mask
}

/// Combine two binary masks with a per-pixel OR
fn or_masks(mut first: GrayImage, second: &GrayImage) -> GrayImage {
    for (x, y, pixel) in first.enumerate_pixels_mut() {
        pixel[0] |= second.get_pixel(x, y)[0];
    }
    first
}
