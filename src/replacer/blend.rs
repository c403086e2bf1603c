use image::{GrayImage, Rgb, RgbImage};

use super::color_space::{self, Hsv8, HsvImage, HUE_MAX};
use crate::{Error, Result};

/// Tint color used for selection previews (pure red)
const PREVIEW_TINT: Rgb<u8> = Rgb([255, 0, 0]);
/// Preview blends are damped so the photo stays recognizable under the tint
const PREVIEW_OPACITY: f32 = 0.45;

/// Blend the masked pixels of an image towards a target color
///
/// The mask value scaled by the blend strength percentage decides how far
/// each pixel moves. Brightness is left untouched unless
/// `preserve_brightness` is false. Returns the result as an additive image
/// ready for display or encoding.
pub fn replace_color(
    image: &HsvImage,
    mask: &GrayImage,
    target: Hsv8,
    blend_strength: u8,
    preserve_brightness: bool,
) -> Result<RgbImage> {
    if image.is_empty() || mask.dimensions() != (image.width(), image.height()) {
        return Err(Error::MissingInput);
    }
    let strength = f32::from(blend_strength.min(100)) / 100.0;
    let mut output = RgbImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let alpha = (f32::from(mask.get_pixel(x, y)[0]) / 255.0 * strength).clamp(0.0, 1.0);
        let h = lerp(f32::from(pixel.h), f32::from(target.h), alpha)
            .clamp(0.0, f32::from(HUE_MAX))
            .round() as u8;
        let s = lerp(f32::from(pixel.s), f32::from(target.s), alpha)
            .clamp(0.0, 255.0)
            .round() as u8;
        let v = if preserve_brightness {
            pixel.v
        } else {
            lerp(f32::from(pixel.v), f32::from(target.v), alpha)
                .clamp(0.0, 255.0)
                .round() as u8
        };
        output.put_pixel(x, y, color_space::hsv_to_rgb(Hsv8 { h, s, v }));
    }
    Ok(output)
}

/// Tint the masked region red so the selection can be judged before replacing
///
/// Works directly on the additive image; the damping keeps even a full
/// mask from hiding the photo.
pub fn preview_selection(image: &RgbImage, mask: &GrayImage) -> Result<RgbImage> {
    if image.width() == 0 || image.height() == 0 || mask.dimensions() != image.dimensions() {
        return Err(Error::MissingInput);
    }
    let mut output = RgbImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let alpha = f32::from(mask.get_pixel(x, y)[0]) / 255.0 * PREVIEW_OPACITY;
        let mut blended = [0u8; 3];
        for (c, value) in blended.iter_mut().enumerate() {
            *value = lerp(f32::from(pixel[c]), f32::from(PREVIEW_TINT[c]), alpha)
                .clamp(0.0, 255.0)
                .round() as u8;
        }
        output.put_pixel(x, y, Rgb(blended));
    }
    Ok(output)
}

fn lerp(from: f32, to: f32, alpha: f32) -> f32 {
    (1.0 - alpha) * from + alpha * to
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replacer::color_space::{hsv_to_rgb, rgb_to_hsv};
    use crate::replacer::mask::build_mask;
    use image::Luma;

    fn uniform_image(width: u32, height: u32, color: Hsv8) -> HsvImage {
        HsvImage::from_fn(width, height, |_, _| color)
    }

    fn uniform_mask(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([value]))
    }

    const ORIGINAL: Hsv8 = Hsv8 {
        h: 100,
        s: 180,
        v: 90,
    };
    const TARGET: Hsv8 = Hsv8 {
        h: 20,
        s: 220,
        v: 250,
    };

    #[test]
    fn zero_strength_keeps_every_pixel() {
        let image = uniform_image(3, 2, ORIGINAL);
        let mask = uniform_mask(3, 2, 255);
        let result = replace_color(&image, &mask, TARGET, 0, false).unwrap();
        assert!(result.pixels().all(|p| *p == hsv_to_rgb(ORIGINAL)));
    }

    #[test]
    fn full_strength_reaches_target_color() {
        let image = uniform_image(3, 2, ORIGINAL);
        let mask = uniform_mask(3, 2, 255);
        let result = replace_color(&image, &mask, TARGET, 100, false).unwrap();
        assert!(result.pixels().all(|p| *p == hsv_to_rgb(TARGET)));
    }

    #[test]
    fn preserve_brightness_keeps_value_channel() {
        let image = uniform_image(2, 2, ORIGINAL);
        let mask = uniform_mask(2, 2, 255);
        let result = replace_color(&image, &mask, TARGET, 100, true).unwrap();
        let expected = hsv_to_rgb(Hsv8 {
            h: TARGET.h,
            s: TARGET.s,
            v: ORIGINAL.v,
        });
        assert!(result.pixels().all(|p| *p == expected));
    }

    #[test]
    fn strength_above_hundred_is_clamped() {
        let image = uniform_image(2, 2, ORIGINAL);
        let mask = uniform_mask(2, 2, 255);
        let clamped = replace_color(&image, &mask, TARGET, 200, false).unwrap();
        let full = replace_color(&image, &mask, TARGET, 100, false).unwrap();
        assert_eq!(clamped, full);
    }

    #[test]
    fn masked_out_pixels_are_untouched() {
        let image = uniform_image(2, 2, ORIGINAL);
        let mask = uniform_mask(2, 2, 0);
        let result = replace_color(&image, &mask, TARGET, 100, false).unwrap();
        assert!(result.pixels().all(|p| *p == hsv_to_rgb(ORIGINAL)));
    }

    #[test]
    fn mismatched_mask_is_unavailable() {
        let image = uniform_image(2, 2, ORIGINAL);
        let mask = uniform_mask(3, 3, 255);
        let result = replace_color(&image, &mask, TARGET, 100, false);
        assert!(matches!(result, Err(Error::MissingInput)));
    }

    #[test]
    fn preview_stays_between_image_and_tint() {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(0, 0, Rgb([10, 240, 80]));
        image.put_pixel(1, 0, Rgb([255, 0, 0]));
        image.put_pixel(0, 1, Rgb([0, 0, 0]));
        image.put_pixel(1, 1, Rgb([130, 130, 130]));
        let mask = GrayImage::from_fn(2, 2, |x, y| Luma([(x * 100 + y * 155) as u8]));
        let preview = preview_selection(&image, &mask).unwrap();
        for (x, y, pixel) in image.enumerate_pixels() {
            let blended = preview.get_pixel(x, y);
            for c in 0..3 {
                let lo = pixel[c].min(PREVIEW_TINT[c]);
                let hi = pixel[c].max(PREVIEW_TINT[c]);
                assert!(
                    (lo..=hi).contains(&blended[c]),
                    "channel {c} overshoots at {x},{y}"
                );
            }
        }
    }

    #[test]
    fn preview_with_empty_mask_returns_original() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([12, 34, 56]));
        image.put_pixel(1, 0, Rgb([200, 100, 50]));
        let mask = uniform_mask(2, 1, 0);
        let preview = preview_selection(&image, &mask).unwrap();
        assert_eq!(preview, image);
    }

    #[test]
    fn preview_mismatched_mask_is_unavailable() {
        let image = RgbImage::new(2, 2);
        let mask = uniform_mask(1, 2, 255);
        assert!(matches!(
            preview_selection(&image, &mask),
            Err(Error::MissingInput)
        ));
    }

    #[test]
    fn pipeline_replaces_only_the_selected_region() {
        // Left half green, right half blue; replacing green must leave blue alone
        let green = Rgb([0u8, 255, 0]);
        let blue = Rgb([0u8, 0, 255]);
        let image = RgbImage::from_fn(4, 2, |x, _| if x < 2 { green } else { blue });
        let plane = HsvImage::from_rgb(&image);
        let source = rgb_to_hsv(0, 255, 0);
        let target = rgb_to_hsv(255, 0, 0);
        let mask = build_mask(&plane, source, 20, 0, 0).unwrap();
        let result = replace_color(&plane, &mask, target, 100, false).unwrap();
        for (x, _, pixel) in result.enumerate_pixels() {
            if x < 2 {
                assert_eq!(*pixel, Rgb([255, 0, 0]));
            } else {
                for c in 0..3 {
                    let diff = (i32::from(pixel[c]) - i32::from(blue[c])).abs();
                    assert!(diff <= 3, "unselected pixel drifted by {diff}");
                }
            }
        }
    }
}
