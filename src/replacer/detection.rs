use std::collections::HashMap;

use image::{Pixel, Rgb, RgbImage};
use itertools::Itertools;

/// Find the color that occurs the most in the specified image
pub(crate) fn find_dominant_color(image: &RgbImage) -> Rgb<u8> {
    let mut color_map: HashMap<Rgb<u8>, u32> = HashMap::new();
    for (_x, _y, pixel) in image.enumerate_pixels() {
        *color_map.entry(*pixel).or_insert(0) += 1;
    }
    color_map
        .into_iter()
        .sorted_by_key(|&(_, count)| count)
        .next_back()
        .map(|(color, _)| color)
        .unwrap_or(Rgb([0, 0, 0]))
}

/// Return the dominant color in the image as hex #RRGGBB
pub(crate) fn find_dominant_color_hex(image: &RgbImage) -> String {
    let color = find_dominant_color(image);
    format!(
        "#{}",
        color.channels().iter().map(|c| format!("{c:02X}")).join("")
    )
}
