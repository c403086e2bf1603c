use image::{Rgb, RgbImage};
use palette::{FromColor, Hsv, Srgb};

/// Highest hue value in the cylindrical encoding
///
/// Hue is stored in half-degree steps so a full turn fits in a byte,
/// which makes 179 adjacent to 0.
pub const HUE_MAX: u8 = 179;

/// A color in the cylindrical hue/saturation/value encoding
///
/// Hue is 0-179 and circular, saturation and value are 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv8 {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// Convert an additive red/green/blue color to the cylindrical encoding
///
/// Channels outside 0-255 are silently clamped. Image pixels and picked
/// colors both pass through here, so the two origins always agree.
pub fn rgb_to_hsv(r: i32, g: i32, b: i32) -> Hsv8 {
    let srgb = Srgb::new(
        clamp_channel(r) as f32 / 255.0,
        clamp_channel(g) as f32 / 255.0,
        clamp_channel(b) as f32 / 255.0,
    );
    let hsv: Hsv = Hsv::from_color(srgb);
    let degrees = hsv.hue.into_positive_degrees();
    Hsv8 {
        h: (degrees * f32::from(HUE_MAX) / 360.0).round() as u8,
        s: (hsv.saturation * 255.0).round() as u8,
        v: (hsv.value * 255.0).round() as u8,
    }
}

/// Convert a cylindrical color back to additive red/green/blue
pub fn hsv_to_rgb(color: Hsv8) -> Rgb<u8> {
    let hsv = Hsv::new(
        f32::from(color.h) * 360.0 / f32::from(HUE_MAX),
        f32::from(color.s) / 255.0,
        f32::from(color.v) / 255.0,
    );
    let srgb = Srgb::from_color(hsv);
    Rgb([
        (srgb.red * 255.0).round() as u8,
        (srgb.green * 255.0).round() as u8,
        (srgb.blue * 255.0).round() as u8,
    ])
}

fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// An image plane in the cylindrical encoding, one [`Hsv8`] per pixel
///
/// Buffers are immutable once built; every transform over them returns a
/// new buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsvImage {
    width: u32,
    height: u32,
    pixels: Vec<Hsv8>,
}

impl HsvImage {
    /// Construct an image plane by evaluating a closure for each pixel
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Hsv8,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert a decoded additive image into the cylindrical encoding
    pub fn from_rgb(image: &RgbImage) -> Self {
        Self::from_fn(image.width(), image.height(), |x, y| {
            let pixel = image.get_pixel(x, y);
            rgb_to_hsv(
                i32::from(pixel[0]),
                i32::from(pixel[1]),
                i32::from(pixel[2]),
            )
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel at the given coordinate, panics when out of bounds
    pub fn get_pixel(&self, x: u32, y: u32) -> Hsv8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Iterate over all pixels with their coordinates, row by row
    pub fn enumerate_pixels(&self) -> impl Iterator<Item = (u32, u32, Hsv8)> + '_ {
        let width = self.width;
        self.pixels.iter().enumerate().map(move |(i, &pixel)| {
            let i = i as u32;
            (i % width, i / width, pixel)
        })
    }
}
