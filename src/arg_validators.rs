use color::{AlphaColor, ParseError};
use image::Rgb;
use imageproc::point::Point;
use itertools::Itertools;

/// Parse a string like X,Y into a pixel coordinate
pub(crate) fn validate_pick_point(value: &str) -> Result<Point<u32>, String> {
    let Some((x, y)) = value.split(',').map(str::trim).collect_tuple() else {
        return Err("Expected a coordinate like X,Y".to_string());
    };
    let x = x
        .parse::<u32>()
        .map_err(|_| "Not a valid x coordinate".to_string())?;
    let y = y
        .parse::<u32>()
        .map_err(|_| "Not a valid y coordinate".to_string())?;
    Ok(Point::new(x, y))
}

pub(crate) fn validate_color(value: &str) -> Result<Rgb<u8>, String> {
    match parse_color(value) {
        Ok(color) => Ok(color),
        Err(e) => Err(e.to_string()),
    }
}

/// Parse a string into a color, with format like this #RRGGBB
fn parse_color(color: &str) -> Result<Rgb<u8>, ParseError> {
    let color = color::parse_color(color)?;
    let color: AlphaColor<color::Srgb> = color.to_alpha_color();
    let [r, g, b, _] = color.to_rgba8().to_u8_array();
    Ok(Rgb([r, g, b]))
}
