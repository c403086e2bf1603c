pub use self::error::{Error, Result};
pub use self::replacer::blend::{preview_selection, replace_color};
pub use self::replacer::color_space::{rgb_to_hsv, Hsv8, HsvImage};
pub use self::replacer::mask::build_mask;

use std::path::PathBuf;

use clap::Parser;
use image::Rgb;
use imageproc::point::Point;
use wild::ArgsOs;

use replacer::ColorReplacer;

mod arg_validators;
mod error;
mod replacer;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image files
    #[arg(required(true))]
    files: Vec<PathBuf>,
    /// Sample the color to change from this pixel, given as X,Y
    #[arg(short, long, value_parser = arg_validators::validate_pick_point)]
    pick: Option<Point<u32>>,
    /// Color to change, given as #RRGGBB (alternative to --pick)
    #[arg(short('c'), long, value_parser = arg_validators::validate_color)]
    source_color: Option<Rgb<u8>>,
    /// Replacement color
    #[arg(short('n'), long, default_value = "#C8C82B", value_parser = arg_validators::validate_color)]
    new_color: Rgb<u8>,
    /// Selection tolerance around the color to change
    #[arg(short('t'), long, default_value_t = 20)]
    tolerance: u8,
    /// Feather radius for soft selection edges (pixels, forced odd)
    #[arg(short('f'), long, default_value_t = 7)]
    feather: u32,
    /// Morphological cleanup iterations (0 disables)
    #[arg(short('m'), long, default_value_t = 1)]
    morph_iterations: u8,
    /// Blend strength percentage (0-100)
    #[arg(short('b'), long, default_value_t = 80)]
    strength: u8,
    /// Blend brightness towards the replacement color instead of keeping it
    #[arg(short('B'), long, default_value_t = false)]
    blend_brightness: bool,
    /// Save a red-tinted preview of the selection
    #[arg(short('P'), long, default_value_t = false)]
    save_preview: bool,
    /// Save intermediary images
    #[arg(short('s'), long, default_value_t = false)]
    save_intermediary_images: bool,
    /// Verbose messages
    #[arg(short('v'), long, default_value_t = false)]
    verbose: bool,
}

pub fn run(args: ArgsOs) -> Result<()> {
    let args = Args::parse_from(args);
    if args.pick.is_none() && args.source_color.is_none() {
        eprintln!("specify the color to change with --pick X,Y or --source-color '#RRGGBB'");
        return Err(Error::MissingInput);
    }
    for file in &args.files {
        let color_replacer = ColorReplacer::new(file.to_owned(), &args);
        color_replacer.process()?;
        println!();
    }
    Ok(())
}
