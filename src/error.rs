use derive_more::From;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
    /// An input the pipeline needs (image, mask or source color) is absent
    MissingInput,
    // -- Externals
    #[from]
    Io(std::io::Error),
    #[from]
    Image(image::error::ImageError),
}
