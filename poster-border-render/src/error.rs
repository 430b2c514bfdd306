/// Errors that can occur while decoding, framing or saving a poster.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid {name} border percent {value}: must be between 0 and 50")]
    InvalidPercent { name: &'static str, value: f64 },

    #[error("Image has no pixels")]
    EmptyImage,
}
