pub mod border;
pub mod codec;
pub mod color;
pub mod crop;
pub mod error;

pub use border::{BorderStyle, apply_border, border_size};
pub use codec::{decode_poster, encode_png, load_poster, save_png};
pub use color::BorderColor;
pub use crop::{CropBox, crop_box, crop_to_aspect};
pub use error::RenderError;
