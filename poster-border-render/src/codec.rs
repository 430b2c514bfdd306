use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

use crate::RenderError;

/// Decode downloaded poster bytes (PNG, JPEG, WebP, ...).
pub fn decode_poster(bytes: &[u8]) -> Result<DynamicImage, RenderError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Load a poster from disk, sniffing the format from its contents.
pub fn load_poster(path: &Path) -> Result<DynamicImage, RenderError> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Encode an image as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Write an image as PNG to `path`.
///
/// The data goes to a `.part` sibling first and is renamed into place, so an
/// interrupted write never leaves a half-written file at `path`.
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<(), RenderError> {
    let data = encode_png(image)?;
    let part = part_path(path);
    if let Err(e) = fs::write(&part, &data).and_then(|()| fs::rename(&part, path)) {
        discard_part(&part);
        return Err(e.into());
    }
    Ok(())
}

/// Best-effort removal of a leftover `.part` file.
fn discard_part(part: &Path) {
    match fs::remove_file(part) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::debug!("Could not remove {}: {}", part.display(), e),
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
