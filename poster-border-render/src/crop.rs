use image::{DynamicImage, GenericImageView};

/// Region of the source image kept by the crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Target poster size for a source of the given height.
///
/// The height is recomputed from the floored width, so odd source heights
/// can end up one pixel short of a true 2:3 ratio.
pub fn target_dimensions(height: u32) -> (u32, u32) {
    let desired_width = (height as u64 * 2 / 3) as u32;
    let desired_height = (desired_width as u64 * 3 / 2) as u32;
    (desired_width, desired_height)
}

/// Compute the centered crop, or `None` when the image is kept as-is.
///
/// The box trims the same amount from both sides of an axis, so when the
/// excess is odd the result keeps one extra pixel. Sources narrower than 2:3
/// keep their full width and are trimmed vertically instead.
pub fn crop_box(width: u32, height: u32) -> Option<CropBox> {
    let (mut desired_width, mut desired_height) = target_dimensions(height);
    if (width, height) == (desired_width, desired_height) {
        return None;
    }

    if desired_width > width {
        desired_width = width;
        desired_height = (width as u64 * 3 / 2) as u32;
    }

    let left = (width - desired_width) / 2;
    let top = (height - desired_height) / 2;
    if left == 0 && top == 0 {
        return None;
    }

    Some(CropBox {
        left,
        top,
        width: width - 2 * left,
        height: height - 2 * top,
    })
}

/// Center-crop an image to a 2:3 (width:height) poster.
pub fn crop_to_aspect(image: DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    match crop_box(width, height) {
        Some(b) => image.crop_imm(b.left, b.top, b.width, b.height),
        None => image,
    }
}

#[cfg(test)]
#[path = "tests/crop_tests.rs"]
mod tests;
