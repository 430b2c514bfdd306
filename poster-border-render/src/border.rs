use image::{DynamicImage, GenericImageView, Rgb, RgbImage, imageops};

use crate::{BorderColor, RenderError};

/// Largest border percent accepted; beyond this the inner frame inverts.
pub const MAX_BORDER_PERCENT: f64 = 50.0;

/// Double border configuration. Sizes are percentages of the image width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStyle {
    pub outer_percent: f64,
    pub inner_percent: f64,
    pub outer_color: BorderColor,
    pub inner_color: BorderColor,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            outer_percent: 2.0,
            inner_percent: 1.0,
            outer_color: BorderColor::WHITE,
            inner_color: BorderColor::BLACK,
        }
    }
}

impl BorderStyle {
    pub fn validate(&self) -> Result<(), RenderError> {
        for (name, value) in [("outer", self.outer_percent), ("inner", self.inner_percent)] {
            if !value.is_finite() || !(0.0..=MAX_BORDER_PERCENT).contains(&value) {
                return Err(RenderError::InvalidPercent { name, value });
            }
        }
        Ok(())
    }
}

/// Stroke width in pixels for a percentage of `width`.
///
/// Halves round to even (2.5 -> 2, 3.5 -> 4).
pub fn border_size(width: u32, percent: f64) -> u32 {
    (width as f64 * (percent / 100.0)).round_ties_even().max(0.0) as u32
}

/// Frame an image with an outer and an inner rectangular border.
///
/// The image is pasted onto a white canvas of the same size. The outer
/// outline spans `(0, 0)`–`(width, height)` inclusive, so its right and
/// bottom bands lose one pixel to the canvas edge. The inner outline is
/// inset by the outer stroke and drawn last.
pub fn apply_border(image: &DynamicImage, style: &BorderStyle) -> Result<RgbImage, RenderError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage);
    }

    let outer = border_size(width, style.outer_percent);
    let inner = border_size(width, style.inner_percent);

    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    imageops::replace(&mut canvas, &image.to_rgb8(), 0, 0);

    let (w, h) = (width as i64, height as i64);
    let o = outer as i64;
    draw_rect_outline(&mut canvas, (0, 0), (w, h), outer, style.outer_color.to_rgb());
    draw_rect_outline(
        &mut canvas,
        (o, o),
        (w - o, h - o),
        inner,
        style.inner_color.to_rgb(),
    );

    Ok(canvas)
}

/// Draw a rectangle outline with inclusive corners, stroke growing inward.
///
/// Pixels outside the canvas are clipped. A zero stroke or an inverted box
/// draws nothing.
pub(crate) fn draw_rect_outline(
    canvas: &mut RgbImage,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    stroke: u32,
    color: Rgb<u8>,
) {
    let (x0, y0) = top_left;
    let (x1, y1) = bottom_right;
    if stroke == 0 || x1 < x0 || y1 < y0 {
        return;
    }

    let s = stroke as i64;
    let max_y = canvas.height() as i64 - 1;
    for y in y0.max(0)..=y1.min(max_y) {
        let row_depth = (y - y0).min(y1 - y);
        if row_depth < s {
            fill_span(canvas, y, x0, x1, color);
        } else {
            fill_span(canvas, y, x0, (x0 + s - 1).min(x1), color);
            fill_span(canvas, y, (x1 - s + 1).max(x0), x1, color);
        }
    }
}

fn fill_span(canvas: &mut RgbImage, y: i64, from_x: i64, to_x: i64, color: Rgb<u8>) {
    let max_x = canvas.width() as i64 - 1;
    for x in from_x.max(0)..=to_x.min(max_x) {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

#[cfg(test)]
#[path = "tests/border_tests.rs"]
mod tests;
