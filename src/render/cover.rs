use crate::foundation::core::{Rect, Size};

/// Axis along which a cover placement crops the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropAxis {
    /// Image is relatively wider: left and right edges are cropped.
    Horizontal,
    /// Image is relatively taller (or equal): top and bottom edges are cropped.
    Vertical,
}

/// Where an image lands on the canvas under object-fit "cover", in layout units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverPlacement {
    /// Left edge of the drawn image; `<= 0`.
    pub offset_x: f64,
    /// Top edge of the drawn image; `<= 0`.
    pub offset_y: f64,
    /// Scaled image width; `>=` canvas width.
    pub draw_width: f64,
    /// Scaled image height; `>=` canvas height.
    pub draw_height: f64,
    /// Which edges overflow the canvas.
    pub crop: CropAxis,
}

impl CoverPlacement {
    /// Destination rectangle; always contains the whole canvas.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.offset_x + self.draw_width,
            self.offset_y + self.draw_height,
        )
    }
}

/// Compute the cover placement of `image` on `canvas`.
///
/// If the image aspect ratio exceeds the canvas's, the image matches the canvas height and is
/// centered horizontally; otherwise it matches the width and is centered vertically. Returns
/// `None` when either size is empty or not finite.
pub fn cover_fit(image: Size, canvas: Size) -> Option<CoverPlacement> {
    let valid = |s: Size| s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0;
    if !valid(image) || !valid(canvas) {
        return None;
    }

    let image_ratio = image.width / image.height;
    let canvas_ratio = canvas.width / canvas.height;

    let placement = if image_ratio > canvas_ratio {
        let draw_width = canvas.height * image_ratio;
        CoverPlacement {
            offset_x: (canvas.width - draw_width) / 2.0,
            offset_y: 0.0,
            draw_width,
            draw_height: canvas.height,
            crop: CropAxis::Horizontal,
        }
    } else {
        let draw_height = canvas.width / image_ratio;
        CoverPlacement {
            offset_x: 0.0,
            offset_y: (canvas.height - draw_height) / 2.0,
            draw_width: canvas.width,
            draw_height,
            crop: CropAxis::Vertical,
        }
    };
    Some(placement)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cover.rs"]
mod tests;
