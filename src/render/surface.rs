use crate::foundation::{
    core::Size,
    error::{ReelError, ReelResult},
};

/// Sizing of a high-DPI drawing surface.
///
/// The backing store holds `layout * device_pixel_ratio` device pixels while the displayed size
/// stays at the unscaled layout size; drawing happens in layout units through a context scaled by
/// the ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceGeometry {
    layout: Size,
    device_pixel_ratio: f64,
    backing_width: u32,
    backing_height: u32,
}

impl SurfaceGeometry {
    /// Geometry for an element with `layout` size on a display with `device_pixel_ratio`.
    ///
    /// A non-finite or non-positive ratio is treated as 1.
    pub fn new(layout: Size, device_pixel_ratio: f64) -> ReelResult<Self> {
        if !layout.width.is_finite() || !layout.height.is_finite() {
            return Err(ReelError::render("surface layout size must be finite"));
        }
        if layout.width <= 0.0 || layout.height <= 0.0 {
            return Err(ReelError::render("surface layout size must be non-empty"));
        }
        let dpr = sanitize_dpr(device_pixel_ratio);
        let backing = |v: f64| -> ReelResult<u32> {
            let px = (v * dpr).round().max(1.0);
            if px > f64::from(u16::MAX) {
                return Err(ReelError::render(format!(
                    "surface backing dimension {px} exceeds {}",
                    u16::MAX
                )));
            }
            Ok(px as u32)
        };
        Ok(Self {
            layout,
            device_pixel_ratio: dpr,
            backing_width: backing(layout.width)?,
            backing_height: backing(layout.height)?,
        })
    }

    /// Displayed (CSS) size in layout units.
    pub fn css_size(&self) -> Size {
        self.layout
    }

    /// Ratio between backing pixels and layout units.
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Backing store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (self.backing_width, self.backing_height)
    }
}

fn sanitize_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 }
}

/// Pixels read back from a surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// Row-major RGBA8.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied by alpha.
    pub premultiplied: bool,
}

pub(crate) struct CanvasSurface {
    pub(crate) geometry: SurfaceGeometry,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) pixmap: vello_cpu::Pixmap,
}

impl CanvasSurface {
    pub(crate) fn new(geometry: SurfaceGeometry) -> ReelResult<Self> {
        let (w, h) = geometry.backing_size();
        let width: u16 = w
            .try_into()
            .map_err(|_| ReelError::render("surface width exceeds u16"))?;
        let height: u16 = h
            .try_into()
            .map_err(|_| ReelError::render("surface height exceeds u16"))?;
        Ok(Self {
            geometry,
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        })
    }

    pub(crate) fn clear(&mut self, premul: [u8; 4]) {
        let data = self.pixmap.data_as_u8_slice_mut();
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    pub(crate) fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
