use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Decoded frame ready to be painted: premultiplied RGBA8 wrapped in a shared `vello_cpu` pixmap.
///
/// Cloning is cheap; the pixel data is shared.
#[derive(Clone)]
pub struct FrameImage {
    width: u32,
    height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for FrameImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixmap_ptr", &Arc::as_ptr(&self.pixmap))
            .finish()
    }
}

impl FrameImage {
    /// Build a frame from premultiplied RGBA8 bytes in row-major order.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: &[u8]) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::load("frame image must have non-zero dimensions"));
        }
        let pixmap = premul_bytes_to_pixmap(rgba8_premul, width, height)?;
        Ok(Self {
            width,
            height,
            pixmap: Arc::new(pixmap),
        })
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width / height`.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }

    /// Whether two handles share the same decoded pixels.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixmap, &other.pixmap)
    }
}

/// Decode encoded image bytes (PNG, WebP, JPEG, ...) into a [`FrameImage`].
pub fn decode_frame(bytes: &[u8]) -> ReelResult<FrameImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    FrameImage::from_premul_rgba8(width, height, &rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::load("frame width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::load("frame height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ReelError::load("frame byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
