use crate::{
    assets::decode::FrameImage,
    foundation::core::{Affine, FrameIndex, Size, premul_rgba8},
    render::{
        cover::cover_fit,
        surface::{CanvasSurface, FrameRGBA, SurfaceGeometry},
    },
};

/// Renderer settings fixed at construction.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Straight-alpha RGBA8 the surface is cleared to before every draw.
    pub clear_rgba: [u8; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: [0, 0, 0, 255],
        }
    }
}

/// What the renderer last put on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderState {
    /// Slot of the image currently on the surface.
    pub last_drawn: Option<FrameIndex>,
    /// Backing store size in device pixels, once configured.
    pub backing_size: Option<(u32, u32)>,
}

/// Owns the drawing surface and paints frames onto it with cover-fit placement.
///
/// Until [`configure_surface`](Self::configure_surface) succeeds every draw is a no-op. When the
/// surface cannot be allocated the renderer stays surface-less and keeps ignoring draws rather
/// than failing its caller.
pub struct CanvasRenderer {
    settings: RenderSettings,
    surface: Option<CanvasSurface>,
    state: RenderState,
    last_frame: Option<(FrameIndex, FrameImage)>,
}

impl CanvasRenderer {
    /// New renderer without a surface.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            surface: None,
            state: RenderState::default(),
            last_frame: None,
        }
    }

    /// Size the backing store for `layout` at `device_pixel_ratio`.
    ///
    /// Returns whether a surface is available afterwards. The previous pixels are discarded;
    /// callers redraw (see [`resize`](Self::resize)).
    #[tracing::instrument(skip(self), fields(w = layout.width, h = layout.height))]
    pub fn configure_surface(&mut self, layout: Size, device_pixel_ratio: f64) -> bool {
        let surface = SurfaceGeometry::new(layout, device_pixel_ratio).and_then(CanvasSurface::new);
        match surface {
            Ok(mut surface) => {
                surface.clear(premul_rgba8(self.settings.clear_rgba));
                self.state.backing_size = Some(surface.geometry.backing_size());
                self.state.last_drawn = None;
                tracing::debug!(backing = ?self.state.backing_size, "surface configured");
                self.surface = Some(surface);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "drawing surface unavailable; frames will not be drawn");
                self.surface = None;
                self.state = RenderState::default();
                false
            }
        }
    }

    /// Reconfigure for a new size and redraw the last drawn frame, if any.
    pub fn resize(&mut self, layout: Size, device_pixel_ratio: f64) -> bool {
        if !self.configure_surface(layout, device_pixel_ratio) {
            return false;
        }
        if let Some((index, image)) = self.last_frame.clone() {
            self.draw_frame(index, &image);
        }
        true
    }

    /// Clear the surface and paint `image` covering it. Returns whether anything was drawn.
    pub fn draw_frame(&mut self, index: FrameIndex, image: &FrameImage) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let geometry = surface.geometry;
        let (iw, ih) = (f64::from(image.width()), f64::from(image.height()));
        let Some(placement) = cover_fit(Size::new(iw, ih), geometry.css_size()) else {
            return false;
        };

        surface.clear(premul_rgba8(self.settings.clear_rgba));

        let transform = Affine::scale(geometry.device_pixel_ratio())
            * Affine::translate((placement.offset_x, placement.offset_y))
            * Affine::scale_non_uniform(placement.draw_width / iw, placement.draw_height / ih);

        let mut ctx = vello_cpu::RenderContext::new(surface.width, surface.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(image.paint());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        ctx.flush();
        ctx.render_to_pixmap(&mut surface.pixmap);

        self.state.last_drawn = Some(index);
        self.last_frame = Some((index, image.clone()));
        true
    }

    /// Whether a surface is configured.
    pub fn is_configured(&self) -> bool {
        self.surface.is_some()
    }

    /// Current render state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Surface geometry, once configured.
    pub fn geometry(&self) -> Option<SurfaceGeometry> {
        self.surface.as_ref().map(|s| s.geometry)
    }

    /// Copy of the backing store pixels.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        self.surface.as_ref().map(CanvasSurface::snapshot)
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
