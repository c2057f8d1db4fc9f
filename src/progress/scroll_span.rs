use crate::foundation::core::clamp_progress;

/// Vertical extent of the scroll container that drives playback.
///
/// Progress is 0 when the container top reaches the viewport top and 1 when its bottom reaches the
/// viewport bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSpan {
    top: f64,
    length: f64,
    viewport: f64,
}

impl ScrollSpan {
    /// Span starting at document offset `top`, `length` tall, seen through a `viewport`-tall window.
    pub fn new(top: f64, length: f64, viewport: f64) -> Self {
        Self {
            top,
            length: length.max(0.0),
            viewport: viewport.max(0.0),
        }
    }

    /// Span whose length is `length_vh` viewport heights.
    pub fn from_viewport_heights(top: f64, length_vh: f64, viewport: f64) -> Self {
        Self::new(top, viewport * length_vh / 100.0, viewport)
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Scroll distance over which progress goes from 0 to 1.
    pub fn travel(&self) -> f64 {
        self.length - self.viewport
    }

    /// Progress for the document scroll offset `scroll_y`.
    pub fn progress(&self, scroll_y: f64) -> f64 {
        let travel = self.travel();
        if travel <= 0.0 || !travel.is_finite() {
            return if scroll_y < self.top { 0.0 } else { 1.0 };
        }
        clamp_progress((scroll_y - self.top) / travel)
    }

    /// Scroll offset at which `progress` is reached.
    pub fn scroll_for_progress(&self, progress: f64) -> f64 {
        self.top + clamp_progress(progress) * self.travel().max(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/progress/scroll_span.rs"]
mod tests;
