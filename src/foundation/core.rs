pub use kurbo::{Affine, Rect, Size};

/// Zero-based position of a frame within a sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// The first frame; always requested first and gates first paint.
    pub const FIRST: Self = Self(0);

    /// Index as a `usize`, for slot addressing.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// One-based frame number used by the asset naming scheme.
    pub fn number(self) -> u32 {
        self.0 + 1
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Clamp a progress value to `[0, 1]`. `NaN` maps to `0`.
pub fn clamp_progress(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Premultiply a straight-alpha RGBA8 color.
pub fn premul_rgba8([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    fn premul(c: u8, a: u8) -> u8 {
        let c = u16::from(c);
        let a = u16::from(a);
        (((c * a) + 127) / 255) as u8
    }

    [premul(r, a), premul(g, a), premul(b, a), a]
}
