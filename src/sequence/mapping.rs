use crate::foundation::core::{FrameIndex, clamp_progress};

/// Map scroll progress to a frame index: `min(floor(p * n), n - 1)`.
///
/// `p` is clamped to `[0, 1]` first, so the result always lies in `0..n`. Returns `None` only when
/// `total_frames` is zero.
pub fn frame_index_for_progress(progress: f64, total_frames: u32) -> Option<FrameIndex> {
    if total_frames == 0 {
        return None;
    }
    let p = clamp_progress(progress);
    let raw = (p * f64::from(total_frames)).floor() as u32;
    Some(FrameIndex(raw.min(total_frames - 1)))
}

/// Progress value at the center of the band that maps to `index`.
pub fn progress_for_frame(index: FrameIndex, total_frames: u32) -> f64 {
    if total_frames == 0 {
        return 0.0;
    }
    ((f64::from(index.0) + 0.5) / f64::from(total_frames)).min(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/mapping.rs"]
mod tests;
