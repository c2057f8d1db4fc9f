use crate::foundation::core::FrameIndex;

/// Load schedule for a sequence: `[0]` alone, then the remaining indices in ascending batches of
/// `batch_size` (the last batch may be partial).
///
/// A `batch_size` of zero is treated as one.
pub fn load_plan(total_frames: u32, batch_size: u32) -> Vec<Vec<FrameIndex>> {
    if total_frames == 0 {
        return Vec::new();
    }
    let batch_size = batch_size.max(1);

    let mut plan = vec![vec![FrameIndex::FIRST]];
    let mut start = 1u32;
    while start < total_frames {
        let end = start.saturating_add(batch_size).min(total_frames);
        plan.push((start..end).map(FrameIndex).collect());
        start = end;
    }
    plan
}

#[cfg(test)]
#[path = "../../tests/unit/loader/plan.rs"]
mod tests;
