use crate::{
    assets::decode::FrameImage,
    foundation::core::FrameIndex,
    sequence::config::SequenceConfig,
};

/// Observable load state of a [`FrameSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum SlotState {
    /// Not settled yet.
    Pending,
    /// Decoded and drawable.
    Loaded,
    /// Fetch or decode failed; never retried.
    Failed,
}

/// Terminal result of one frame load, written into the store by the host thread.
#[derive(Clone, Debug)]
pub enum LoadOutcome {
    /// The frame decoded successfully.
    Loaded(FrameImage),
    /// The frame could not be fetched or decoded.
    Failed(String),
}

#[derive(Clone, Debug)]
enum SlotContent {
    Pending,
    Loaded(FrameImage),
    Failed(String),
}

/// One frame of the sequence. Settles exactly once.
#[derive(Clone, Debug)]
pub struct FrameSlot {
    index: FrameIndex,
    locator: String,
    content: SlotContent,
}

impl FrameSlot {
    /// Zero-based index of the slot.
    pub fn index(&self) -> FrameIndex {
        self.index
    }

    /// Resource locator the slot loads from.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Current load state.
    pub fn state(&self) -> SlotState {
        match self.content {
            SlotContent::Pending => SlotState::Pending,
            SlotContent::Loaded(_) => SlotState::Loaded,
            SlotContent::Failed(_) => SlotState::Failed,
        }
    }

    /// Decoded image, present iff the slot is Loaded.
    pub fn image(&self) -> Option<&FrameImage> {
        match &self.content {
            SlotContent::Loaded(img) => Some(img),
            _ => None,
        }
    }

    /// Natural `(width, height)`, present iff the slot is Loaded.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.image().map(|img| (img.width(), img.height()))
    }

    /// Failure reason, present iff the slot is Failed.
    pub fn failure(&self) -> Option<&str> {
        match &self.content {
            SlotContent::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Owns every [`FrameSlot`] of a sequence for the lifetime of the player.
///
/// Only the host thread touches the store. Loader settlements arrive through
/// [`LoaderHandle::drain_into`](crate::LoaderHandle::drain_into) and each one replaces a slot's
/// content in a single assignment, so a slot is never observed half-updated.
#[derive(Clone, Debug)]
pub struct FrameStore {
    slots: Vec<FrameSlot>,
    settled: usize,
}

impl FrameStore {
    /// Allocate `N` pending slots with their locators.
    pub fn new(config: &SequenceConfig) -> Self {
        let slots = (0..config.total_frames)
            .map(|i| {
                let index = FrameIndex(i);
                FrameSlot {
                    index,
                    locator: config.locator(index),
                    content: SlotContent::Pending,
                }
            })
            .collect();
        Self { slots, settled: 0 }
    }

    /// Number of slots (`N`).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the sequence has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at `index`, if in range.
    pub fn slot(&self, index: FrameIndex) -> Option<&FrameSlot> {
        self.slots.get(index.as_usize())
    }

    /// All slots in index order.
    pub fn slots(&self) -> &[FrameSlot] {
        &self.slots
    }

    /// Record the terminal state of a slot.
    ///
    /// Returns `false` (and changes nothing) when the index is out of range or the slot already
    /// settled.
    pub fn settle(&mut self, index: FrameIndex, outcome: LoadOutcome) -> bool {
        let Some(slot) = self.slots.get_mut(index.as_usize()) else {
            return false;
        };
        if !matches!(slot.content, SlotContent::Pending) {
            return false;
        }
        slot.content = match outcome {
            LoadOutcome::Loaded(img) => SlotContent::Loaded(img),
            LoadOutcome::Failed(reason) => SlotContent::Failed(reason),
        };
        self.settled += 1;
        true
    }

    /// Image for `index` if that exact slot is Loaded.
    pub fn get(&self, index: FrameIndex) -> Option<&FrameImage> {
        self.slot(index).and_then(FrameSlot::image)
    }

    /// Whether the exact slot is Loaded.
    pub fn is_ready(&self, index: FrameIndex) -> bool {
        self.get(index).is_some()
    }

    /// Nearest Loaded slot at or below `index`, scanning backward to 0.
    ///
    /// Never returns a later frame than requested. Indices past the end are clamped to the last
    /// slot.
    pub fn resolve_nearest_ready(&self, index: FrameIndex) -> Option<(FrameIndex, &FrameImage)> {
        let start = index.as_usize().min(self.slots.len().checked_sub(1)?);
        self.slots[..=start]
            .iter()
            .rev()
            .find_map(|slot| slot.image().map(|img| (slot.index, img)))
    }

    /// Slots that are no longer Pending.
    pub fn settled_count(&self) -> usize {
        self.settled
    }

    /// Slots that are Loaded.
    pub fn loaded_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state() == SlotState::Loaded)
            .count()
    }

    /// Slots that are Failed.
    pub fn failed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state() == SlotState::Failed)
            .count()
    }

    /// Settled share as a percentage in `0..=100`, rounded down so 100 means complete.
    pub fn load_progress(&self) -> u8 {
        let n = self.slots.len();
        if n == 0 {
            return 100;
        }
        ((self.settled * 100) / n) as u8
    }

    /// True once every slot settled.
    pub fn is_complete(&self) -> bool {
        self.settled == self.slots.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/frame_store.rs"]
mod tests;
