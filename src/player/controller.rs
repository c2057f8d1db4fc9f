use crate::{
    foundation::core::FrameIndex,
    render::renderer::CanvasRenderer,
    sequence::mapping::frame_index_for_progress,
    store::frame_store::FrameStore,
};

/// Lifecycle of a [`ScrollFrameController`]. The transition is one-way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ControllerState {
    /// Slot 0 has not settled; progress updates are ignored.
    Uninitialized,
    /// Every progress update is processed.
    Active,
}

/// Result of feeding one progress value to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameUpdate {
    /// The controller is not active yet.
    Ignored,
    /// The requested frame is already on screen.
    Unchanged,
    /// Nothing at or before the requested index is loaded, or the surface is unavailable.
    Skipped { requested: FrameIndex },
    /// A frame was drawn. `shown` is lower than `requested` when a fallback was used.
    Drawn {
        requested: FrameIndex,
        shown: FrameIndex,
    },
}

/// Maps progress to a frame index and asks the renderer to draw only when that index changes.
#[derive(Clone, Debug)]
pub struct ScrollFrameController {
    total_frames: u32,
    state: ControllerState,
    last_requested: Option<FrameIndex>,
    last_shown: Option<FrameIndex>,
}

impl ScrollFrameController {
    pub fn new(total_frames: u32) -> Self {
        Self {
            total_frames,
            state: ControllerState::Uninitialized,
            last_requested: None,
            last_shown: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Enter [`ControllerState::Active`]. Returns whether this call made the transition.
    pub fn activate(&mut self) -> bool {
        let changed = self.state == ControllerState::Uninitialized;
        self.state = ControllerState::Active;
        changed
    }

    /// Index requested by the last update that drew.
    pub fn last_rendered(&self) -> Option<FrameIndex> {
        self.last_requested
    }

    /// Index of the image actually on screen.
    pub fn last_shown(&self) -> Option<FrameIndex> {
        self.last_shown
    }

    /// Forget what is on screen so the next update draws even for the same index.
    pub fn invalidate(&mut self) {
        self.last_requested = None;
        self.last_shown = None;
    }

    pub fn on_progress(
        &mut self,
        progress: f64,
        store: &FrameStore,
        renderer: &mut CanvasRenderer,
    ) -> FrameUpdate {
        if self.state == ControllerState::Uninitialized {
            return FrameUpdate::Ignored;
        }
        let Some(requested) = frame_index_for_progress(progress, self.total_frames) else {
            return FrameUpdate::Ignored;
        };

        // Same index as last time: only a fallback that can now be improved warrants a draw.
        if self.last_requested == Some(requested) && self.last_shown == Some(requested) {
            return FrameUpdate::Unchanged;
        }

        let Some((shown, image)) = store.resolve_nearest_ready(requested) else {
            return FrameUpdate::Skipped { requested };
        };
        if self.last_requested == Some(requested) && self.last_shown == Some(shown) {
            return FrameUpdate::Unchanged;
        }
        if !renderer.draw_frame(shown, image) {
            return FrameUpdate::Skipped { requested };
        }

        if shown != requested {
            tracing::trace!(%requested, %shown, "drew fallback frame");
        }
        self.last_requested = Some(requested);
        self.last_shown = Some(shown);
        FrameUpdate::Drawn { requested, shown }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/controller.rs"]
mod tests;
