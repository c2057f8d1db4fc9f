//! scrollreel plays a pre-rendered image sequence on a drawing surface, driven by scroll progress.
//!
//! A sequence is `N` numbered frames (`frame_0001.webp` ...). A single progress value in `[0, 1]`
//! selects the frame to show; the frames themselves stream in behind the scenes.
//!
//! # Data flow
//!
//! 1. **Load**: [`FrameLoader`] fetches slot 0 alone, then the rest in ordered batches, on worker
//!    threads. Results reach the host thread through a [`LoaderHandle`].
//! 2. **Store**: [`FrameStore`] keeps one [`FrameSlot`] per frame and answers "what is the nearest
//!    loaded frame at or before `i`".
//! 3. **Control**: [`ScrollFrameController`] maps progress to an index and only asks for a draw
//!    when the index changes.
//! 4. **Render**: [`CanvasRenderer`] paints a frame with cover-fit placement onto a
//!    device-pixel-ratio aware surface.
//!
//! [`ScrollPlayer`] wires the four together and is what most hosts use. The overlay
//! ([`HudTimeline`]) is driven by the same progress value and never talks to the canvas.
//!
//! Failed frames are recorded, not propagated: rendering falls back to the nearest earlier frame.
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod hud;
mod loader;
mod player;
mod progress;
mod render;
mod sequence;
mod store;

pub use crate::foundation::core::{FrameIndex, Rect, Size, clamp_progress};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::decode::{FrameImage, decode_frame};
pub use crate::assets::source::{FrameSource, FsFrameSource, normalize_rel_path};
pub use crate::hud::ramp::ProgressRamp;
pub use crate::hud::timeline::{
    DIAGNOSTIC_FADE, DIAGNOSTIC_SLIDE_PX, DiagnosticFrame, DiagnosticItem, HudFrame, HudSide,
    HudTimeline,
};
pub use crate::loader::frame_loader::{
    DrainReport, FrameLoader, LoaderHandle, LoaderOpts, Settlement,
};
pub use crate::loader::plan::load_plan;
pub use crate::loader::scheduler::{FixedDelay, IdleScheduler, IdleSignal};
pub use crate::player::controller::{ControllerState, FrameUpdate, ScrollFrameController};
pub use crate::player::scroll_player::{PlayerOpts, PlayerStatus, ScrollPlayer};
pub use crate::progress::scroll_span::ScrollSpan;
pub use crate::progress::signal::{ProgressSignal, Subscription};
pub use crate::progress::smooth::{DEFAULT_SMOOTH_DURATION, SmoothScroll, smooth_ease};
pub use crate::render::cover::{CoverPlacement, CropAxis, cover_fit};
pub use crate::render::renderer::{CanvasRenderer, RenderSettings, RenderState};
pub use crate::render::surface::{FrameRGBA, SurfaceGeometry};
pub use crate::sequence::config::{IDLE_DELAY_ENV, SequenceConfig};
pub use crate::sequence::mapping::{frame_index_for_progress, progress_for_frame};
pub use crate::store::frame_store::{FrameSlot, FrameStore, LoadOutcome, SlotState};
