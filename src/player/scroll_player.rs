use std::{
    cell::{Ref, RefCell},
    rc::{Rc, Weak},
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    assets::source::FrameSource,
    foundation::{
        core::{FrameIndex, Size, clamp_progress},
        error::ReelResult,
    },
    loader::{
        frame_loader::{DrainReport, FrameLoader, LoaderHandle, LoaderOpts},
        scheduler::IdleScheduler,
    },
    player::controller::{ControllerState, FrameUpdate, ScrollFrameController},
    progress::signal::{ProgressSignal, Subscription},
    render::{
        renderer::{CanvasRenderer, RenderSettings, RenderState},
        surface::FrameRGBA,
    },
    sequence::config::SequenceConfig,
    store::frame_store::FrameStore,
};

/// Host-side options for a [`ScrollPlayer`].
#[derive(Clone, Debug)]
pub struct PlayerOpts {
    /// Layout size of the drawing surface, in CSS pixels.
    pub layout: Size,
    pub device_pixel_ratio: f64,
    pub render: RenderSettings,
    pub loader: LoaderOpts,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            layout: Size::new(1280.0, 720.0),
            device_pixel_ratio: 1.0,
            render: RenderSettings::default(),
            loader: LoaderOpts::default(),
        }
    }
}

/// What the host should show in place of, or on top of, the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlayerStatus {
    /// Slot 0 has not settled; show a loading indicator with `percent` over the `poster` frame.
    Loading { percent: u8, poster: FrameIndex },
    /// Frames are being drawn; background loading may still be running.
    Active { percent: u8 },
}

struct PlayerCore {
    config: SequenceConfig,
    store: FrameStore,
    renderer: CanvasRenderer,
    controller: ScrollFrameController,
    loader: Option<LoaderHandle>,
    layout: Size,
    device_pixel_ratio: f64,
    progress: f64,
}

impl PlayerCore {
    fn absorb(&mut self, report: DrainReport) {
        if report.initial_frame_ready {
            self.activate();
        } else if report.applied > 0 {
            // A newly settled slot may improve a fallback frame.
            let progress = self.progress;
            self.update(progress);
        }
        // Every slot is settled; the worker is done or about to exit.
        if report.complete && self.loader.take().is_some() {
            tracing::debug!("loader released");
        }
    }

    fn activate(&mut self) {
        if !self.controller.activate() {
            return;
        }
        self.renderer
            .configure_surface(self.layout, self.device_pixel_ratio);
        let progress = self.progress;
        let update = self.update(progress);
        tracing::info!(?update, progress, "player active");
    }

    fn update(&mut self, progress: f64) -> FrameUpdate {
        self.progress = clamp_progress(progress);
        self.controller
            .on_progress(self.progress, &self.store, &mut self.renderer)
    }

    fn status(&self) -> PlayerStatus {
        let percent = self.store.load_progress();
        match self.controller.state() {
            ControllerState::Uninitialized => PlayerStatus::Loading {
                percent,
                poster: self.config.poster_index(),
            },
            ControllerState::Active => PlayerStatus::Active { percent },
        }
    }
}

/// Scroll-driven image sequence player.
///
/// Owns the frame store, the renderer, the controller and the background loader. Everything
/// except the loader worker lives on the thread that created the player; call
/// [`pump`](Self::pump) from that thread's event loop to apply finished loads.
///
/// Dropping the player cancels outstanding loads and releases every decoded frame.
pub struct ScrollPlayer {
    core: Rc<RefCell<PlayerCore>>,
    binding: Option<Subscription>,
}

impl std::fmt::Debug for ScrollPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollPlayer")
            .field("status", &self.status())
            .field("progress", &self.progress())
            .field("bound", &self.binding.is_some())
            .finish()
    }
}

impl ScrollPlayer {
    /// Validate `config`, create the store and start loading.
    pub fn start(
        config: SequenceConfig,
        source: Arc<dyn FrameSource>,
        scheduler: Arc<dyn IdleScheduler>,
        opts: PlayerOpts,
    ) -> ReelResult<Self> {
        let loader = FrameLoader::spawn(&config, source, scheduler, &opts.loader)?;
        let store = FrameStore::new(&config);
        let controller = ScrollFrameController::new(config.total_frames);
        tracing::debug!(
            total_frames = config.total_frames,
            base_path = %config.base_path,
            "player started"
        );
        Ok(Self {
            core: Rc::new(RefCell::new(PlayerCore {
                config,
                store,
                renderer: CanvasRenderer::new(opts.render),
                controller,
                loader: Some(loader),
                layout: opts.layout,
                device_pixel_ratio: opts.device_pixel_ratio,
                progress: 0.0,
            })),
            binding: None,
        })
    }

    /// Apply every settled load without blocking.
    pub fn pump(&mut self) -> DrainReport {
        let mut core = self.core.borrow_mut();
        let PlayerCore { loader, store, .. } = &mut *core;
        let Some(loader) = loader.as_mut() else {
            return finished_report(store);
        };
        let report = loader.drain_into(store);
        core.absorb(report);
        report
    }

    /// Like [`pump`](Self::pump), but waits up to `timeout` for the next settlement.
    pub fn pump_blocking(&mut self, timeout: Duration) -> DrainReport {
        let mut core = self.core.borrow_mut();
        let PlayerCore { loader, store, .. } = &mut *core;
        let Some(loader) = loader.as_mut() else {
            return finished_report(store);
        };
        let report = loader.drain_blocking(store, timeout);
        core.absorb(report);
        report
    }

    /// Pump until every slot has settled or `timeout` elapses. Returns whether loading finished.
    pub fn pump_until_complete(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.core.borrow().store.is_complete() {
                self.pump();
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let worker_gone = self
                .core
                .borrow()
                .loader
                .as_ref()
                .is_none_or(LoaderHandle::is_finished);
            self.pump_blocking((deadline - now).min(Duration::from_millis(50)));
            if worker_gone {
                // Nothing more will arrive once the final drain is done.
                return self.core.borrow().store.is_complete();
            }
        }
    }

    /// Feed a progress value, as a scroll listener would.
    pub fn on_progress(&mut self, progress: f64) -> FrameUpdate {
        self.core.borrow_mut().update(progress)
    }

    /// Drive the player from `signal` until [`unbind`](Self::unbind) or drop.
    ///
    /// The signal's current value is applied immediately.
    pub fn bind(&mut self, signal: &ProgressSignal) {
        let weak: Weak<RefCell<PlayerCore>> = Rc::downgrade(&self.core);
        self.binding = Some(signal.subscribe(move |p| {
            let Some(core) = weak.upgrade() else {
                return;
            };
            let Ok(mut core) = core.try_borrow_mut() else {
                tracing::debug!(progress = p, "player busy; dropping progress update");
                return;
            };
            core.update(p);
        }));
        self.on_progress(signal.get());
    }

    pub fn unbind(&mut self) {
        self.binding = None;
    }

    /// New layout size or device pixel ratio. Redraws the current frame; never reloads.
    pub fn resize(&mut self, layout: Size, device_pixel_ratio: f64) -> bool {
        let mut core = self.core.borrow_mut();
        core.layout = layout;
        core.device_pixel_ratio = device_pixel_ratio;
        if core.controller.state() == ControllerState::Uninitialized {
            return false;
        }
        if !core.renderer.resize(layout, device_pixel_ratio) {
            return false;
        }
        // Activation may have happened without a surface; draw the current frame now.
        if core.renderer.state().last_drawn.is_none() {
            core.controller.invalidate();
            let progress = core.progress;
            core.update(progress);
        }
        true
    }

    /// Stop loading and wait for the worker thread to exit. Loaded frames stay drawable.
    pub fn stop(&mut self) -> ReelResult<()> {
        let loader = self.core.borrow_mut().loader.take();
        match loader {
            Some(loader) => {
                loader.cancel();
                loader.join()
            }
            None => Ok(()),
        }
    }

    pub fn status(&self) -> PlayerStatus {
        self.core.borrow().status()
    }

    /// Latest clamped progress value seen.
    pub fn progress(&self) -> f64 {
        self.core.borrow().progress
    }

    pub fn config(&self) -> Ref<'_, SequenceConfig> {
        Ref::map(self.core.borrow(), |c| &c.config)
    }

    pub fn store(&self) -> Ref<'_, FrameStore> {
        Ref::map(self.core.borrow(), |c| &c.store)
    }

    pub fn render_state(&self) -> RenderState {
        self.core.borrow().renderer.state()
    }

    /// Copy of the surface pixels, once the surface exists.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        self.core.borrow().renderer.snapshot()
    }
}

fn finished_report(store: &FrameStore) -> DrainReport {
    DrainReport {
        applied: 0,
        initial_frame_ready: false,
        complete: store.is_complete(),
        progress: store.load_progress(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/scroll_player.rs"]
mod tests;
