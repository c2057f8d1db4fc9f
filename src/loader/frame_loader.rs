use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
    },
    thread::JoinHandle,
    time::Duration,
};

use anyhow::Context;
use rayon::prelude::*;

use crate::{
    assets::{decode::decode_frame, source::FrameSource},
    foundation::{
        core::FrameIndex,
        error::{ReelError, ReelResult},
    },
    loader::{plan::load_plan, scheduler::IdleScheduler},
    sequence::config::SequenceConfig,
    store::frame_store::{FrameStore, LoadOutcome},
};

/// One settled load, produced on a worker thread and applied on the host thread.
#[derive(Clone, Debug)]
pub struct Settlement {
    /// Slot the load was issued for.
    pub index: FrameIndex,
    /// Terminal result of the load.
    pub outcome: LoadOutcome,
}

/// Loader threading configuration.
#[derive(Clone, Debug, Default)]
pub struct LoaderOpts {
    /// Worker threads used for a batch; defaults to the batch size, capped at the available
    /// parallelism.
    pub threads: Option<usize>,
}

/// What a call to [`LoaderHandle::drain_into`] changed in the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Settlements written into the store.
    pub applied: usize,
    /// True only for the drain that applied slot 0's settlement.
    pub initial_frame_ready: bool,
    /// True when every slot has settled.
    pub complete: bool,
    /// Store load progress after the drain, `0..=100`.
    pub progress: u8,
}

/// Progressive frame loader.
///
/// Slot 0 is loaded alone and first. The remaining slots follow in batches; the members of a
/// batch load concurrently and the whole batch settles before the scheduler is asked for the
/// next idle point.
#[derive(Debug)]
pub struct FrameLoader;

impl FrameLoader {
    /// Start loading `config` in the background and return the host-side handle.
    #[tracing::instrument(skip(config, source, scheduler), fields(total_frames = config.total_frames, batch_size = config.batch_size))]
    pub fn spawn(
        config: &SequenceConfig,
        source: Arc<dyn FrameSource>,
        scheduler: Arc<dyn IdleScheduler>,
        opts: &LoaderOpts,
    ) -> ReelResult<LoaderHandle> {
        config.validate()?;

        let threads = opts
            .threads
            .unwrap_or_else(|| default_threads(config.batch_size));
        let pool = build_thread_pool(threads)?;
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let job = LoadJob {
            config: config.clone(),
            source,
            scheduler,
            cancel: Arc::clone(&cancel),
        };
        let worker = std::thread::Builder::new()
            .name("scrollreel-loader".to_string())
            .spawn(move || job.run(&pool, &tx))
            .context("spawn loader thread")?;

        Ok(LoaderHandle {
            rx,
            cancel,
            worker: Some(worker),
            initial_frame_ready: false,
        })
    }
}

struct LoadJob {
    config: SequenceConfig,
    source: Arc<dyn FrameSource>,
    scheduler: Arc<dyn IdleScheduler>,
    cancel: Arc<AtomicBool>,
}

impl LoadJob {
    fn run(&self, pool: &rayon::ThreadPool, tx: &Sender<Settlement>) {
        let plan = load_plan(self.config.total_frames, self.config.batch_size);
        for (batch_no, batch) in plan.iter().enumerate() {
            if batch_no > 0 {
                self.scheduler.yield_to_idle();
            }
            if self.is_cancelled() {
                tracing::debug!(batch_no, "loader cancelled");
                return;
            }

            let delivered = AtomicBool::new(true);
            if batch.len() == 1 {
                if !self.load_and_send(batch[0], tx) {
                    delivered.store(false, Ordering::Relaxed);
                }
            } else {
                pool.install(|| {
                    batch.par_iter().for_each_with(tx.clone(), |tx, &index| {
                        if !self.load_and_send(index, tx) {
                            delivered.store(false, Ordering::Relaxed);
                        }
                    });
                });
            }

            if !delivered.load(Ordering::Relaxed) {
                tracing::debug!(batch_no, "loader receiver dropped");
                return;
            }
        }
        tracing::debug!("loader finished all batches");
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Returns `false` when the settlement could not be delivered.
    fn load_and_send(&self, index: FrameIndex, tx: &Sender<Settlement>) -> bool {
        if self.is_cancelled() {
            // Abandoned; the batch loop stops at its next cancellation check.
            return true;
        }
        let locator = self.config.locator(index);
        let outcome = match load_one(self.source.as_ref(), &locator) {
            Ok(img) => {
                tracing::debug!(%index, %locator, width = img.width(), height = img.height(), "frame loaded");
                LoadOutcome::Loaded(img)
            }
            Err(e) => {
                tracing::warn!(%index, %locator, error = %e, "frame failed to load");
                LoadOutcome::Failed(e.to_string())
            }
        };
        tx.send(Settlement { index, outcome }).is_ok()
    }
}

fn load_one(
    source: &dyn FrameSource,
    locator: &str,
) -> ReelResult<crate::assets::decode::FrameImage> {
    let bytes = source.fetch(locator)?;
    decode_frame(&bytes)
}

/// One thread per batch member, capped at the machine's parallelism.
fn default_threads(batch_size: u32) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    (batch_size as usize).clamp(1, cores)
}

fn build_thread_pool(threads: usize) -> ReelResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(ReelError::validation("loader threads must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("scrollreel-load-{i}"))
        .build()
        .map_err(|e| ReelError::load(format!("failed to build loader thread pool: {e}")))
}

/// Host-side end of a running [`FrameLoader`].
///
/// Dropping the handle abandons outstanding loads: the worker sees the cancellation flag before
/// its next load, and anything it still settles goes nowhere.
#[derive(Debug)]
pub struct LoaderHandle {
    rx: Receiver<Settlement>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    initial_frame_ready: bool,
}

impl LoaderHandle {
    /// Whether slot 0 has settled into the store (success or failure).
    pub fn initial_frame_ready(&self) -> bool {
        self.initial_frame_ready
    }

    /// Apply every settlement received so far. Never blocks.
    pub fn drain_into(&mut self, store: &mut FrameStore) -> DrainReport {
        let mut report = DrainReport::default();
        loop {
            match self.rx.try_recv() {
                Ok(settlement) => self.apply(settlement, store, &mut report),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        self.finish_report(store, report)
    }

    /// Wait up to `timeout` for at least one settlement, then drain the rest.
    pub fn drain_blocking(&mut self, store: &mut FrameStore, timeout: Duration) -> DrainReport {
        let mut report = DrainReport::default();
        if !store.is_complete() {
            match self.rx.recv_timeout(timeout) {
                Ok(settlement) => self.apply(settlement, store, &mut report),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {}
            }
        }
        let rest = self.drain_into(store);
        report.applied += rest.applied;
        report.initial_frame_ready |= rest.initial_frame_ready;
        self.finish_report(store, report)
    }

    /// Ask the worker to stop issuing loads.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the worker thread to exit.
    pub fn join(mut self) -> ReelResult<()> {
        self.join_worker()
    }

    fn join_worker(&mut self) -> ReelResult<()> {
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| ReelError::load("loader thread panicked"))?;
        }
        Ok(())
    }

    fn apply(&mut self, settlement: Settlement, store: &mut FrameStore, report: &mut DrainReport) {
        let Settlement { index, outcome } = settlement;
        if !store.settle(index, outcome) {
            tracing::debug!(%index, "ignoring duplicate or out-of-range settlement");
            return;
        }
        report.applied += 1;
        if index == FrameIndex::FIRST && !self.initial_frame_ready {
            self.initial_frame_ready = true;
            report.initial_frame_ready = true;
            tracing::info!(
                loaded = store.is_ready(FrameIndex::FIRST),
                "initial frame settled"
            );
        }
    }

    fn finish_report(&self, store: &FrameStore, mut report: DrainReport) -> DrainReport {
        report.complete = store.is_complete();
        report.progress = store.load_progress();
        if report.applied > 0 && report.complete {
            tracing::info!(
                loaded = store.loaded_count(),
                failed = store.failed_count(),
                "sequence fully settled"
            );
        }
        report
    }
}

impl Drop for LoaderHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/frame_loader.rs"]
mod tests;
