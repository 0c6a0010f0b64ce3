use std::{
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, OnceLock,
    },
};

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::{
    bounding_box::BoundingBox,
    detect::{self, BbxOptions},
    errors::ImageError,
    input::InputDescriptor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub queue: usize,
    pub process: usize,
}

/// Runs bbx detections on the blocking pool, at most `concurrency` at a time.
#[derive(Clone, Debug)]
pub struct BbxQueue {
    permits: Arc<Semaphore>,
    concurrency: usize,
    queue: Arc<AtomicUsize>,
    process: Arc<AtomicUsize>,
}

impl BbxQueue {
    /// A `concurrency` of 0 uses one worker per available CPU.
    pub fn new(concurrency: usize) -> Self {
        let concurrency = match concurrency {
            0 => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            n => n,
        };
        Self {
            permits: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            queue: Arc::new(AtomicUsize::new(0)),
            process: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn counters(&self) -> Counters {
        Counters {
            queue: self.queue.load(Ordering::SeqCst),
            process: self.process.load(Ordering::SeqCst),
        }
    }

    pub async fn bbx(
        &self,
        input: InputDescriptor,
        options: BbxOptions,
    ) -> Result<BoundingBox, ImageError> {
        options.validate()?;

        let queued = CounterGuard::enter(&self.queue);
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|err| ImageError::WorkerError(err.to_string()))?;
        drop(queued);
        let processing = CounterGuard::enter(&self.process);

        tokio::task::spawn_blocking(move || -> Result<BoundingBox, ImageError> {
            let _permit = permit;
            let _processing = processing;
            let raster = input.open()?;
            let bbx = detect::bounding_box(&raster, options.tolerance);
            debug!(
                width = raster.width(),
                height = raster.height(),
                tolerance = options.tolerance,
                ?bbx,
                "computed bbx"
            );
            Ok(bbx)
        })
        .await
        .map_err(|err| ImageError::WorkerError(err.to_string()))?
    }
}

impl Default for BbxQueue {
    fn default() -> Self {
        Self::new(0)
    }
}

pub fn default_queue() -> &'static BbxQueue {
    static DEFAULT_QUEUE: OnceLock<BbxQueue> = OnceLock::new();
    DEFAULT_QUEUE.get_or_init(BbxQueue::default)
}

struct CounterGuard(Arc<AtomicUsize>);

impl CounterGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for CounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
