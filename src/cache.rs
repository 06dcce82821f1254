//! Single-slot snapshot cache.
//!
//! Holds at most one value per generation. Reads go through to the loader on a
//! miss; concurrent readers of the same generation share one in-flight load.
//! `invalidate` swaps in a fresh cell without waiting for that load, so a hung
//! fetch never blocks a reload. A load that finishes after its generation was
//! invalidated lands in the detached cell and is never served.

use crate::error::Result;

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// A cached value and the generation it was loaded under.
#[derive(Debug)]
pub struct Cached<T> {
    pub generation: u64,
    pub value: Arc<T>,
}

struct Slot<T> {
    generation: u64,
    cell: Arc<OnceCell<Arc<T>>>,
}

pub struct SnapshotCache<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                generation: 0,
                cell: Arc::new(OnceCell::new()),
            }),
        }
    }

    /// Return the current generation's value, or run `load` and store its result.
    ///
    /// A failed load leaves the cell empty and is returned to the caller.
    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Cached<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // The slot lock is never held across an await.
        let (generation, cell) = {
            let slot = self.slot.lock();
            (slot.generation, Arc::clone(&slot.cell))
        };

        if cell.initialized() {
            debug!(generation, "snapshot cache hit");
        } else {
            debug!(generation, "snapshot cache miss");
        }
        let value = cell
            .get_or_try_init(|| async { load().await.map(Arc::new) })
            .await?;

        Ok(Cached {
            generation,
            value: Arc::clone(value),
        })
    }

    /// Drop the cached value and start a new generation. Returns it.
    pub fn invalidate(&self) -> u64 {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        slot.cell = Arc::new(OnceCell::new());
        slot.generation
    }
}
