use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a container towards its resize source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(u64);

impl ContainerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container-{}", self.0)
    }
}

/// Source of container box changes.
///
/// A container calls `observe` when one of its dimensions depends on the box
/// and `unobserve` when that stops or the container is torn down. The host
/// delivers changes to [`ChartContainer::on_box_change`](super::ChartContainer::on_box_change).
pub trait ResizeObservation {
    fn observe(&self, id: ContainerId);
    fn unobserve(&self, id: ContainerId);
}

/// Resize source for headless hosts and tests: it only tracks who is observed.
#[derive(Debug, Default)]
pub struct ManualResizeObserver {
    observed: RefCell<IndexSet<ContainerId>>,
    total_subscriptions: Cell<usize>,
}

impl ManualResizeObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_observing(&self, id: ContainerId) -> bool {
        self.observed.borrow().contains(&id)
    }

    #[must_use]
    pub fn observed_ids(&self) -> Vec<ContainerId> {
        self.observed.borrow().iter().copied().collect()
    }

    /// Number of `observe` calls ever received.
    #[must_use]
    pub fn total_subscriptions(&self) -> usize {
        self.total_subscriptions.get()
    }
}

impl ResizeObservation for ManualResizeObserver {
    fn observe(&self, id: ContainerId) {
        self.total_subscriptions
            .set(self.total_subscriptions.get() + 1);
        self.observed.borrow_mut().insert(id);
    }

    fn unobserve(&self, id: ContainerId) {
        self.observed.borrow_mut().shift_remove(&id);
    }
}
