use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::extensions::{ChartMetadata, ChartPlugin};

/// Registry handle shared between containers on the UI thread.
pub type SharedRegistry = Rc<RefCell<ChartPluginRegistry>>;

thread_local! {
    static SHARED_REGISTRY: SharedRegistry = Rc::new(RefCell::new(ChartPluginRegistry::new()));
}

/// Per-thread registry for application wiring.
///
/// Containers never look this up themselves; pass it (or an isolated
/// registry) to [`ChartContainer::new`](super::ChartContainer::new).
#[must_use]
pub fn shared_registry() -> SharedRegistry {
    SHARED_REGISTRY.with(Rc::clone)
}

/// Chart-type key to plugin descriptor map. One descriptor per key.
#[derive(Debug, Default)]
pub struct ChartPluginRegistry {
    plugins: IndexMap<String, ChartPlugin>,
}

impl ChartPluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn into_shared(self) -> SharedRegistry {
        Rc::new(RefCell::new(self))
    }

    /// Inserts `plugin` under its key, replacing and returning any previous
    /// descriptor for that key.
    pub fn register(&mut self, plugin: ChartPlugin) -> Option<ChartPlugin> {
        let key = plugin.key().to_owned();
        let replaced = self.plugins.insert(key.clone(), plugin);
        if replaced.is_some() {
            debug!(chart_type = %key, "replaced chart plugin");
        } else {
            debug!(chart_type = %key, "registered chart plugin");
        }
        replaced
    }

    /// Removes the descriptor for `key`. Absent keys are a no-op.
    pub fn unregister(&mut self, key: &str) -> Option<ChartPlugin> {
        let removed = self.plugins.shift_remove(key);
        if removed.is_some() {
            debug!(chart_type = %key, "unregistered chart plugin");
        }
        removed
    }

    pub fn get(&self, key: &str) -> ChartResult<&ChartPlugin> {
        self.plugins
            .get(key)
            .ok_or_else(|| ChartError::NotFound(key.to_owned()))
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.plugins.contains_key(key)
    }

    pub fn metadata(&self, key: &str) -> ChartResult<&ChartMetadata> {
        self.get(key).map(ChartPlugin::metadata)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    #[must_use]
    pub fn keys_with_tag(&self, tag: &str) -> Vec<&str> {
        self.plugins
            .values()
            .filter(|plugin| plugin.metadata().has_tag(tag))
            .map(ChartPlugin::key)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn clear(&mut self) {
        self.plugins.clear();
    }
}
