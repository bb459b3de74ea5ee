//! Host-facing API: the plugin registry and the responsive chart container.

mod container;
mod container_config;
mod debounce;
mod plugin_registry;
mod render_attempt;
mod resize;

pub use container::{ChartContainer, ContainerFailure, ContainerState, RenderedView};
pub use container_config::{ChartContainerConfig, DEFAULT_DEBOUNCE_TIME_MS};
pub use debounce::TrailingDebounce;
pub use plugin_registry::{ChartPluginRegistry, SharedRegistry, shared_registry};
pub use resize::{ContainerId, ManualResizeObserver, ResizeObservation};
