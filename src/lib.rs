//! chart-host: pluggable chart rendering for host applications.
//!
//! A [`ChartPluginRegistry`] maps chart-type keys to renderer + transform
//! pairs, and a [`ChartContainer`] resolves its size (fixed or relative to an
//! observed box), debounces resizes, runs the active plugin and keeps a
//! failing chart from taking down the rest of the host.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{ChartContainer, ChartContainerConfig, ChartPluginRegistry};
pub use error::{ChartError, ChartResult};
