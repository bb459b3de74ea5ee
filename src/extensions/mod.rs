//! Chart plugin contracts.
//!
//! Renderers and transforms are opaque to the host: anything implementing
//! [`ChartRenderer`] / [`ChartTransform`] (closures included) can be bundled
//! into a [`ChartPlugin`] and registered under a chart-type key.

pub mod plugins;

pub use plugins::{
    ChartMetadata, ChartPlugin, ChartPluginBuilder, ChartRenderer, ChartTransform, FormData,
    RenderRequest,
};
