//! Failure isolation for chart renders.
//!
//! An [`ErrorBoundary`] turns a failed render into a fallback view and a
//! single `on_error` notification. Containers own one internally; hosts can
//! wrap containers in their own boundary to receive failures a container was
//! told not to isolate.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::ResolvedSize;
use crate::error::{ChartError, ChartResult};
use crate::render::{DefaultFallback, FallbackRenderer, RenderNode};

/// Stage of a render attempt where a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderPhase {
    Lookup,
    Transform,
    Render,
    AsyncRender,
}

/// Context passed alongside the error to fallbacks and `on_error` callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub chart_type: Option<String>,
    pub phase: RenderPhase,
    pub size: Option<ResolvedSize>,
}

impl ErrorInfo {
    /// Best-effort context for an error seen without its render attempt.
    #[must_use]
    pub fn from_error(error: &ChartError) -> Self {
        let phase = match error {
            ChartError::NotFound(_) => RenderPhase::Lookup,
            ChartError::TransformFailure { .. } => RenderPhase::Transform,
            _ => RenderPhase::Render,
        };
        Self {
            chart_type: error.chart_type().map(str::to_owned),
            phase,
            size: None,
        }
    }

    #[must_use]
    pub fn with_phase(mut self, phase: RenderPhase) -> Self {
        self.phase = phase;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: Option<ResolvedSize>) -> Self {
        self.size = size;
        self
    }
}

type ErrorCallback = Box<dyn FnMut(&ChartError, &ErrorInfo)>;

pub struct ErrorBoundary {
    fallback: Rc<dyn FallbackRenderer>,
    on_error: Option<ErrorCallback>,
    caught: usize,
}

impl ErrorBoundary {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fallback: Rc::new(DefaultFallback),
            on_error: None,
            caught: 0,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl FallbackRenderer + 'static) -> Self {
        self.fallback = Rc::new(fallback);
        self
    }

    #[must_use]
    pub fn with_on_error(
        mut self,
        on_error: impl FnMut(&ChartError, &ErrorInfo) + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    pub(crate) fn set_fallback(&mut self, fallback: Rc<dyn FallbackRenderer>) {
        self.fallback = fallback;
    }

    pub(crate) fn set_on_error(&mut self, on_error: ErrorCallback) {
        self.on_error = Some(on_error);
    }

    /// Records one failure: notifies `on_error` once and renders the fallback.
    pub fn catch(&mut self, error: &ChartError, info: &ErrorInfo) -> RenderNode {
        self.caught += 1;
        warn!(
            error = %error,
            chart_type = info.chart_type.as_deref().unwrap_or("<unknown>"),
            phase = ?info.phase,
            "render failure caught by error boundary"
        );
        if let Some(on_error) = self.on_error.as_mut() {
            on_error(error, info);
        }
        self.fallback.render(error, info)
    }

    /// Runs `render`, isolating both returned errors and panics.
    pub fn run<T>(&mut self, render: impl FnOnce() -> ChartResult<T>) -> Result<T, RenderNode> {
        match catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => {
                let info = ErrorInfo::from_error(&error);
                Err(self.catch(&error, &info))
            }
            Err(payload) => {
                let error = ChartError::Panic(panic_message(&*payload));
                let info = ErrorInfo::from_error(&error);
                Err(self.catch(&error, &info))
            }
        }
    }

    /// Number of failures this boundary has caught.
    #[must_use]
    pub fn caught_count(&self) -> usize {
        self.caught
    }
}

impl Default for ErrorBoundary {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ErrorBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorBoundary")
            .field("has_on_error", &self.on_error.is_some())
            .field("caught", &self.caught)
            .finish_non_exhaustive()
    }
}

/// Extracts a readable message from a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return (*message).to_owned();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "non-string panic payload".to_owned()
}
