use std::panic::resume_unwind;
use std::rc::Rc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{MeasuredBox, ResolvedSize, SizeResolution, requires_observation, resolve_size};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ErrorBoundary, ErrorInfo, FailureInbox, FallbackRenderer, RenderNode, RenderPhase,
};

use super::debounce::TrailingDebounce;
use super::render_attempt::{RenderFailure, render_once};
use super::{ChartContainerConfig, ContainerId, ResizeObservation, SharedRegistry};

/// Sizing state of a container. Failure is tracked separately, see
/// [`ChartContainer::is_failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerState {
    /// Not mounted yet.
    Idle,
    /// A relative dimension waits for the first measured box.
    Unmeasured,
    /// Every dimension is resolved.
    Measured,
    /// Torn down; ignores further events.
    Destroyed,
}

/// What the container currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedView {
    /// Nothing yet, or output withdrawn after a propagated failure.
    Empty,
    Chart(RenderNode),
    Fallback(RenderNode),
}

impl RenderedView {
    #[must_use]
    pub fn node(&self) -> Option<&RenderNode> {
        match self {
            Self::Empty => None,
            Self::Chart(node) | Self::Fallback(node) => Some(node),
        }
    }

    #[must_use]
    pub fn is_chart(&self) -> bool {
        matches!(self, Self::Chart(_))
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Nodes carrying `class`, searched in the shown tree.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<&RenderNode> {
        self.node()
            .map(|node| node.find_by_class(class))
            .unwrap_or_default()
    }
}

/// Last render failure and its context.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerFailure {
    pub error: ChartError,
    pub info: ErrorInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Mounted,
    Destroyed,
}

/// Responsive host for whichever chart plugin `config.chart_type` names.
///
/// The container resolves its size (waiting for a measured box when a
/// dimension is relative), debounces resize notifications, runs the plugin's
/// transform and renderer, and isolates their failures behind an
/// [`ErrorBoundary`] unless `disable_error_boundary` is set.
///
/// Time is passed in explicitly; a host drives the container from its event
/// loop by forwarding box changes and calling [`poll`](Self::poll).
pub struct ChartContainer {
    id: ContainerId,
    registry: SharedRegistry,
    config: ChartContainerConfig,
    boundary: ErrorBoundary,
    observer: Option<Rc<dyn ResizeObservation>>,
    observing: bool,
    measured: Option<MeasuredBox>,
    resolution: SizeResolution,
    debounce: TrailingDebounce<MeasuredBox>,
    inbox: FailureInbox,
    generation: u64,
    lifecycle: Lifecycle,
    view: RenderedView,
    failure: Option<ContainerFailure>,
}

impl ChartContainer {
    pub fn new(registry: SharedRegistry, config: ChartContainerConfig) -> ChartResult<Self> {
        let resolution = resolve_size(config.width, config.height, None);
        Ok(Self {
            id: ContainerId::next(),
            registry,
            debounce: TrailingDebounce::new(config.debounce_time()),
            config,
            boundary: ErrorBoundary::new(),
            observer: None,
            observing: false,
            measured: None,
            resolution,
            inbox: FailureInbox::default(),
            generation: 0,
            lifecycle: Lifecycle::Idle,
            view: RenderedView::Empty,
            failure: None,
        })
    }

    /// Replaces the built-in fallback view.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl FallbackRenderer + 'static) -> Self {
        self.boundary.set_fallback(Rc::new(fallback));
        self
    }

    /// Called once per caught failure. Never called when the boundary is disabled.
    #[must_use]
    pub fn with_error_handler(
        mut self,
        on_error: impl FnMut(&ChartError, &ErrorInfo) + 'static,
    ) -> Self {
        self.boundary.set_on_error(Box::new(on_error));
        self
    }

    #[must_use]
    pub fn with_resize_observer(mut self, observer: Rc<dyn ResizeObservation>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Subscribes to resizes if needed and performs the first render attempt.
    ///
    /// With the error boundary disabled, a failed attempt is returned as `Err`.
    pub fn mount(&mut self) -> ChartResult<()> {
        match self.lifecycle {
            Lifecycle::Idle => {}
            Lifecycle::Mounted => return Ok(()),
            Lifecycle::Destroyed => {
                debug!(container = %self.id, "ignoring mount of a torn down container");
                return Ok(());
            }
        }

        self.lifecycle = Lifecycle::Mounted;
        debug!(
            container = %self.id,
            chart_type = %self.config.chart_type,
            "mounting chart container"
        );
        self.sync_observation();
        self.attempt_render()
    }

    /// Applies new props. Identical props are a no-op; anything else triggers a
    /// fresh render attempt, which also clears a previous failure.
    pub fn set_config(&mut self, config: ChartContainerConfig) -> ChartResult<()> {
        if config == self.config {
            return Ok(());
        }

        self.debounce.set_delay(config.debounce_time());
        self.config = config;
        if self.lifecycle != Lifecycle::Mounted {
            self.resolution = resolve_size(self.config.width, self.config.height, self.measured);
            return Ok(());
        }

        self.sync_observation();
        self.attempt_render()
    }

    /// Feeds an observed container box. Applied after the debounce delay, or
    /// right away when the delay is zero.
    pub fn on_box_change(&mut self, measured: MeasuredBox, now: Instant) -> ChartResult<()> {
        if self.lifecycle != Lifecycle::Mounted || !self.observing {
            trace!(container = %self.id, "ignoring box change while not observing");
            return Ok(());
        }
        if !measured.is_valid() {
            warn!(
                container = %self.id,
                width = measured.width,
                height = measured.height,
                "ignoring invalid measured box"
            );
            return Ok(());
        }

        self.debounce.push(measured, now);
        if self.debounce.delay().is_zero() {
            return self.flush_resize(now);
        }
        Ok(())
    }

    /// Handles failures reported by renderers since the last poll, then runs
    /// the debounced recomputation if its quiet period is over.
    pub fn poll(&mut self, now: Instant) -> ChartResult<()> {
        if self.lifecycle != Lifecycle::Mounted {
            return Ok(());
        }
        self.drain_async_failures()?;
        self.flush_resize(now)
    }

    /// Cancels pending work and unsubscribes. Nothing fires afterwards.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }

        self.debounce.cancel();
        self.set_observing(false);
        self.inbox.close();
        self.view = RenderedView::Empty;
        self.lifecycle = Lifecycle::Destroyed;
        debug!(container = %self.id, "chart container torn down");
    }

    #[must_use]
    pub fn id(&self) -> ContainerId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &ChartContainerConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    #[must_use]
    pub fn state(&self) -> ContainerState {
        match self.lifecycle {
            Lifecycle::Idle => ContainerState::Idle,
            Lifecycle::Destroyed => ContainerState::Destroyed,
            Lifecycle::Mounted if self.resolution.is_pending() => ContainerState::Unmeasured,
            Lifecycle::Mounted => ContainerState::Measured,
        }
    }

    #[must_use]
    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&ContainerFailure> {
        self.failure.as_ref()
    }

    #[must_use]
    pub fn size_resolution(&self) -> SizeResolution {
        self.resolution
    }

    #[must_use]
    pub fn resolved_size(&self) -> Option<ResolvedSize> {
        self.resolution.resolved()
    }

    /// `"<width>x<height>"` of the current resolution.
    #[must_use]
    pub fn dimension_text(&self) -> Option<String> {
        self.resolved_size().map(|size| size.to_string())
    }

    #[must_use]
    pub fn measured_box(&self) -> Option<MeasuredBox> {
        self.measured
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    #[must_use]
    pub fn has_pending_resize(&self) -> bool {
        self.debounce.is_pending()
    }

    fn sync_observation(&mut self) {
        let needed = requires_observation(self.config.width, self.config.height);
        self.set_observing(needed);
    }

    fn set_observing(&mut self, observing: bool) {
        if observing == self.observing {
            return;
        }

        if let Some(observer) = &self.observer {
            if observing {
                observer.observe(self.id);
            } else {
                observer.unobserve(self.id);
            }
        }
        if !observing {
            self.debounce.cancel();
            self.measured = None;
        }
        self.observing = observing;
        debug!(container = %self.id, observing, "resize observation changed");
    }

    fn flush_resize(&mut self, now: Instant) -> ChartResult<()> {
        let Some(measured) = self.debounce.poll(now) else {
            return Ok(());
        };

        self.measured = Some(measured);
        let resolution = resolve_size(self.config.width, self.config.height, Some(measured));
        if resolution == self.resolution && self.failure.is_none() && self.view.is_chart() {
            trace!(container = %self.id, "measured box leaves resolved size unchanged");
            return Ok(());
        }
        self.attempt_render()
    }

    fn drain_async_failures(&mut self) -> ChartResult<()> {
        let Some(error) = self.inbox.take_for(self.generation) else {
            return Ok(());
        };
        if !self.view.is_chart() {
            trace!(
                container = %self.id,
                error = %error,
                "render already failed; ignoring late report"
            );
            return Ok(());
        }

        let info = ErrorInfo::from_error(&error)
            .with_phase(RenderPhase::AsyncRender)
            .with_size(self.resolved_size());
        self.fail(error, info)
    }

    fn attempt_render(&mut self) -> ChartResult<()> {
        self.generation += 1;
        self.failure = None;
        self.view = RenderedView::Empty;
        self.resolution = resolve_size(self.config.width, self.config.height, self.measured);

        let Some(size) = self.resolution.resolved() else {
            trace!(container = %self.id, "waiting for a measured box");
            return Ok(());
        };

        let isolate = !self.config.disable_error_boundary;
        let failures = self.inbox.reporter(self.generation, &self.config.chart_type);
        match render_once(&self.registry, &self.config, size, failures, isolate) {
            Ok(node) => {
                trace!(container = %self.id, size = %size, "chart rendered");
                self.view = RenderedView::Chart(node);
                Ok(())
            }
            Err(RenderFailure { error, unwind }) => {
                let info = ErrorInfo::from_error(&error).with_size(Some(size));
                if let Some(payload) = unwind {
                    debug!(container = %self.id, error = %error, "propagating render panic");
                    self.failure = Some(ContainerFailure { error, info });
                    self.view = RenderedView::Empty;
                    resume_unwind(payload);
                }
                self.fail(error, info)
            }
        }
    }

    fn fail(&mut self, error: ChartError, info: ErrorInfo) -> ChartResult<()> {
        self.failure = Some(ContainerFailure {
            error: error.clone(),
            info: info.clone(),
        });

        if self.config.disable_error_boundary {
            debug!(container = %self.id, error = %error, "propagating render failure");
            self.view = RenderedView::Empty;
            return Err(error);
        }

        let fallback = self.boundary.catch(&error, &info);
        self.view = RenderedView::Fallback(fallback);
        Ok(())
    }
}

impl Drop for ChartContainer {
    fn drop(&mut self) {
        self.teardown();
    }
}
