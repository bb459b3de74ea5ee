use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::ChartError;

#[derive(Debug, Default)]
struct FailureChannel {
    reports: Vec<(u64, ChartError)>,
    closed: bool,
}

/// Handle a renderer keeps to report failures of work it finishes later.
///
/// Each handle is stamped with the render attempt that created it. Reports
/// from superseded attempts, or made after the owning container was torn
/// down, are discarded.
#[derive(Clone)]
pub struct FailureReporter {
    channel: Rc<RefCell<FailureChannel>>,
    generation: u64,
    chart_type: String,
}

impl FailureReporter {
    /// Reporter wired to nothing; reports are dropped. Used for renders outside a container.
    #[must_use]
    pub fn detached(chart_type: impl Into<String>) -> Self {
        Self {
            channel: Rc::new(RefCell::new(FailureChannel {
                reports: Vec::new(),
                closed: true,
            })),
            generation: 0,
            chart_type: chart_type.into(),
        }
    }

    pub fn report(&self, message: impl Into<String>) {
        self.push(ChartError::RendererFailure {
            chart_type: self.chart_type.clone(),
            message: message.into(),
        });
    }

    pub fn report_error(&self, error: ChartError) {
        match error {
            ChartError::RendererFailure { .. } => self.push(error),
            other => self.report(other.to_string()),
        }
    }

    fn push(&self, error: ChartError) {
        let mut channel = self.channel.borrow_mut();
        if channel.closed {
            trace!(chart_type = %self.chart_type, "dropping failure report on closed channel");
            return;
        }
        channel.reports.push((self.generation, error));
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.channel.borrow().closed
    }
}

impl fmt::Debug for FailureReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureReporter")
            .field("chart_type", &self.chart_type)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Receiving side owned by a container.
#[derive(Debug, Default)]
pub(crate) struct FailureInbox {
    channel: Rc<RefCell<FailureChannel>>,
}

impl FailureInbox {
    pub(crate) fn reporter(&self, generation: u64, chart_type: &str) -> FailureReporter {
        FailureReporter {
            channel: Rc::clone(&self.channel),
            generation,
            chart_type: chart_type.to_owned(),
        }
    }

    /// Drains every pending report and returns the first one for `generation`.
    pub(crate) fn take_for(&self, generation: u64) -> Option<ChartError> {
        let reports = std::mem::take(&mut self.channel.borrow_mut().reports);
        let stale = reports.len();
        let current = reports
            .into_iter()
            .find_map(|(stamp, error)| (stamp == generation).then_some(error));
        if current.is_none() && stale > 0 {
            trace!(stale, "discarding failure reports from superseded renders");
        }
        current
    }

    pub(crate) fn close(&self) {
        let mut channel = self.channel.borrow_mut();
        channel.closed = true;
        channel.reports.clear();
    }
}
