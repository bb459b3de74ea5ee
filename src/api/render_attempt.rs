use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::core::ResolvedSize;
use crate::error::{ChartError, ChartResult};
use crate::extensions::RenderRequest;
use crate::render::{FailureReporter, RenderNode, panic_message};

use super::{ChartContainerConfig, SharedRegistry};

type PanicPayload = Box<dyn Any + Send>;

enum Fault {
    Returned(ChartError),
    Panicked(PanicPayload),
}

/// Why a render attempt produced no chart.
///
/// `unwind` holds the panic payload of plugin code run without isolation; the
/// caller records the failure and then resumes unwinding with it.
pub(super) struct RenderFailure {
    pub(super) error: ChartError,
    pub(super) unwind: Option<PanicPayload>,
}

impl From<ChartError> for RenderFailure {
    fn from(error: ChartError) -> Self {
        Self {
            error,
            unwind: None,
        }
    }
}

impl fmt::Debug for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderFailure")
            .field("error", &self.error)
            .field("unwinding", &self.unwind.is_some())
            .finish()
    }
}

fn invoke<T>(call: impl FnOnce() -> ChartResult<T>) -> Result<T, Fault> {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result.map_err(Fault::Returned),
        Err(payload) => Err(Fault::Panicked(payload)),
    }
}

fn wrap_fault(
    fault: Fault,
    isolate: bool,
    already_wrapped: fn(&ChartError) -> bool,
    wrap: impl FnOnce(String) -> ChartError,
) -> RenderFailure {
    match fault {
        Fault::Returned(error) if already_wrapped(&error) => error.into(),
        Fault::Returned(error) => wrap(error.to_string()).into(),
        Fault::Panicked(payload) => RenderFailure {
            error: wrap(format!("panicked: {}", panic_message(&*payload))),
            unwind: (!isolate).then_some(payload),
        },
    }
}

fn transform_failure(chart_type: &str, fault: Fault, isolate: bool) -> RenderFailure {
    wrap_fault(
        fault,
        isolate,
        |error| matches!(error, ChartError::TransformFailure { .. }),
        |message| ChartError::TransformFailure {
            chart_type: chart_type.to_owned(),
            message,
        },
    )
}

fn renderer_failure(chart_type: &str, fault: Fault, isolate: bool) -> RenderFailure {
    wrap_fault(
        fault,
        isolate,
        |error| matches!(error, ChartError::RendererFailure { .. }),
        |message| ChartError::RendererFailure {
            chart_type: chart_type.to_owned(),
            message,
        },
    )
}

/// One lookup → transform → render pass.
///
/// The registry borrow ends before plugin code runs, so renderers may
/// register or unregister plugins themselves. Panics are always caught here;
/// without isolation the payload is handed back for re-raising.
pub(super) fn render_once(
    registry: &SharedRegistry,
    config: &ChartContainerConfig,
    size: ResolvedSize,
    failures: FailureReporter,
    isolate: bool,
) -> Result<RenderNode, RenderFailure> {
    let chart_type = config.chart_type.as_str();
    let plugin = registry.borrow().get(chart_type)?.clone();

    let props = invoke(|| plugin.transform(&config.form_data))
        .map_err(|fault| transform_failure(chart_type, fault, isolate))?;

    let request = RenderRequest {
        chart_type: chart_type.to_owned(),
        props,
        size,
        failures,
    };
    invoke(|| plugin.render(&request)).map_err(|fault| renderer_failure(chart_type, fault, isolate))
}
