use crate::error::ChartError;
use crate::render::{ErrorInfo, RenderNode};

pub const FALLBACK_CLASS: &str = "error-boundary-fallback";

/// View shown in place of a chart whose render failed.
pub trait FallbackRenderer {
    fn render(&self, error: &ChartError, info: &ErrorInfo) -> RenderNode;
}

impl<F> FallbackRenderer for F
where
    F: Fn(&ChartError, &ErrorInfo) -> RenderNode,
{
    fn render(&self, error: &ChartError, info: &ErrorInfo) -> RenderNode {
        self(error, info)
    }
}

/// Built-in fallback: a short notice plus the error text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFallback;

impl FallbackRenderer for DefaultFallback {
    fn render(&self, error: &ChartError, _info: &ErrorInfo) -> RenderNode {
        RenderNode::new("div")
            .with_class(FALLBACK_CLASS)
            .with_child(RenderNode::new("p").with_text("Oops! An error occurred!"))
            .with_child(
                RenderNode::new("code")
                    .with_class("error-message")
                    .with_text(error.to_string()),
            )
    }
}
