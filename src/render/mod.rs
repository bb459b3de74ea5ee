mod boundary;
mod failure;
mod fallback;
mod node;

pub use boundary::{ErrorBoundary, ErrorInfo, RenderPhase, panic_message};
pub(crate) use failure::FailureInbox;
pub use failure::FailureReporter;
pub use fallback::{DefaultFallback, FALLBACK_CLASS, FallbackRenderer};
pub use node::RenderNode;
