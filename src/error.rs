use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("chart type `{0}` is not registered")]
    NotFound(String),

    #[error("renderer for `{chart_type}` failed: {message}")]
    RendererFailure { chart_type: String, message: String },

    #[error("transform for `{chart_type}` failed: {message}")]
    TransformFailure { chart_type: String, message: String },

    #[error("invalid plugin: {0}")]
    InvalidPlugin(String),

    #[error("invalid size `{input}`: {reason}")]
    InvalidSize { input: String, reason: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("render panicked: {0}")]
    Panic(String),
}

impl ChartError {
    pub(crate) fn invalid_size(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSize {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Chart type the failure is attributed to, when the variant carries one.
    #[must_use]
    pub fn chart_type(&self) -> Option<&str> {
        match self {
            Self::NotFound(key) => Some(key),
            Self::RendererFailure { chart_type, .. }
            | Self::TransformFailure { chart_type, .. } => Some(chart_type),
            _ => None,
        }
    }
}
