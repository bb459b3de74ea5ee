use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::SizeSpec;
use crate::error::{ChartError, ChartResult};
use crate::extensions::FormData;

pub const DEFAULT_DEBOUNCE_TIME_MS: u64 = 300;

/// Props of a chart container.
///
/// This type is serializable so hosts can persist/load chart setup. Callback
/// capabilities (fallback view, error handler, resize source) are attached to
/// the container itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartContainerConfig {
    pub chart_type: String,
    #[serde(default)]
    pub width: Option<SizeSpec>,
    #[serde(default)]
    pub height: Option<SizeSpec>,
    #[serde(default = "default_form_data")]
    pub form_data: FormData,
    /// Quiet period before a resize is applied. Zero applies boxes immediately.
    #[serde(default = "default_debounce_time_ms")]
    pub debounce_time_ms: u64,
    /// When set, render failures propagate to the caller instead of being
    /// replaced by the fallback view.
    #[serde(default)]
    pub disable_error_boundary: bool,
}

impl ChartContainerConfig {
    #[must_use]
    pub fn new(chart_type: impl Into<String>) -> Self {
        Self {
            chart_type: chart_type.into(),
            width: None,
            height: None,
            form_data: default_form_data(),
            debounce_time_ms: default_debounce_time_ms(),
            disable_error_boundary: false,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: SizeSpec) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: SizeSpec) -> Self {
        self.height = Some(height);
        self
    }

    /// Parses both dimensions from host strings such as `"50%"` or `"125"`.
    pub fn with_size_str(mut self, width: &str, height: &str) -> ChartResult<Self> {
        self.width = Some(width.parse()?);
        self.height = Some(height.parse()?);
        Ok(self)
    }

    #[must_use]
    pub fn with_form_data(mut self, form_data: FormData) -> Self {
        self.form_data = form_data;
        self
    }

    #[must_use]
    pub fn with_debounce_time(mut self, debounce: Duration) -> Self {
        self.debounce_time_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_error_boundary_disabled(mut self, disabled: bool) -> Self {
        self.disable_error_boundary = disabled;
        self
    }

    #[must_use]
    pub fn debounce_time(&self) -> Duration {
        Duration::from_millis(self.debounce_time_ms)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.chart_type.trim().is_empty() {
            return Err(ChartError::InvalidConfig(
                "chart_type must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse container config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize container config: {e}"))
        })
    }
}

fn default_form_data() -> FormData {
    FormData::Object(serde_json::Map::new())
}

fn default_debounce_time_ms() -> u64 {
    DEFAULT_DEBOUNCE_TIME_MS
}
