use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Requested extent of one axis: fixed pixels or a share of the measured box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSizeSpec", into = "RawSizeSpec")]
pub enum SizeSpec {
    Pixels(f64),
    Percent(f64),
}

impl SizeSpec {
    pub fn pixels(value: f64) -> ChartResult<Self> {
        validate_extent(value, || value.to_string())?;
        Ok(Self::Pixels(value))
    }

    pub fn percent(value: f64) -> ChartResult<Self> {
        validate_extent(value, || format!("{value}%"))?;
        Ok(Self::Percent(value))
    }

    #[must_use]
    pub fn is_relative(self) -> bool {
        matches!(self, Self::Percent(_))
    }
}

fn validate_extent(value: f64, input: impl FnOnce() -> String) -> ChartResult<()> {
    if !value.is_finite() {
        return Err(ChartError::invalid_size(input(), "value must be finite"));
    }
    if value < 0.0 {
        return Err(ChartError::invalid_size(input(), "value must not be negative"));
    }
    Ok(())
}

impl FromStr for SizeSpec {
    type Err = ChartError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if let Some(number) = trimmed.strip_suffix('%') {
            let value = number
                .trim()
                .parse::<f64>()
                .map_err(|_| ChartError::invalid_size(input, "percentage is not a number"))?;
            validate_extent(value, || input.to_owned())?;
            return Ok(Self::Percent(value));
        }

        let value = trimmed
            .parse::<f64>()
            .map_err(|_| ChartError::invalid_size(input, "expected a number or `<n>%`"))?;
        validate_extent(value, || input.to_owned())?;
        Ok(Self::Pixels(value))
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(value) => write!(f, "{value}"),
            Self::Percent(value) => write!(f, "{value}%"),
        }
    }
}

/// Wire form: sizes arrive either as JSON numbers or as strings such as `"50%"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSizeSpec {
    Number(f64),
    Text(String),
}

impl TryFrom<RawSizeSpec> for SizeSpec {
    type Error = ChartError;

    fn try_from(raw: RawSizeSpec) -> Result<Self, Self::Error> {
        match raw {
            RawSizeSpec::Number(value) => Self::pixels(value),
            RawSizeSpec::Text(text) => text.parse(),
        }
    }
}

impl From<SizeSpec> for RawSizeSpec {
    fn from(spec: SizeSpec) -> Self {
        match spec {
            SizeSpec::Pixels(value) => Self::Number(value),
            SizeSpec::Percent(_) => Self::Text(spec.to_string()),
        }
    }
}

/// Container box as last reported by the resize observation source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredBox {
    pub width: f64,
    pub height: f64,
}

impl MeasuredBox {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Final pixel size handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSize {
    pub width: f64,
    pub height: f64,
}

impl ResolvedSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ResolvedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
