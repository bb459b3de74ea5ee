//! Axis encoding options read from chart form data.
//!
//! Field names follow the Vega-Lite axis vocabulary (`labelAngle`,
//! `tickCount`, ...). Orientation-specific wrappers reject options that make
//! no sense for their direction while deserializing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrient {
    Top,
    Bottom,
    Left,
    Right,
}

impl AxisOrient {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Strategy for handling label overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelOverlapStrategy {
    #[default]
    Auto,
    Flat,
    Rotate,
}

/// Flush alignment of the first and last labels; a number also pushes them
/// outward by that many pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelFlush {
    Enabled(bool),
    Offset(f64),
}

impl LabelFlush {
    #[must_use]
    pub fn offset_px(self) -> Option<f64> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(0.0),
            Self::Offset(offset) => Some(offset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisTitle {
    Visible(bool),
    Text(String),
}

/// Explicit tick values. RFC 3339 strings are read as instants; any other
/// strings stay text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValues {
    Numbers(Vec<f64>),
    Flags(Vec<bool>),
    DateTimes(Vec<DateTime<Utc>>),
    Texts(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_flush: Option<LabelFlush>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_overlap: Option<LabelOverlapStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orient: Option<AxisOrient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<AxisValues>,
}

impl AxisConfig {
    fn validate_numbers(&self) -> ChartResult<()> {
        let numbers = [
            ("labelAngle", self.label_angle),
            ("labelPadding", self.label_padding),
            ("tickSize", self.tick_size),
        ];
        for (name, value) in numbers {
            if value.is_some_and(|value| !value.is_finite()) {
                return Err(ChartError::InvalidConfig(format!("axis {name} must be finite")));
            }
        }
        Ok(())
    }
}

/// Horizontal axis: oriented top or bottom.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "AxisConfig", into = "AxisConfig")]
pub struct XAxisConfig(AxisConfig);

impl XAxisConfig {
    pub fn new(config: AxisConfig) -> ChartResult<Self> {
        config.validate_numbers()?;
        if config.orient.is_some_and(|orient| !orient.is_horizontal()) {
            return Err(ChartError::InvalidConfig(
                "x axis orient must be `top` or `bottom`".to_owned(),
            ));
        }
        Ok(Self(config))
    }

    #[must_use]
    pub fn config(&self) -> &AxisConfig {
        &self.0
    }

    #[must_use]
    pub fn orient(&self) -> AxisOrient {
        self.0.orient.unwrap_or(AxisOrient::Bottom)
    }
}

/// Vertical axis: oriented left or right, labels never rotated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "AxisConfig", into = "AxisConfig")]
pub struct YAxisConfig(AxisConfig);

impl YAxisConfig {
    pub fn new(config: AxisConfig) -> ChartResult<Self> {
        config.validate_numbers()?;
        if config.orient.is_some_and(AxisOrient::is_horizontal) {
            return Err(ChartError::InvalidConfig(
                "y axis orient must be `left` or `right`".to_owned(),
            ));
        }
        if config.label_angle.is_some_and(|angle| angle != 0.0) {
            return Err(ChartError::InvalidConfig(
                "y axis labelAngle must be 0".to_owned(),
            ));
        }
        if config.label_overlap == Some(LabelOverlapStrategy::Rotate) {
            return Err(ChartError::InvalidConfig(
                "y axis labelOverlap must be `auto` or `flat`".to_owned(),
            ));
        }
        Ok(Self(config))
    }

    #[must_use]
    pub fn config(&self) -> &AxisConfig {
        &self.0
    }

    #[must_use]
    pub fn orient(&self) -> AxisOrient {
        self.0.orient.unwrap_or(AxisOrient::Left)
    }
}

impl TryFrom<AxisConfig> for XAxisConfig {
    type Error = ChartError;

    fn try_from(config: AxisConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl TryFrom<AxisConfig> for YAxisConfig {
    type Error = ChartError;

    fn try_from(config: AxisConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl From<XAxisConfig> for AxisConfig {
    fn from(axis: XAxisConfig) -> Self {
        axis.0
    }
}

impl From<YAxisConfig> for AxisConfig {
    fn from(axis: YAxisConfig) -> Self {
        axis.0
    }
}

/// An x axis may also be switched on or off wholesale (`"axis": false`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XAxisSetting {
    Enabled(bool),
    Config(XAxisConfig),
}

impl XAxisSetting {
    /// Effective axis config; `None` when the axis is hidden.
    #[must_use]
    pub fn resolve(&self) -> Option<XAxisConfig> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(XAxisConfig::default()),
            Self::Config(config) => Some(config.clone()),
        }
    }
}
