//! Turns requested width/height into pixels.
//!
//! Each axis resolves on its own. Absolute sizes are final immediately;
//! percentages wait for a measured box. An absent width behaves like `100%`
//! and shows [`DEFAULT_WIDTH`] until the first measurement arrives, while an
//! absent height is a fixed [`DEFAULT_HEIGHT`].

use serde::{Deserialize, Serialize};

use crate::core::types::{MeasuredBox, ResolvedSize, SizeSpec};

pub const DEFAULT_WIDTH: f64 = 300.0;
pub const DEFAULT_HEIGHT: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    #[must_use]
    pub fn extent(self, measured: MeasuredBox) -> f64 {
        match self {
            Self::Width => measured.width,
            Self::Height => measured.height,
        }
    }
}

/// Outcome of resolving a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisResolution {
    /// Absolute request; never touched by later measurements.
    Fixed(f64),
    /// Relative request computed from the measured box.
    Measured(f64),
    /// Default shown before the first measurement of a responsive axis.
    Fallback(f64),
    /// Relative request with no measured box yet.
    Pending,
}

impl AxisResolution {
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Fixed(value) | Self::Measured(value) | Self::Fallback(value) => Some(value),
            Self::Pending => None,
        }
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeResolution {
    pub width: AxisResolution,
    pub height: AxisResolution,
}

impl SizeResolution {
    /// Both axes as pixels, or `None` while any axis waits for measurement.
    #[must_use]
    pub fn resolved(self) -> Option<ResolvedSize> {
        Some(ResolvedSize::new(self.width.value()?, self.height.value()?))
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        self.width.is_pending() || self.height.is_pending()
    }
}

/// Request after defaults for absent axes have been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
enum EffectiveSpec {
    Fixed(f64),
    Relative { percent: f64, fallback: Option<f64> },
}

fn effective_spec(axis: Axis, spec: Option<SizeSpec>) -> EffectiveSpec {
    match (spec, axis) {
        (Some(SizeSpec::Pixels(value)), _) => EffectiveSpec::Fixed(value),
        (Some(SizeSpec::Percent(percent)), _) => EffectiveSpec::Relative {
            percent,
            fallback: None,
        },
        (None, Axis::Width) => EffectiveSpec::Relative {
            percent: 100.0,
            fallback: Some(DEFAULT_WIDTH),
        },
        (None, Axis::Height) => EffectiveSpec::Fixed(DEFAULT_HEIGHT),
    }
}

/// `percent` of `extent`, saturating at `f64::MAX` for huge percentages.
fn percent_of(extent: f64, percent: f64) -> f64 {
    let scaled = extent * percent / 100.0;
    if scaled.is_finite() {
        return scaled;
    }
    (extent * (percent / 100.0)).min(f64::MAX)
}

#[must_use]
pub fn resolve_axis(
    axis: Axis,
    spec: Option<SizeSpec>,
    measured: Option<MeasuredBox>,
) -> AxisResolution {
    match effective_spec(axis, spec) {
        EffectiveSpec::Fixed(value) => AxisResolution::Fixed(value),
        EffectiveSpec::Relative { percent, fallback } => match (measured, fallback) {
            (Some(measured), _) => {
                AxisResolution::Measured(percent_of(axis.extent(measured), percent))
            }
            (None, Some(fallback)) => AxisResolution::Fallback(fallback),
            (None, None) => AxisResolution::Pending,
        },
    }
}

#[must_use]
pub fn resolve_size(
    width: Option<SizeSpec>,
    height: Option<SizeSpec>,
    measured: Option<MeasuredBox>,
) -> SizeResolution {
    SizeResolution {
        width: resolve_axis(Axis::Width, width, measured),
        height: resolve_axis(Axis::Height, height, measured),
    }
}

/// Whether any axis depends on the container box, i.e. a resize subscription is needed.
#[must_use]
pub fn requires_observation(width: Option<SizeSpec>, height: Option<SizeSpec>) -> bool {
    [(Axis::Width, width), (Axis::Height, height)]
        .into_iter()
        .any(|(axis, spec)| matches!(effective_spec(axis, spec), EffectiveSpec::Relative { .. }))
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisResolution, requires_observation, resolve_axis};
    use crate::core::types::{MeasuredBox, SizeSpec};

    #[test]
    fn absent_width_falls_back_until_measured() {
        assert_eq!(
            resolve_axis(Axis::Width, None, None),
            AxisResolution::Fallback(300.0)
        );
        assert_eq!(
            resolve_axis(Axis::Width, None, Some(MeasuredBox::new(640.0, 10.0))),
            AxisResolution::Measured(640.0)
        );
    }

    #[test]
    fn absent_height_is_fixed_default() {
        assert_eq!(
            resolve_axis(Axis::Height, None, Some(MeasuredBox::new(640.0, 10.0))),
            AxisResolution::Fixed(400.0)
        );
    }

    #[test]
    fn observation_is_needed_for_any_relative_axis() {
        let px = Some(SizeSpec::Pixels(10.0));
        let pct = Some(SizeSpec::Percent(10.0));
        assert!(!requires_observation(px, px));
        assert!(requires_observation(pct, px));
        assert!(requires_observation(px, pct));
        assert!(requires_observation(None, px));
        assert!(!requires_observation(px, None));
    }

    #[test]
    fn huge_percentages_stay_finite() {
        let spec = Some(SizeSpec::Percent(1e307));
        let resolved = resolve_axis(Axis::Width, spec, Some(MeasuredBox::new(300.0, 0.0)));
        let value = resolved.value().expect("measured");
        assert!(value.is_finite());
        assert!((value - 3e307).abs() <= 3e307 * 1e-12);

        let saturated = resolve_axis(
            Axis::Width,
            Some(SizeSpec::Percent(f64::MAX)),
            Some(MeasuredBox::new(f64::MAX, 0.0)),
        );
        assert_eq!(saturated, AxisResolution::Measured(f64::MAX));
    }
}
