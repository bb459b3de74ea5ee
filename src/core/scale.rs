//! Scale objects consumed by chart renderers.
//!
//! `create_scale_from_scale_type` maps an encoding `ScaleType` to an
//! unconfigured scale with d3-style defaults; renderers then set domain and
//! range before mapping values. The container never touches scales.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Vega-Lite scale types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleType {
    Linear,
    BinLinear,
    Log,
    Pow,
    Sqrt,
    Time,
    Utc,
    Sequential,
    Quantile,
    Quantize,
    Threshold,
    BinOrdinal,
    Ordinal,
    Point,
    Band,
}

// 2000-01-01T00:00:00Z and 2000-01-02T00:00:00Z.
const DEFAULT_TIME_DOMAIN_MS: (f64, f64) = (946_684_800_000.0, 946_771_200_000.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContinuousKind {
    Linear,
    Log { base: f64 },
    Pow { exponent: f64 },
    Time,
    Utc,
}

impl ContinuousKind {
    fn default_domain(self) -> (f64, f64) {
        match self {
            Self::Log { .. } => (1.0, 10.0),
            Self::Time | Self::Utc => DEFAULT_TIME_DOMAIN_MS,
            Self::Linear | Self::Pow { .. } => (0.0, 1.0),
        }
    }

    fn forward(self, value: f64, negative_domain: bool) -> f64 {
        match self {
            Self::Linear | Self::Time | Self::Utc => value,
            Self::Log { base } if negative_domain => -(-value).log(base),
            Self::Log { base } => value.log(base),
            Self::Pow { exponent } => value.signum() * value.abs().powf(exponent),
        }
    }

    fn backward(self, value: f64, negative_domain: bool) -> f64 {
        match self {
            Self::Linear | Self::Time | Self::Utc => value,
            Self::Log { base } if negative_domain => -base.powf(-value),
            Self::Log { base } => base.powf(value),
            Self::Pow { exponent } => value.signum() * value.abs().powf(exponent.recip()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousScale {
    kind: ContinuousKind,
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl ContinuousScale {
    #[must_use]
    pub fn new(kind: ContinuousKind) -> Self {
        Self {
            kind,
            domain: kind.default_domain(),
            range: (0.0, 1.0),
            clamp: false,
        }
    }

    pub fn with_domain(mut self, start: f64, end: f64) -> ChartResult<Self> {
        if !start.is_finite() || !end.is_finite() || start == end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if matches!(self.kind, ContinuousKind::Log { .. }) && start * end <= 0.0 {
            return Err(ChartError::InvalidData(
                "log scale domain must not include or cross zero".to_owned(),
            ));
        }
        self.domain = (start, end);
        Ok(self)
    }

    pub fn with_time_domain(self, start: DateTime<Utc>, end: DateTime<Utc>) -> ChartResult<Self> {
        self.with_domain(millis(start), millis(end))
    }

    pub fn with_range(mut self, start: f64, end: f64) -> ChartResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ChartError::InvalidData("scale range must be finite".to_owned()));
        }
        self.range = (start, end);
        Ok(self)
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ContinuousKind {
        self.kind
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    fn negative_domain(&self) -> bool {
        self.domain.0 < 0.0
    }

    /// Maps a domain value into the range; `None` when the value is outside the
    /// transform's support (e.g. non-positive input on a log scale).
    #[must_use]
    pub fn scale(&self, value: f64) -> Option<f64> {
        let negative = self.negative_domain();
        let d0 = self.kind.forward(self.domain.0, negative);
        let d1 = self.kind.forward(self.domain.1, negative);
        let v = self.kind.forward(value, negative);
        if !v.is_finite() {
            return None;
        }

        let mut t = (v - d0) / (d1 - d0);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        Some(self.range.0 + t * (self.range.1 - self.range.0))
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> Option<f64> {
        let span = self.range.1 - self.range.0;
        if !pixel.is_finite() || span == 0.0 {
            return None;
        }

        let negative = self.negative_domain();
        let d0 = self.kind.forward(self.domain.0, negative);
        let d1 = self.kind.forward(self.domain.1, negative);
        let mut t = (pixel - self.range.0) / span;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        Some(self.kind.backward(d0 + t * (d1 - d0), negative))
    }

    /// Maps an instant on a time or utc scale.
    #[must_use]
    pub fn scale_time(&self, value: DateTime<Utc>) -> Option<f64> {
        match self.kind {
            ContinuousKind::Time | ContinuousKind::Utc => self.scale(millis(value)),
            _ => None,
        }
    }
}

fn millis(value: DateTime<Utc>) -> f64 {
    value.timestamp_millis() as f64
}

/// Uniform segments of a continuous domain mapped onto discrete outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizeScale<T> {
    domain: (f64, f64),
    range: Vec<T>,
}

impl<T> QuantizeScale<T> {
    pub fn with_domain(mut self, start: f64, end: f64) -> ChartResult<Self> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(ChartError::InvalidData(
                "quantize domain must be finite and ascending".to_owned(),
            ));
        }
        self.domain = (start, end);
        Ok(self)
    }

    #[must_use]
    pub fn with_range(mut self, range: Vec<T>) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn scale(&self, value: f64) -> Option<&T> {
        if self.range.is_empty() || !value.is_finite() {
            return None;
        }
        let n = self.range.len();
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        let index = (t * n as f64).floor().clamp(0.0, (n - 1) as f64) as usize;
        self.range.get(index)
    }
}

/// Sample quantiles mapped onto discrete outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileScale<T> {
    samples: Vec<OrderedFloat<f64>>,
    range: Vec<T>,
}

impl<T> QuantileScale<T> {
    /// Non-finite samples are dropped, the rest sorted.
    #[must_use]
    pub fn with_domain(mut self, samples: impl IntoIterator<Item = f64>) -> Self {
        let mut samples: Vec<OrderedFloat<f64>> = samples
            .into_iter()
            .filter(|value| value.is_finite())
            .map(OrderedFloat)
            .collect();
        samples.sort_unstable();
        self.samples = samples;
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: Vec<T>) -> Self {
        self.range = range;
        self
    }

    /// Thresholds between consecutive outputs, `range.len() - 1` of them.
    #[must_use]
    pub fn quantiles(&self) -> Vec<f64> {
        let n = self.range.len();
        if self.samples.is_empty() || n < 2 {
            return Vec::new();
        }
        (1..n)
            .map(|i| quantile_sorted(&self.samples, i as f64 / n as f64))
            .collect()
    }

    #[must_use]
    pub fn scale(&self, value: f64) -> Option<&T> {
        if self.samples.is_empty() || !value.is_finite() {
            return None;
        }
        let thresholds = self.quantiles();
        let index = thresholds.partition_point(|threshold| *threshold <= value);
        self.range.get(index)
    }
}

fn quantile_sorted(samples: &[OrderedFloat<f64>], p: f64) -> f64 {
    let h = (samples.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let lower = samples[lo].0;
    match samples.get(lo + 1) {
        Some(upper) => lower + (upper.0 - lower) * (h - lo as f64),
        None => lower,
    }
}

/// Explicit breakpoints mapped onto discrete outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdScale<T> {
    thresholds: Vec<f64>,
    range: Vec<T>,
}

impl<T> ThresholdScale<T> {
    pub fn with_domain(mut self, thresholds: Vec<f64>) -> ChartResult<Self> {
        if thresholds.windows(2).any(|pair| pair[0] > pair[1])
            || thresholds.iter().any(|value| !value.is_finite())
        {
            return Err(ChartError::InvalidData(
                "threshold domain must be finite and ascending".to_owned(),
            ));
        }
        self.thresholds = thresholds;
        Ok(self)
    }

    #[must_use]
    pub fn with_range(mut self, range: Vec<T>) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn scale(&self, value: f64) -> Option<&T> {
        let index = self.thresholds.partition_point(|threshold| *threshold <= value);
        self.range.get(index)
    }
}

/// Categorical mapping; unseen keys extend the domain implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale<T> {
    domain: IndexMap<String, usize>,
    range: Vec<T>,
}

impl<T> OrdinalScale<T> {
    #[must_use]
    pub fn with_domain<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.domain.clear();
        for key in keys {
            let next = self.domain.len();
            self.domain.entry(key.into()).or_insert(next);
        }
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: Vec<T>) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn domain(&self) -> Vec<&str> {
        self.domain.keys().map(String::as_str).collect()
    }

    pub fn scale(&mut self, key: &str) -> Option<&T> {
        if self.range.is_empty() {
            return None;
        }
        let next = self.domain.len();
        let index = *self.domain.entry(key.to_owned()).or_insert(next);
        self.range.get(index % self.range.len())
    }
}

/// Evenly spaced bands over a numeric range; a point scale is a band scale
/// whose inner padding is 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
}

impl BandScale {
    #[must_use]
    pub fn band() -> Self {
        Self {
            domain: Vec::new(),
            range: (0.0, 1.0),
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
        }
    }

    #[must_use]
    pub fn point() -> Self {
        Self {
            padding_inner: 1.0,
            ..Self::band()
        }
    }

    #[must_use]
    pub fn with_domain<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.domain = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_range(mut self, start: f64, end: f64) -> ChartResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ChartError::InvalidData("band range must be finite".to_owned()));
        }
        self.range = (start, end);
        Ok(self)
    }

    /// Sets the outer padding (the only padding a point scale exposes).
    pub fn with_padding_outer(mut self, padding: f64) -> ChartResult<Self> {
        if !padding.is_finite() || padding < 0.0 {
            return Err(ChartError::InvalidData(
                "band padding must be finite and non-negative".to_owned(),
            ));
        }
        self.padding_outer = padding;
        Ok(self)
    }

    pub fn with_padding_inner(mut self, padding: f64) -> ChartResult<Self> {
        if !(0.0..=1.0).contains(&padding) {
            return Err(ChartError::InvalidData(
                "band inner padding must be in [0, 1]".to_owned(),
            ));
        }
        self.padding_inner = padding;
        Ok(self)
    }

    fn layout(&self) -> (f64, f64) {
        let n = self.domain.len() as f64;
        let (lo, hi) = if self.range.1 < self.range.0 {
            (self.range.1, self.range.0)
        } else {
            self.range
        };
        let step = (hi - lo) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        let start = lo + (hi - lo - step * (n - self.padding_inner)) * self.align;
        (start, step)
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.layout().1
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    #[must_use]
    pub fn scale(&self, key: &str) -> Option<f64> {
        let position = self.domain.iter().position(|entry| entry == key)?;
        let index = if self.range.1 < self.range.0 {
            self.domain.len() - 1 - position
        } else {
            position
        };
        let (start, step) = self.layout();
        Some(start + step * index as f64)
    }
}

/// Any scale produced by [`create_scale_from_scale_type`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scale<T> {
    Continuous(ContinuousScale),
    Quantile(QuantileScale<T>),
    Quantize(QuantizeScale<T>),
    Threshold(ThresholdScale<T>),
    Ordinal(OrdinalScale<T>),
    Point(BandScale),
    Band(BandScale),
}

/// Creates an unconfigured scale for `scale_type`.
///
/// `BinLinear` and `Sequential` have no standalone scale object and yield `None`.
#[must_use]
pub fn create_scale_from_scale_type<T>(scale_type: ScaleType) -> Option<Scale<T>> {
    let continuous = |kind| Some(Scale::Continuous(ContinuousScale::new(kind)));
    match scale_type {
        ScaleType::Linear => continuous(ContinuousKind::Linear),
        ScaleType::Log => continuous(ContinuousKind::Log { base: 10.0 }),
        ScaleType::Pow => continuous(ContinuousKind::Pow { exponent: 1.0 }),
        ScaleType::Sqrt => continuous(ContinuousKind::Pow { exponent: 0.5 }),
        ScaleType::Time => continuous(ContinuousKind::Time),
        ScaleType::Utc => continuous(ContinuousKind::Utc),
        ScaleType::Quantile => Some(Scale::Quantile(QuantileScale {
            samples: Vec::new(),
            range: Vec::new(),
        })),
        ScaleType::Quantize => Some(Scale::Quantize(QuantizeScale {
            domain: (0.0, 1.0),
            range: Vec::new(),
        })),
        ScaleType::Threshold => Some(Scale::Threshold(ThresholdScale {
            thresholds: vec![0.5],
            range: Vec::new(),
        })),
        ScaleType::BinOrdinal | ScaleType::Ordinal => Some(Scale::Ordinal(OrdinalScale {
            domain: IndexMap::new(),
            range: Vec::new(),
        })),
        ScaleType::Point => Some(Scale::Point(BandScale::point())),
        ScaleType::Band => Some(Scale::Band(BandScale::band())),
        ScaleType::BinLinear | ScaleType::Sequential => None,
    }
}
