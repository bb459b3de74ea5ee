pub mod axis;
pub mod scale;
pub mod size_resolver;
pub mod types;

pub use axis::{
    AxisConfig, AxisOrient, AxisTitle, AxisValues, LabelFlush, LabelOverlapStrategy,
    XAxisConfig, XAxisSetting, YAxisConfig,
};
pub use scale::{
    BandScale, ContinuousKind, ContinuousScale, OrdinalScale, QuantileScale, QuantizeScale, Scale,
    ScaleType, ThresholdScale, create_scale_from_scale_type,
};
pub use size_resolver::{
    Axis, AxisResolution, DEFAULT_HEIGHT, DEFAULT_WIDTH, SizeResolution, requires_observation,
    resolve_axis, resolve_size,
};
pub use types::{MeasuredBox, ResolvedSize, SizeSpec};
