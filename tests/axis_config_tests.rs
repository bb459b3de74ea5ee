use chart_host::core::{
    AxisConfig, AxisOrient, AxisTitle, AxisValues, LabelFlush, LabelOverlapStrategy, XAxisConfig,
    XAxisSetting, YAxisConfig,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

#[test]
fn x_axis_reads_vega_lite_field_names() {
    let axis: XAxisConfig = serde_json::from_value(json!({
        "format": ".2f",
        "labelAngle": 45,
        "labelFlush": 4,
        "labelOverlap": "rotate",
        "orient": "top",
        "tickCount": 5,
        "title": "Revenue",
        "values": [1, 2, 3]
    }))
    .expect("x axis");

    assert_eq!(axis.orient(), AxisOrient::Top);
    let config = axis.config();
    assert_eq!(config.format.as_deref(), Some(".2f"));
    assert_eq!(config.label_angle, Some(45.0));
    assert_eq!(config.label_flush.and_then(LabelFlush::offset_px), Some(4.0));
    assert_eq!(config.label_overlap, Some(LabelOverlapStrategy::Rotate));
    assert_eq!(config.tick_count, Some(5));
    assert_eq!(config.title, Some(AxisTitle::Text("Revenue".to_owned())));
    assert_eq!(config.values, Some(AxisValues::Numbers(vec![1.0, 2.0, 3.0])));
}

#[test]
fn axis_values_read_instants_and_fall_back_to_text() {
    let temporal: XAxisConfig = serde_json::from_value(json!({
        "values": ["2024-01-01T00:00:00Z", "2024-07-01T12:30:00+02:00"]
    }))
    .expect("temporal axis");
    let expected = vec![
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("instant"),
        Utc.with_ymd_and_hms(2024, 7, 1, 10, 30, 0).single().expect("instant"),
    ];
    assert_eq!(temporal.config().values, Some(AxisValues::DateTimes(expected)));

    let labels: XAxisConfig =
        serde_json::from_value(json!({ "values": ["Q1", "Q2"] })).expect("text axis");
    assert_eq!(
        labels.config().values,
        Some(AxisValues::Texts(vec!["Q1".to_owned(), "Q2".to_owned()]))
    );

    let flags: XAxisConfig =
        serde_json::from_value(json!({ "values": [true, false] })).expect("flag axis");
    assert_eq!(flags.config().values, Some(AxisValues::Flags(vec![true, false])));
}

#[test]
fn orientation_defaults_per_axis() {
    assert_eq!(XAxisConfig::default().orient(), AxisOrient::Bottom);
    assert_eq!(YAxisConfig::default().orient(), AxisOrient::Left);
    assert_eq!(LabelOverlapStrategy::default(), LabelOverlapStrategy::Auto);
}

#[test]
fn axes_reject_orientation_of_the_other_direction() {
    let vertical = AxisConfig {
        orient: Some(AxisOrient::Left),
        ..AxisConfig::default()
    };
    assert!(XAxisConfig::new(vertical.clone()).is_err());
    assert!(YAxisConfig::new(vertical).is_ok());

    let err = serde_json::from_value::<YAxisConfig>(json!({ "orient": "bottom" }))
        .expect_err("bottom y axis");
    assert!(err.to_string().contains("left"));
}

#[test]
fn y_axis_labels_are_never_rotated() {
    assert!(serde_json::from_value::<YAxisConfig>(json!({ "labelAngle": 30 })).is_err());
    assert!(serde_json::from_value::<YAxisConfig>(json!({ "labelOverlap": "rotate" })).is_err());
    let flat = json!({ "labelAngle": 0, "labelOverlap": "flat" });
    assert!(serde_json::from_value::<YAxisConfig>(flat).is_ok());
}

#[test]
fn label_flush_accepts_bool_or_offset() {
    assert_eq!(LabelFlush::Enabled(false).offset_px(), None);
    assert_eq!(LabelFlush::Enabled(true).offset_px(), Some(0.0));
    let parsed: LabelFlush = serde_json::from_value(json!(true)).expect("bool flush");
    assert_eq!(parsed, LabelFlush::Enabled(true));
}

#[test]
fn x_axis_setting_can_hide_the_axis() {
    let hidden: XAxisSetting = serde_json::from_value(json!(false)).expect("flag");
    assert!(hidden.resolve().is_none());

    let shown: XAxisSetting = serde_json::from_value(json!(true)).expect("flag");
    assert_eq!(shown.resolve(), Some(XAxisConfig::default()));

    let configured: XAxisSetting =
        serde_json::from_value(json!({ "title": false, "tickCount": 3 })).expect("config");
    let axis = configured.resolve().expect("visible axis");
    assert_eq!(axis.config().title, Some(AxisTitle::Visible(false)));
    assert_eq!(axis.config().tick_count, Some(3));
}

#[test]
fn unset_fields_are_not_serialized() {
    let axis = XAxisConfig::new(AxisConfig {
        tick_count: Some(4),
        ..AxisConfig::default()
    })
    .expect("axis");
    assert_eq!(serde_json::to_value(&axis).expect("serialize"), json!({ "tickCount": 4 }));
}
