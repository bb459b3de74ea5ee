use std::cell::Cell;
use std::rc::Rc;

use chart_host::{ChartError, ChartResult};
use chart_host::api::{ChartPluginRegistry, shared_registry};
use chart_host::extensions::{ChartMetadata, ChartPlugin, FormData, RenderRequest};
use chart_host::render::RenderNode;
use serde_json::json;

fn labelled_plugin(key: &str, label: &'static str) -> ChartPlugin {
    ChartPlugin::builder(key)
        .renderer(move |_request: &RenderRequest| -> ChartResult<RenderNode> {
            Ok(RenderNode::new("div").with_text(label))
        })
        .build()
        .expect("valid plugin")
}

fn empty_renderer(_request: &RenderRequest) -> ChartResult<RenderNode> {
    Ok(RenderNode::new("div"))
}

fn render_label(registry: &ChartPluginRegistry, key: &str) -> String {
    let plugin = registry.get(key).expect("registered plugin");
    let request = RenderRequest {
        chart_type: key.to_owned(),
        props: json!({}),
        size: chart_host::core::ResolvedSize::new(10.0, 10.0),
        failures: chart_host::render::FailureReporter::detached(key),
    };
    plugin.render(&request).expect("render").text_content()
}

#[test]
fn registered_plugin_is_resolvable_by_key() {
    let mut registry = ChartPluginRegistry::new();
    assert!(registry.register(labelled_plugin("line", "line chart")).is_none());

    assert!(registry.has("line"));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("line").expect("line").key(), "line");
    assert_eq!(render_label(&registry, "line"), "line chart");
}

#[test]
fn keys_are_case_sensitive() {
    let mut registry = ChartPluginRegistry::new();
    registry.register(labelled_plugin("Line", "upper"));

    assert!(registry.has("Line"));
    assert!(!registry.has("line"));
    let err = registry.get("line").expect_err("lowercase key must be absent");
    assert_eq!(err, ChartError::NotFound("line".to_owned()));
}

#[test]
fn re_registering_a_key_keeps_only_the_latest_descriptor() {
    let mut registry = ChartPluginRegistry::new();
    registry.register(labelled_plugin("bar", "first"));
    let replaced = registry
        .register(labelled_plugin("bar", "second"))
        .expect("first descriptor is handed back");

    assert_eq!(replaced.key(), "bar");
    assert_eq!(registry.len(), 1);
    assert_eq!(render_label(&registry, "bar"), "second");
}

#[test]
fn repeated_identical_registration_is_idempotent() {
    let mut registry = ChartPluginRegistry::new();
    let plugin = labelled_plugin("pie", "pie");
    registry.register(plugin.clone());
    registry.register(plugin.clone());
    registry.register(plugin);

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["pie"]);
}

#[test]
fn unregister_removes_lookups_and_tolerates_absent_keys() {
    let mut registry = ChartPluginRegistry::new();
    registry.register(labelled_plugin("to-remove", "x"));

    assert!(registry.unregister("to-remove").is_some());
    assert!(!registry.has("to-remove"));
    assert!(registry.is_empty());
    assert!(matches!(
        registry.get("to-remove"),
        Err(ChartError::NotFound(key)) if key == "to-remove"
    ));

    assert!(registry.unregister("to-remove").is_none());
    assert!(registry.unregister("never-registered").is_none());
}

#[test]
fn builder_rejects_missing_renderer_and_bad_keys() {
    let err = ChartPlugin::builder("no-renderer")
        .build()
        .expect_err("renderer is required");
    assert!(matches!(err, ChartError::InvalidPlugin(_)));

    let err = ChartPlugin::builder("")
        .renderer(empty_renderer)
        .build()
        .expect_err("empty key must fail");
    assert!(format!("{err}").contains("must not be empty"));

    let err = ChartPlugin::builder(" padded ")
        .renderer(empty_renderer)
        .build()
        .expect_err("padded key must fail");
    assert!(format!("{err}").contains("whitespace"));
}

#[test]
fn metadata_name_defaults_to_key_and_tags_are_queryable() {
    let mut registry = ChartPluginRegistry::new();
    registry.register(
        ChartPlugin::builder("word-cloud")
            .renderer(empty_renderer)
            .metadata(ChartMetadata::default().with_tag("text").with_thumbnail("cloud.png"))
            .build()
            .expect("valid plugin"),
    );
    registry.register(
        ChartPlugin::builder("sunburst")
            .renderer(empty_renderer)
            .metadata(ChartMetadata::new("Sunburst").with_tag("hierarchy"))
            .build()
            .expect("valid plugin"),
    );

    let metadata = registry.metadata("word-cloud").expect("metadata");
    assert_eq!(metadata.name, "word-cloud");
    assert_eq!(metadata.thumbnail.as_deref(), Some("cloud.png"));
    assert_eq!(registry.keys_with_tag("hierarchy"), vec!["sunburst"]);
    assert!(registry.keys_with_tag("geo").is_empty());
    assert!(registry.metadata("missing").is_err());
}

#[test]
fn with_key_registers_the_same_plugin_under_another_key() {
    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    let plugin = ChartPlugin::builder("base")
        .renderer(move |_request: &RenderRequest| -> ChartResult<RenderNode> {
            counter.set(counter.get() + 1);
            Ok(RenderNode::new("div"))
        })
        .build()
        .expect("valid plugin");

    let mut registry = ChartPluginRegistry::new();
    registry.register(plugin.clone().with_key("alias").expect("valid key"));
    registry.register(plugin);
    render_label(&registry, "alias");
    render_label(&registry, "base");

    assert_eq!(calls.get(), 2);
    assert!(ChartPlugin::builder("x")
        .renderer(empty_renderer)
        .build()
        .expect("valid plugin")
        .with_key("")
        .is_err());
}

#[test]
fn transform_defaults_to_identity() {
    let identity = labelled_plugin("identity", "id");
    let form_data: FormData = json!({ "abc": 1 });
    assert!(!identity.has_transform());
    assert_eq!(identity.transform(&form_data).expect("identity"), form_data);

    let doubled = ChartPlugin::builder("doubled")
        .renderer(empty_renderer)
        .transform(|form_data: &FormData| -> ChartResult<FormData> {
            let value = form_data["abc"].as_i64().unwrap_or_default();
            Ok(json!({ "abc": value * 2 }))
        })
        .build()
        .expect("valid plugin");
    assert_eq!(
        doubled.transform(&form_data).expect("transform"),
        json!({ "abc": 2 })
    );
}

#[test]
fn shared_registry_is_one_instance_per_thread() {
    let first = shared_registry();
    let second = shared_registry();
    first.borrow_mut().register(labelled_plugin("shared-probe", "probe"));

    assert!(second.borrow().has("shared-probe"));
    second.borrow_mut().unregister("shared-probe");
    assert!(!first.borrow().has("shared-probe"));
}
