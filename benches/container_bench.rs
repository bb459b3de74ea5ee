use chart_host::api::{ChartContainer, ChartContainerConfig, ChartPluginRegistry};
use chart_host::core::{MeasuredBox, SizeSpec, resolve_size};
use chart_host::extensions::{ChartPlugin, RenderRequest};
use chart_host::render::RenderNode;
use chart_host::ChartResult;
use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use std::time::{Duration, Instant};

fn sized_renderer(request: &RenderRequest) -> ChartResult<RenderNode> {
    Ok(RenderNode::new("div")
        .with_class("chart")
        .with_text(request.size.to_string()))
}

fn registry_with(count: usize) -> ChartPluginRegistry {
    let mut registry = ChartPluginRegistry::new();
    for i in 0..count {
        registry.register(
            ChartPlugin::builder(format!("chart-{i}"))
                .renderer(sized_renderer)
                .build()
                .expect("valid plugin"),
        );
    }
    registry
}

fn bench_resolve_size_mixed(c: &mut Criterion) {
    let measured = MeasuredBox::new(1920.0, 1080.0);

    c.bench_function("resolve_size_mixed", |b| {
        b.iter(|| {
            let _ = resolve_size(
                black_box(Some(SizeSpec::Percent(50.0))),
                black_box(Some(SizeSpec::Pixels(125.0))),
                black_box(Some(measured)),
            )
            .resolved();
        })
    });
}

fn bench_registry_lookup_1k(c: &mut Criterion) {
    let registry = registry_with(1_000);

    c.bench_function("registry_lookup_1k", |b| {
        b.iter(|| {
            let _ = registry.get(black_box("chart-777")).expect("registered");
        })
    });
}

fn bench_container_mount(c: &mut Criterion) {
    let registry = registry_with(16).into_shared();
    let config = ChartContainerConfig::new("chart-7")
        .with_width(SizeSpec::Pixels(640.0))
        .with_height(SizeSpec::Pixels(480.0))
        .with_form_data(json!({ "metric": "count" }));

    c.bench_function("container_mount_fixed", |b| {
        b.iter(|| {
            let mut container =
                ChartContainer::new(registry.clone(), config.clone()).expect("container");
            container.mount().expect("mount");
            black_box(container.view().is_chart());
        })
    });
}

fn bench_resize_burst_100(c: &mut Criterion) {
    let registry = registry_with(1).into_shared();
    let config = ChartContainerConfig::new("chart-0")
        .with_width(SizeSpec::Percent(100.0))
        .with_debounce_time(Duration::from_millis(16));

    c.bench_function("resize_burst_100", |b| {
        b.iter(|| {
            let mut container =
                ChartContainer::new(registry.clone(), config.clone()).expect("container");
            container.mount().expect("mount");
            let start = Instant::now();
            for i in 0..100u32 {
                let width = 400.0 + f64::from(i);
                container
                    .on_box_change(MeasuredBox::new(width, 300.0), start)
                    .expect("box change");
            }
            container
                .poll(start + Duration::from_millis(16))
                .expect("flush");
            black_box(container.dimension_text());
        })
    });
}

criterion_group!(
    benches,
    bench_resolve_size_mixed,
    bench_registry_lookup_1k,
    bench_container_mount,
    bench_resize_burst_100
);
criterion_main!(benches);
