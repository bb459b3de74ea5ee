use chart_host::core::{AxisResolution, MeasuredBox, SizeSpec, resolve_size};
use proptest::prelude::*;

proptest! {
    #[test]
    fn absolute_sizes_resolve_exactly(
        width in 0.0f64..10_000.0,
        height in 0.0f64..10_000.0,
        box_width in 0.0f64..10_000.0,
        box_height in 0.0f64..10_000.0
    ) {
        let measured = MeasuredBox::new(box_width, box_height);
        for observed in [None, Some(measured)] {
            let resolution = resolve_size(
                Some(SizeSpec::Pixels(width)),
                Some(SizeSpec::Pixels(height)),
                observed,
            );
            prop_assert_eq!(resolution.width, AxisResolution::Fixed(width));
            prop_assert_eq!(resolution.height, AxisResolution::Fixed(height));
        }
    }

    #[test]
    fn percent_sizes_scale_the_measured_box(
        width_percent in 0.0f64..200.0,
        height_percent in 0.0f64..200.0,
        box_width in 0.0f64..10_000.0,
        box_height in 0.0f64..10_000.0
    ) {
        let resolution = resolve_size(
            Some(SizeSpec::Percent(width_percent)),
            Some(SizeSpec::Percent(height_percent)),
            Some(MeasuredBox::new(box_width, box_height)),
        );
        let size = resolution.resolved().expect("measured");

        prop_assert!((size.width - box_width * width_percent / 100.0).abs() <= 1e-9);
        prop_assert!((size.height - box_height * height_percent / 100.0).abs() <= 1e-9);
    }

    #[test]
    fn mixed_sizes_keep_the_absolute_axis(
        fixed in 0.0f64..5_000.0,
        percent in 0.0f64..100.0,
        box_width in 0.0f64..5_000.0,
        box_height in 0.0f64..5_000.0,
        width_is_fixed in any::<bool>()
    ) {
        let (width, height) = if width_is_fixed {
            (SizeSpec::Pixels(fixed), SizeSpec::Percent(percent))
        } else {
            (SizeSpec::Percent(percent), SizeSpec::Pixels(fixed))
        };
        let measured = MeasuredBox::new(box_width, box_height);
        let size = resolve_size(Some(width), Some(height), Some(measured))
            .resolved()
            .expect("measured");

        let (kept, relative, extent) = if width_is_fixed {
            (size.width, size.height, box_height)
        } else {
            (size.height, size.width, box_width)
        };
        prop_assert_eq!(kept, fixed);
        prop_assert!((relative - extent * percent / 100.0).abs() <= 1e-9);
    }

    #[test]
    fn size_strings_survive_display_and_parse(
        value in 0.0f64..100_000.0,
        relative in any::<bool>()
    ) {
        let spec = if relative { SizeSpec::Percent(value) } else { SizeSpec::Pixels(value) };
        let reparsed: SizeSpec = spec.to_string().parse().expect("reparse");
        prop_assert_eq!(reparsed, spec);
    }
}
