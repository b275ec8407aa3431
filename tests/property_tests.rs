/// Property-based tests using proptest
/// Tests invariants of input gating and radar geometry for all inputs
use footprint_lens::models::FootprintMetrics;
use footprint_lens::radar::{canvas_size, render, RadarGeometry, AXES, MAX_CANVAS_SIZE};
use footprint_lens::validation::{check_input, MIN_CHAR_COUNT, SOFT_MAX_CHAR_COUNT};
use proptest::prelude::*;

fn metrics_strategy() -> impl Strategy<Value = FootprintMetrics> {
    (0.0..=100.0f64, 0.0..=100.0f64, 0.0..=100.0f64, 0.0..=100.0f64).prop_map(|(p, s, a, r)| {
        FootprintMetrics {
            professional_density: p,
            social_connectivity: s,
            activity_frequency: a,
            privacy_resilience: r,
        }
    })
}

// Property: input gating
proptest! {
    #[test]
    fn validation_never_panics(text in "\\PC*") {
        let _ = check_input(&text);
    }

    #[test]
    fn short_inputs_are_blocked_with_counts(text in "[a-zA-Z ]{1,39}") {
        let check = check_input(&text);
        prop_assert!(!check.permits_analysis());
        if let Some(warning) = check.warning {
            let expected = format!("({}/{} chars)", text.chars().count(), MIN_CHAR_COUNT);
            prop_assert!(warning.is_blocking());
            prop_assert!(warning.message().contains(&expected));
        } else {
            // Only possible when the text is blank, which blocks on its own
            prop_assert!(check.is_blank);
        }
    }

    #[test]
    fn long_inputs_stay_enabled(extra in 0usize..500, c in "[a-z]") {
        let text = c.repeat(SOFT_MAX_CHAR_COUNT + extra);
        let check = check_input(&text);
        prop_assert!(check.permits_analysis());
        prop_assert!(!check.warning.unwrap().is_blocking());
    }
}

// Property: radar geometry
proptest! {
    #[test]
    fn distance_is_monotonic_per_axis(
        base in metrics_strategy(),
        axis in 0usize..4,
        a in 0.0..=100.0f64,
        b in 0.0..=100.0f64,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let with = |v: f64| {
            let mut m = base;
            match axis {
                0 => m.professional_density = v,
                1 => m.social_connectivity = v,
                2 => m.activity_frequency = v,
                _ => m.privacy_resilience = v,
            }
            RadarGeometry::new(&m, 400).axes[axis].point.distance_from_center()
        };
        prop_assert!(with(lo) <= with(hi) + 1e-9);
    }

    #[test]
    fn points_never_leave_outer_ring(
        p in -1000.0..1000.0f64,
        s in -1000.0..1000.0f64,
        a in -1000.0..1000.0f64,
        r in -1000.0..1000.0f64,
        width in 0u32..2000,
    ) {
        let m = FootprintMetrics {
            professional_density: p,
            social_connectivity: s,
            activity_frequency: a,
            privacy_resilience: r,
        };
        let g = RadarGeometry::new(&m, canvas_size(width));
        for point in g.data_points() {
            prop_assert!(point.distance_from_center() <= g.radius + 1e-9);
        }
    }

    #[test]
    fn resize_preserves_axis_order_and_ratios(
        m in metrics_strategy(),
        w1 in 200u32..2000,
        w2 in 200u32..2000,
    ) {
        let g1 = RadarGeometry::new(&m, canvas_size(w1));
        let g2 = RadarGeometry::new(&m, canvas_size(w2));
        let labels1: Vec<&str> = g1.axes.iter().map(|x| x.label).collect();
        let labels2: Vec<&str> = g2.axes.iter().map(|x| x.label).collect();
        prop_assert_eq!(&labels1, &AXES.to_vec());
        prop_assert_eq!(labels1, labels2);

        for (x, y) in g1.axes.iter().zip(&g2.axes) {
            prop_assert!((x.angle - y.angle).abs() < 1e-12);
            // Relative position within the radius is size independent
            if g1.radius > 0.0 && g2.radius > 0.0 {
                let r1 = x.point.distance_from_center() / g1.radius;
                let r2 = y.point.distance_from_center() / g2.radius;
                prop_assert!((r1 - r2).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn canvas_never_exceeds_cap(width in 0u32..100_000) {
        prop_assert!(canvas_size(width) <= MAX_CANVAS_SIZE);
    }

    #[test]
    fn render_is_deterministic(m in metrics_strategy(), width in 0u32..1000) {
        let size = canvas_size(width);
        prop_assert_eq!(render(&m, "#fbbf24", size), render(&m, "#fbbf24", size));
    }
}
