use h5vis::core::{GammaScale, ScaleGammaConfig};
use proptest::prelude::*;

fn scale_with(domain: (f64, f64), range: (f64, f64), exponent: f64, clamp: bool) -> GammaScale {
    GammaScale::from_config(
        ScaleGammaConfig::default()
            .with_domain(domain)
            .with_range(range)
            .with_exponent(exponent)
            .with_clamp(clamp),
    )
}

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn unit_exponent_behaves_linearly(
        d0 in -1_000_000.0f64..1_000_000.0,
        d_span in 1.0f64..1_000_000.0,
        r0 in -1_000.0f64..1_000.0,
        r_span in -1_000.0f64..1_000.0,
        descending in any::<bool>()
    ) {
        let (d0, d1) = if descending { (d0 + d_span, d0) } else { (d0, d0 + d_span) };
        let r1 = r0 + r_span;
        let scale = scale_with((d0, d1), (r0, r1), 1.0, false);

        prop_assert_eq!(scale.scale(d0), Some(r0));
        prop_assert_eq!(scale.scale(d1), Some(r1));
        let mid = scale.scale((d0 + d1) / 2.0).expect("finite input");
        prop_assert!(close(mid, (r0 + r1) / 2.0, 1e-6));
    }

    #[test]
    fn invert_round_trips_inside_domain(
        d0 in -10_000.0f64..10_000.0,
        d_span in 0.01f64..10_000.0,
        r_span in 1.0f64..10_000.0,
        exponent in 0.1f64..5.0,
        factor in 0.01f64..0.99
    ) {
        let d1 = d0 + d_span;
        let x = d0 + factor * d_span;
        let scale = scale_with((d0, d1), (0.0, r_span), exponent, false);

        let y = scale.scale(x).expect("finite input");
        let recovered = scale.invert(y);
        prop_assert!(close(recovered, x, 1e-7));
    }

    #[test]
    fn clamped_input_maps_like_nearest_bound(
        d0 in -1_000.0f64..1_000.0,
        d_span in 0.01f64..1_000.0,
        overshoot in 0.001f64..1_000.0,
        exponent in 0.1f64..5.0,
        descending in any::<bool>()
    ) {
        let (lo, hi) = (d0, d0 + d_span);
        let domain = if descending { (hi, lo) } else { (lo, hi) };
        let scale = scale_with(domain, (0.0, 10.0), exponent, true);

        prop_assert_eq!(scale.scale(hi + overshoot), scale.scale(hi));
        prop_assert_eq!(scale.scale(lo - overshoot), scale.scale(lo));
    }

    #[test]
    fn degenerate_domain_returns_range_midpoint(
        value in -1_000.0f64..1_000.0,
        input in -1_000_000.0f64..1_000_000.0,
        r0 in -100.0f64..100.0,
        r1 in -100.0f64..100.0
    ) {
        let scale = scale_with((value, value), (r0, r1), 1.0, false);
        let mapped = scale.scale(input).expect("finite input");

        prop_assert!(close(mapped, (r0 + r1) / 2.0, 1e-12));
    }
}
