use approx::{assert_abs_diff_eq, assert_relative_eq};
use h5vis::core::{
    Bounds, ScaleType, bounds, combined_domain, domain_for_scale, extend_domain,
    valid_domain_for_scale,
};

#[test]
fn bounds_skip_non_finite_values() {
    let bounds = bounds(&[3.0, f64::NAN, -2.0, f64::INFINITY, 5.0], None, None)
        .expect("valid input")
        .expect("finite values");

    assert_eq!(
        bounds,
        Bounds {
            min: -2.0,
            max: 5.0,
            positive_min: 3.0,
            strict_positive_min: 3.0,
        }
    );
}

#[test]
fn bounds_track_zero_separately_from_strictly_positive() {
    let bounds = bounds(&[0.0, 4.0, -1.0], None, None)
        .expect("valid input")
        .expect("finite values");

    assert_eq!(bounds.positive_min, 0.0);
    assert_eq!(bounds.strict_positive_min, 4.0);
}

#[test]
fn bounds_widen_by_errors() {
    let bounds = bounds(&[1.0, 2.0], Some(&[0.5, 3.0]), None)
        .expect("valid input")
        .expect("finite values");

    assert_eq!(bounds.min, -1.0);
    assert_eq!(bounds.max, 5.0);
    assert_eq!(bounds.positive_min, 0.5);
}

#[test]
fn bounds_reject_mismatched_errors() {
    assert!(bounds(&[1.0, 2.0], Some(&[0.5]), None).is_err());
}

#[test]
fn bounds_apply_ignore_predicate() {
    let skip_negative: &dyn Fn(f64) -> bool = &|value| value < 0.0;
    let bounds = bounds(&[-8.0, 2.0, 6.0], None, Some(skip_negative))
        .expect("valid input")
        .expect("finite values");

    assert_eq!((bounds.min, bounds.max), (2.0, 6.0));
}

#[test]
fn bounds_of_non_finite_data_are_none() {
    assert_eq!(
        bounds(&[f64::NAN, f64::NEG_INFINITY], None, None).expect("valid input"),
        None
    );
    assert_eq!(bounds(&[], None, None).expect("valid input"), None);
}

#[test]
fn log_domain_starts_at_smallest_positive_value() {
    assert_eq!(
        domain_for_scale(&[-2.0, 3.0, 5.0], ScaleType::Log, None).expect("valid input"),
        Some((3.0, 5.0))
    );
    assert_eq!(
        domain_for_scale(&[1.0, 5.0], ScaleType::Log, None).expect("valid input"),
        Some((1.0, 5.0))
    );
    assert_eq!(
        domain_for_scale(&[-3.0, 0.0], ScaleType::Log, None).expect("valid input"),
        None
    );
}

#[test]
fn sqrt_domain_starts_at_smallest_non_negative_value() {
    assert_eq!(
        domain_for_scale(&[-2.0, 0.0, 5.0], ScaleType::Sqrt, None).expect("valid input"),
        Some((0.0, 5.0))
    );
    assert_eq!(
        domain_for_scale(&[-2.0, 3.0, 5.0], ScaleType::Sqrt, None).expect("valid input"),
        Some((3.0, 5.0))
    );
}

#[test]
fn linear_and_gamma_domains_keep_full_bounds() {
    let data = bounds(&[-2.0, 3.0, 5.0], None, None).expect("valid input");

    assert_eq!(valid_domain_for_scale(data, ScaleType::Linear), Some((-2.0, 5.0)));
    assert_eq!(valid_domain_for_scale(data, ScaleType::Gamma), Some((-2.0, 5.0)));
    assert_eq!(valid_domain_for_scale(None, ScaleType::Linear), None);
}

#[test]
fn extend_linear_domain_by_fraction_of_extent() {
    let (min, max) = extend_domain((0.0, 10.0), 0.1, ScaleType::Linear).expect("extended");

    assert_abs_diff_eq!(min, -1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(max, 11.0, epsilon = 1e-9);
}

#[test]
fn extend_gamma_domain_matches_linear() {
    assert_eq!(
        extend_domain((2.0, 6.0), 0.25, ScaleType::Gamma).expect("extended"),
        extend_domain((2.0, 6.0), 0.25, ScaleType::Linear).expect("extended"),
    );
}

#[test]
fn extend_sqrt_domain_clamps_at_zero() {
    let (min, max) = extend_domain((0.0, 100.0), 0.1, ScaleType::Sqrt).expect("extended");

    assert_eq!(min, 0.0);
    assert_abs_diff_eq!(max, 121.0, epsilon = 1e-9);
}

#[test]
fn extend_log_domain_by_decades() {
    let (min, max) = extend_domain((1.0, 1000.0), 0.5, ScaleType::Log).expect("extended");

    assert_relative_eq!(min, 10f64.powf(-1.5), max_relative = 1e-9);
    assert_relative_eq!(max, 10f64.powf(4.5), max_relative = 1e-9);
}

#[test]
fn extend_symlog_domain_grows_past_linear_extension() {
    let (min, max) = extend_domain((0.0, 10.0), 0.1, ScaleType::SymLog).expect("extended");

    assert!(min < 0.0 && min > -1.0);
    assert!(max > 11.0);
}

#[test]
fn extend_empty_domain_proportionally() {
    assert_eq!(
        extend_domain((5.0, 5.0), 0.1, ScaleType::Linear).expect("extended"),
        (4.5, 5.5)
    );
    assert_eq!(
        extend_domain((-4.0, -4.0), 0.5, ScaleType::Linear).expect("extended"),
        (-6.0, -2.0)
    );
    assert_eq!(
        extend_domain((0.0, 0.0), 0.1, ScaleType::Gamma).expect("extended"),
        (-1.0, 1.0)
    );

    let (min, max) = extend_domain((10.0, 10.0), 1.0, ScaleType::Log).expect("extended");
    assert_relative_eq!(min, 1.0, max_relative = 1e-12);
    assert_relative_eq!(max, 100.0, max_relative = 1e-12);
}

#[test]
fn extend_with_non_positive_factor_is_identity() {
    assert_eq!(
        extend_domain((1.0, 2.0), 0.0, ScaleType::Log).expect("unchanged"),
        (1.0, 2.0)
    );
}

#[test]
fn extend_rejects_domain_below_valid_minimum() {
    assert!(extend_domain((0.0, 10.0), 0.1, ScaleType::Log).is_err());
    assert!(extend_domain((-1.0, 10.0), 0.1, ScaleType::Sqrt).is_err());
}

#[test]
fn combined_domain_spans_every_domain() {
    assert_eq!(
        combined_domain(&[Some((0.0, 5.0)), None, Some((-2.0, 3.0))]),
        Some((-2.0, 5.0))
    );
    assert_eq!(combined_domain(&[None, None]), None);
}

#[test]
fn scale_type_metadata() {
    assert_eq!(ScaleType::Log.valid_min(), 5e-324);
    assert_eq!(ScaleType::Sqrt.valid_min(), 0.0);
    assert_eq!(ScaleType::Gamma.valid_min(), f64::NEG_INFINITY);
    assert_eq!(ScaleType::Sqrt.label(), "Square root");
    assert_eq!(
        serde_json::to_string(&ScaleType::SymLog).expect("serialize"),
        "\"symlog\""
    );
    assert_eq!(
        serde_json::from_str::<ScaleType>("\"gamma\"").expect("deserialize"),
        ScaleType::Gamma
    );
}
