use h5vis::core::{FormatSpecifier, TickFormatter, precision_fixed, precision_round, ticks};

fn format_with(specifier: &str, value: f64) -> String {
    FormatSpecifier::parse(specifier)
        .expect("valid specifier")
        .formatter()
        .format(value)
}

#[test]
fn default_formatter_groups_thousands_and_derives_precision() {
    let formatter = TickFormatter::for_domain((0.0, 1.0), 5, None).expect("formatter");

    assert_eq!(formatter.specifier().to_string(), ",.1f");
    assert_eq!(formatter.format(0.4), "0.4");
    assert_eq!(formatter.format(1234.5), "1,234.5");
}

#[test]
fn labels_for_generated_ticks_are_distinct() {
    let formatter = TickFormatter::for_domain((0.0, 0.05), 10, None).expect("formatter");
    let labels: Vec<String> = ticks(0.0, 0.05, 10)
        .into_iter()
        .map(|tick| formatter.format(tick))
        .collect();

    assert_eq!(
        labels,
        vec!["0.000", "0.005", "0.010", "0.015", "0.020", "0.025", "0.030", "0.035", "0.040", "0.045", "0.050"]
    );
}

#[test]
fn negative_values_use_typographic_minus() {
    assert_eq!(format_with(".1f", -2.26), "\u{2212}2.3");
    assert_eq!(format_with("d", -7.0), "\u{2212}7");
}

#[test]
fn negative_zero_after_rounding_drops_sign() {
    assert_eq!(format_with(".1f", -0.04), "0.0");
    assert_eq!(format_with("+.1f", -0.04), "\u{2212}0.0");
    assert_eq!(format_with(".1f", -0.0), "0.0");
}

#[test]
fn sign_options_render_as_requested() {
    assert_eq!(format_with("+.1f", 2.0), "+2.0");
    assert_eq!(format_with(" .1f", 2.0), " 2.0");
    assert_eq!(format_with("(.1f", -2.5), "(2.5)");
    assert_eq!(format_with("(.1f", 2.5), "2.5");
}

#[test]
fn currency_and_grouping_combine() {
    assert_eq!(format_with("$,.2f", 1234.5), "$1,234.50");
    assert_eq!(format_with(",d", 1_234_567.0), "1,234,567");
}

#[test]
fn width_pads_with_spaces_or_zeros() {
    assert_eq!(format_with("8.2f", 3.5), "    3.50");
    assert_eq!(format_with("08.2f", -3.5), "\u{2212}0003.50");
    assert_eq!(format_with("010,d", 1234.0), "00,001,234");
}

#[test]
fn percent_exponent_and_significant_types() {
    assert_eq!(format_with(".0%", 0.256), "26%");
    assert_eq!(format_with(".2e", 12345.0), "1.23e+4");
    assert_eq!(format_with(".1e", 0.00042), "4.2e-4");
    assert_eq!(format_with(".3r", 0.012345), "0.0123");
    assert_eq!(format_with(".3r", 1234.0), "1230");
    assert_eq!(format_with("d", 1499.5), "1500");
}

#[test]
fn trim_removes_insignificant_zeros() {
    assert_eq!(format_with(".3~g", 0.5), "0.5");
    assert_eq!(format_with(".2~f", 2.0), "2");
    assert_eq!(format_with(".2~f", 2.10), "2.1");
}

#[test]
fn typeless_specifier_uses_twelve_significant_digits() {
    assert_eq!(format_with("", 0.1 + 0.2), "0.3");
    assert_eq!(format_with("", 1500.0), "1500");
    assert_eq!(format_with("", 1e-7), "1e-7");
}

#[test]
fn auto_precision_per_type() {
    let percent = TickFormatter::for_domain((0.0, 1.0), 10, Some("%")).expect("formatter");
    assert_eq!(percent.specifier().precision, Some(0));
    assert_eq!(percent.format(0.3), "30%");

    let exponent = TickFormatter::for_domain((0.0, 1000.0), 10, Some("e")).expect("formatter");
    assert_eq!(exponent.specifier().precision, Some(0));
    assert_eq!(exponent.format(300.0), "3e+2");

    let general = TickFormatter::for_domain((0.0, 1.0), 10, Some("r")).expect("formatter");
    assert_eq!(general.specifier().precision, Some(1));
    assert_eq!(general.format(0.3), "0.3");
}

#[test]
fn explicit_precision_overrides_auto_precision() {
    let formatter = TickFormatter::for_domain((0.0, 1.0), 5, Some(".3f")).expect("formatter");
    assert_eq!(formatter.format(0.5), "0.500");
}

#[test]
fn degenerate_domain_formats_integers() {
    let formatter = TickFormatter::for_domain((2.0, 2.0), 10, None).expect("formatter");
    assert_eq!(formatter.format(2.0), "2");
}

#[test]
fn non_finite_values_render_as_words() {
    assert_eq!(format_with(".1f", f64::NAN), "NaN");
    assert_eq!(format_with(".1f", f64::NEG_INFINITY), "\u{2212}Infinity");
}

#[test]
fn unsupported_specifiers_are_rejected() {
    for specifier in ["s", "x", ".f", ".2fx", "~~f"] {
        assert!(
            FormatSpecifier::parse(specifier).is_err(),
            "{specifier} should be rejected"
        );
    }
}

#[test]
fn precision_helpers_match_step_magnitude() {
    assert_eq!(precision_fixed(0.1), Some(1));
    assert_eq!(precision_fixed(10.0), Some(0));
    assert_eq!(precision_round(0.001, 1.01), Some(4));
    assert_eq!(precision_round(f64::NAN, 1.0), None);
}

#[test]
fn exact_ties_round_up() {
    assert_eq!(format_with(".0f", 2.5), "3");
    assert_eq!(format_with(".1f", 0.25), "0.3");
    assert_eq!(format_with(".0%", 0.125), "13%");
    assert_eq!(format_with(".1e", 2.25), "2.3e+0");
    assert_eq!(format_with(".2r", 0.0625), "0.063");
    assert_eq!(format_with(".2g", 1.25), "1.3");
    assert_eq!(format_with(".0f", 9.5), "10");
    assert_eq!(format_with("(.0f", -0.5), "(1)");
}

#[test]
fn values_just_below_a_tie_round_down() {
    // 1.005 and 9.95 are stored slightly below the written decimal.
    assert_eq!(format_with(".2f", 1.005), "1.00");
    assert_eq!(format_with(".1f", 9.95), "9.9");
}

#[test]
fn precision_is_clamped_per_type() {
    let fixed = FormatSpecifier::parse(".25f").expect("valid").formatter();
    assert_eq!(fixed.specifier().precision, Some(20));
    assert_eq!(fixed.format(1.0), format!("1.{}", "0".repeat(20)));

    let rounded = FormatSpecifier::parse(".0r").expect("valid").formatter();
    assert_eq!(rounded.specifier().precision, Some(1));
    assert_eq!(rounded.format(0.0123), "0.01");

    let general = FormatSpecifier::parse(".30g").expect("valid").formatter();
    assert_eq!(general.specifier().precision, Some(21));
}
