//! Nice-number tick generation.
//!
//! These helpers follow the step selection used by d3-array so that tick
//! values, nice domains, and auto-selected label precision line up with what
//! browser-side visualizations render for the same domain.

use super::Domain;

const DEFAULT_TICK_COUNT: usize = 10;
const NICE_MAX_ITERATIONS: usize = 10;

// sqrt(50), sqrt(10), sqrt(2): thresholds between 1-2-5-10 step factors.
const STEP_FACTOR_10: f64 = 7.071_067_811_865_475;
const STEP_FACTOR_5: f64 = 3.162_277_660_168_379_5;
const STEP_FACTOR_2: f64 = 1.414_213_562_373_095_1;

/// Integer tick indices plus increment.
///
/// A negative `inc` encodes a fractional step of `1 / -inc`; keeping the
/// reciprocal avoids accumulating error for steps like `0.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TickSpec {
    pub(crate) i1: f64,
    pub(crate) i2: f64,
    pub(crate) inc: f64,
}

pub(crate) fn tick_spec(start: f64, stop: f64, count: f64) -> TickSpec {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= STEP_FACTOR_10 {
        10.0
    } else if error >= STEP_FACTOR_5 {
        5.0
    } else if error >= STEP_FACTOR_2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let reciprocal = 10f64.powf(-power) / factor;
        i1 = (start * reciprocal).round();
        i2 = (stop * reciprocal).round();
        if i1 / reciprocal < start {
            i1 += 1.0;
        }
        if i2 / reciprocal > stop {
            i2 -= 1.0;
        }
        inc = -reciprocal;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }

    TickSpec { i1, i2, inc }
}

/// Returns up to roughly `count` evenly spaced nice values covering `[start, stop]`.
///
/// Values are emitted in the direction of the input: a descending pair yields
/// descending ticks. Every value lies inside the closed interval.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let spec = if reverse {
        tick_spec(stop, start, count as f64)
    } else {
        tick_spec(start, stop, count as f64)
    };
    if !(spec.i2 >= spec.i1) {
        return Vec::new();
    }

    let n = (spec.i2 - spec.i1) as usize + 1;
    let value_at = |index: f64| {
        if spec.inc < 0.0 {
            index / -spec.inc
        } else {
            index * spec.inc
        }
    };

    if reverse {
        (0..n).map(|i| value_at(spec.i2 - i as f64)).collect()
    } else {
        (0..n).map(|i| value_at(spec.i1 + i as f64)).collect()
    }
}

/// Raw increment for the given span; negative values are reciprocals of the step.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).inc
}

/// Signed tick step between consecutive values of [`ticks`].
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -step } else { step }
}

/// Extends `domain` outward so both bounds land on multiples of the tick step.
///
/// The direction of the domain is preserved. The step is recomputed after each
/// widening until it stabilises, matching how linear and power scales nice
/// their domains.
#[must_use]
pub fn nice_domain(domain: Domain, count: Option<usize>) -> Domain {
    let count = count.unwrap_or(DEFAULT_TICK_COUNT);
    let reversed = domain.1 < domain.0;
    let (mut start, mut stop) = if reversed {
        (domain.1, domain.0)
    } else {
        domain
    };

    let mut previous_step = None;
    for _ in 0..NICE_MAX_ITERATIONS {
        let step = tick_increment(start, stop, count);
        if previous_step == Some(step) {
            return if reversed { (stop, start) } else { (start, stop) };
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        previous_step = Some(step);
    }

    domain
}

/// Integer-only ticks with a step of at least one.
///
/// Plain [`ticks`] may pick fractional steps on short integer spans (two units
/// split into three ticks yields `0.5`), which is wrong for index axes.
#[must_use]
pub fn integer_ticks(domain: Domain, count: usize) -> Vec<f64> {
    let min = domain.0.min(domain.1);
    let max = domain.0.max(domain.1);
    let int_min = min.ceil();
    let int_max = max.floor();

    let domain_length = int_max - int_min + 1.0;
    if !domain_length.is_finite() || domain_length <= 0.0 {
        return Vec::new();
    }
    let optimal_count = (domain_length as usize).min(count);
    if optimal_count == 0 {
        return Vec::new();
    }

    let step = tick_step(int_min, int_max, optimal_count).max(1.0);
    let start = (min / step).ceil();
    let stop = (max / step).floor();
    if stop < start {
        return Vec::new();
    }

    let n = (stop - start) as usize + 1;
    (0..n).map(|i| (start + i as f64) * step).collect()
}
