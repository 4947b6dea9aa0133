//! Data-domain helpers for color and axis scales.
//!
//! These compute the domain a visualization starts from (bounds of the
//! dataset, restricted to what the selected scale type can represent) and
//! widen it for colorbar headroom.

use serde::{Deserialize, Serialize};

use crate::error::{VisError, VisResult};

use super::gamma_scale::{GammaScale, ScaleGammaConfig};
use super::interpolate::lerp;

/// Ordered `(start, end)` pair; may be descending.
pub type Domain = (f64, f64);

// Smallest positive subnormal double.
const SMALLEST_POSITIVE: f64 = 5e-324;

/// Scale families a visualization can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    #[default]
    Linear,
    Log,
    #[serde(rename = "symlog")]
    SymLog,
    Sqrt,
    Gamma,
}

impl ScaleType {
    /// Smallest domain value the scale can represent.
    #[must_use]
    pub fn valid_min(self) -> f64 {
        match self {
            Self::Linear | Self::SymLog | Self::Gamma => f64::NEG_INFINITY,
            Self::Log => SMALLEST_POSITIVE,
            Self::Sqrt => 0.0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Log => "Log",
            Self::SymLog => "SymLog",
            Self::Sqrt => "Square root",
            Self::Gamma => "Gamma",
        }
    }

    /// Maps a normalized position back into `domain` for this scale family.
    ///
    /// Gamma uses its default exponent of `1` here, which is what a gamma
    /// scale built from just a domain and range does.
    fn invert_unit(self, domain: Domain, t: f64) -> f64 {
        match self {
            Self::Linear | Self::Gamma => {
                GammaScale::from_config(ScaleGammaConfig::default().with_domain(domain)).invert(t)
            }
            Self::Log => invert_transformed(domain, t, f64::log10, |v| 10f64.powf(v)),
            Self::SymLog => invert_transformed(domain, t, symlog, symexp),
            Self::Sqrt => invert_transformed(domain, t, signed_sqrt, signed_square),
        }
    }
}

/// Running extrema of a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    /// Smallest value `>= 0`, or `+inf` when there is none.
    pub positive_min: f64,
    /// Smallest value `> 0`, or `+inf` when there is none.
    pub strict_positive_min: f64,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            positive_min: f64::INFINITY,
            strict_positive_min: f64::INFINITY,
        }
    }

    fn include(self, value: f64) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
            positive_min: if value >= 0.0 {
                self.positive_min.min(value)
            } else {
                self.positive_min
            },
            strict_positive_min: if value > 0.0 {
                self.strict_positive_min.min(value)
            } else {
                self.strict_positive_min
            },
        }
    }
}

/// Computes bounds over the finite values, widened by per-value errors.
///
/// Values rejected by `ignore` are skipped. Returns `Ok(None)` when no finite
/// value remains.
pub fn bounds(
    values: &[f64],
    errors: Option<&[f64]>,
    ignore: Option<&dyn Fn(f64) -> bool>,
) -> VisResult<Option<Bounds>> {
    if let Some(errors) = errors {
        if errors.len() != values.len() {
            return Err(VisError::InvalidData(format!(
                "error array length {} does not match value array length {}",
                errors.len(),
                values.len()
            )));
        }
    }

    let mut acc = Bounds::empty();
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() || ignore.is_some_and(|ignore| ignore(value)) {
            continue;
        }
        acc = acc.include(value);
        if let Some(error) = errors.map(|errors| errors[index]) {
            if error != 0.0 && !error.is_nan() {
                acc = acc.include(value - error).include(value + error);
            }
        }
    }

    Ok(acc.min.is_finite().then_some(acc))
}

/// Restricts `bounds` to a domain the scale type can display.
///
/// Log scales start at the smallest strictly positive value when the data
/// crosses or touches zero, and have no valid domain for non-positive data.
/// Square-root scales start at the smallest non-negative value when the data
/// crosses zero.
#[must_use]
pub fn valid_domain_for_scale(bounds: Option<Bounds>, scale_type: ScaleType) -> Option<Domain> {
    let bounds = bounds?;
    let Bounds {
        min,
        max,
        positive_min,
        strict_positive_min,
    } = bounds;

    if scale_type == ScaleType::Log && min * max <= 0.0 {
        return strict_positive_min
            .is_finite()
            .then_some((strict_positive_min, max));
    }
    if scale_type == ScaleType::Sqrt && min * max < 0.0 {
        return Some((positive_min, max));
    }

    Some((min, max))
}

/// Bounds of `values` as a domain valid for `scale_type`.
pub fn domain_for_scale(
    values: &[f64],
    scale_type: ScaleType,
    errors: Option<&[f64]>,
) -> VisResult<Option<Domain>> {
    Ok(valid_domain_for_scale(
        bounds(values, errors, None)?,
        scale_type,
    ))
}

/// Widens `domain` by `extend_factor` of its extent on each side.
///
/// The extension is measured in the scale's own space, so a log domain grows
/// by decades rather than by raw value. A zero-width domain is widened
/// proportionally to its value. The lower bound never drops below the scale's
/// valid minimum.
pub fn extend_domain(domain: Domain, extend_factor: f64, scale_type: ScaleType) -> VisResult<Domain> {
    if extend_factor <= 0.0 {
        return Ok(domain);
    }

    let valid_min = scale_type.valid_min();
    if domain.0 < valid_min {
        return Err(VisError::InvalidData(format!(
            "expected domain compatible with {} scale",
            scale_type.label()
        )));
    }

    let extended = if domain.0 == domain.1 {
        extend_empty_domain(domain.0, extend_factor, scale_type)
    } else {
        (
            scale_type.invert_unit(domain, -extend_factor),
            scale_type.invert_unit(domain, 1.0 + extend_factor),
        )
    };

    Ok((valid_min.max(extended.0), extended.1))
}

fn extend_empty_domain(value: f64, extend_factor: f64, scale_type: ScaleType) -> Domain {
    if scale_type == ScaleType::Log {
        return (
            value * 10f64.powf(-extend_factor),
            value * 10f64.powf(extend_factor),
        );
    }
    if value == 0.0 {
        return (-1.0, 1.0);
    }

    let extension = value.abs() * extend_factor;
    (value - extension, value + extension)
}

/// Smallest domain containing every given domain.
#[must_use]
pub fn combined_domain(domains: &[Option<Domain>]) -> Option<Domain> {
    domains
        .iter()
        .flatten()
        .copied()
        .reduce(|acc, next| (acc.0.min(next.0), acc.1.max(next.1)))
}

fn invert_transformed(
    domain: Domain,
    t: f64,
    forward: impl Fn(f64) -> f64,
    inverse: impl Fn(f64) -> f64,
) -> f64 {
    inverse(lerp(forward(domain.0), forward(domain.1), t))
}

fn symlog(x: f64) -> f64 {
    x.signum() * x.abs().ln_1p()
}

fn symexp(x: f64) -> f64 {
    x.signum() * x.abs().exp_m1()
}

fn signed_sqrt(x: f64) -> f64 {
    if x < 0.0 { -(-x).sqrt() } else { x.sqrt() }
}

fn signed_square(x: f64) -> f64 {
    if x < 0.0 { -(x * x) } else { x * x }
}

#[cfg(test)]
mod tests {
    use super::{signed_sqrt, signed_square, symexp, symlog};

    #[test]
    fn transforms_round_trip() {
        for value in [-250.0, -1.5, 0.0, 0.25, 42.0] {
            assert!((symexp(symlog(value)) - value).abs() < 1e-9);
            assert!((signed_square(signed_sqrt(value)) - value).abs() < 1e-9);
        }
    }
}
