use std::fmt;
use std::sync::Arc;

/// Custom interpolation between range bounds `a` and `b` at position `t`.
pub type InterpolateFn = Arc<dyn Fn(f64, f64, f64) -> f64 + Send + Sync + 'static>;

/// Strategy combining a normalized position with the output range bounds.
#[derive(Clone, Default)]
pub enum Interpolator {
    /// Continuous real-valued interpolation.
    #[default]
    Number,
    /// Interpolation rounded to the nearest integer, ties toward positive infinity.
    Round,
    Custom(InterpolateFn),
}

impl Interpolator {
    #[must_use]
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    #[must_use]
    pub fn interpolate(&self, a: f64, b: f64, t: f64) -> f64 {
        match self {
            Self::Number => lerp(a, b, t),
            Self::Round => round_half_up(lerp(a, b, t)),
            Self::Custom(f) => f(a, b, t),
        }
    }

    #[must_use]
    pub fn is_rounding(&self) -> bool {
        matches!(self, Self::Round)
    }
}

impl fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => f.write_str("Number"),
            Self::Round => f.write_str("Round"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

pub(crate) fn round_half_up(value: f64) -> f64 {
    if value - value.floor() == 0.5 {
        value.ceil()
    } else {
        value.round()
    }
}
