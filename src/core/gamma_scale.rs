use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{VisError, VisResult};

use super::Domain;
use super::interpolate::{Interpolator, lerp};
use super::power_scale::{PowerTicks, TickStrategy};
use super::tick_format::TickFormatter;

const DEFAULT_DOMAIN: Domain = (0.0, 1.0);
const DEFAULT_RANGE: Domain = (0.0, 1.0);
const DEFAULT_EXPONENT: f64 = 1.0;
const DEFAULT_TICK_COUNT: usize = 10;

/// Serializable construction options for [`GammaScale`].
///
/// Every field is optional; absent fields fall back to the scale defaults
/// (`[0, 1]` domain and range, exponent `1`, no clamping).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleGammaConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Domain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clamp: Option<bool>,
}

impl ScaleGammaConfig {
    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: Domain) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = Some(exponent);
        self
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = Some(clamp);
        self
    }

    pub fn from_json_str(input: &str) -> VisResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            VisError::InvalidConfig(format!("failed to parse gamma scale config: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> VisResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            VisError::InvalidConfig(format!("failed to serialize gamma scale config: {e}"))
        })
    }
}

/// Continuous power-law mapping from a data domain onto a display range.
///
/// Values are normalized into `[0, 1]` against the domain, raised to
/// `exponent`, then interpolated over the range. An exponent of `1` makes the
/// scale behave exactly like a linear scale; exponents below `1` expand the
/// low end of the domain, which is what heatmap color mapping uses to bring
/// out detail in dim regions.
///
/// Both domain and range may be descending. A zero-width domain maps every
/// value to the normalized midpoint instead of dividing by zero.
///
/// # Examples
///
/// ```rust
/// use h5vis::core::{GammaScale, ScaleGammaConfig};
///
/// let scale = GammaScale::from_config(
///     ScaleGammaConfig::default()
///         .with_domain((40.0, 50.0))
///         .with_range((0.0, 10.0))
///         .with_exponent(2.0),
/// );
///
/// assert_eq!(scale.scale(40.0), Some(0.0));
/// assert_eq!(scale.scale(50.0), Some(10.0));
/// assert!((scale.invert(0.4) - 42.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct GammaScale {
    domain: Domain,
    range: Domain,
    exponent: f64,
    clamp: bool,
    interpolator: Interpolator,
    tick_strategy: Arc<dyn TickStrategy>,
}

impl Default for GammaScale {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaScale {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(ScaleGammaConfig::default())
    }

    /// Creates a scale from optional settings.
    ///
    /// An explicit exponent is taken as-is, including `0`.
    #[must_use]
    pub fn from_config(config: ScaleGammaConfig) -> Self {
        Self {
            domain: config.domain.unwrap_or(DEFAULT_DOMAIN),
            range: config.range.unwrap_or(DEFAULT_RANGE),
            exponent: config.exponent.unwrap_or(DEFAULT_EXPONENT),
            clamp: config.clamp.unwrap_or(false),
            interpolator: Interpolator::default(),
            tick_strategy: Arc::new(PowerTicks),
        }
    }

    /// Replaces the strategy used by [`nice`](Self::nice), [`ticks`](Self::ticks)
    /// and [`tick_format`](Self::tick_format).
    #[must_use]
    pub fn with_tick_strategy(mut self, strategy: Arc<dyn TickStrategy>) -> Self {
        self.tick_strategy = strategy;
        self
    }

    /// Maps `x` from the domain onto the range.
    ///
    /// Returns `None` (the unknown value) for `NaN` input. Out-of-domain input
    /// is extrapolated unless clamping is enabled; with a non-integer exponent
    /// values below the domain start have no real power and map to `NaN`.
    #[must_use]
    pub fn scale(&self, x: f64) -> Option<f64> {
        if x.is_nan() {
            return self.unknown();
        }

        let t = normalize(self.domain, self.clamped(x)).powf(self.exponent);
        Some(self.interpolator.interpolate(self.range.0, self.range.1, t))
    }

    /// Maps `y` from the range back onto the domain.
    ///
    /// Inversion always uses continuous interpolation, even after
    /// [`set_range_round`](Self::set_range_round).
    #[must_use]
    pub fn invert(&self, y: f64) -> f64 {
        let t = normalize(self.range, y).powf(1.0 / self.exponent);
        self.clamped(lerp(self.domain.0, self.domain.1, t))
    }

    /// Applies [`scale`](Self::scale) to every value of a buffer.
    #[must_use]
    pub fn scale_slice(&self, values: &[f64]) -> Vec<Option<f64>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            return values.par_iter().map(|value| self.scale(*value)).collect();
        }

        #[cfg(not(feature = "parallel"))]
        {
            values.iter().map(|value| self.scale(*value)).collect()
        }
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn set_domain(&mut self, domain: Domain) -> &mut Self {
        self.domain = domain;
        self
    }

    #[must_use]
    pub fn range(&self) -> Domain {
        self.range
    }

    /// Replaces the range. Ends integer rounding started by
    /// [`set_range_round`](Self::set_range_round); custom interpolators are kept.
    pub fn set_range(&mut self, range: Domain) -> &mut Self {
        self.range = range;
        if self.interpolator.is_rounding() {
            self.interpolator = Interpolator::Number;
        }
        self
    }

    /// Same as [`range`](Self::range).
    #[must_use]
    pub fn range_round(&self) -> Domain {
        self.range
    }

    /// Replaces the range and switches to integer-rounding interpolation.
    pub fn set_range_round(&mut self, range: Domain) -> &mut Self {
        self.range = range;
        self.interpolator = Interpolator::Round;
        self
    }

    #[must_use]
    pub fn clamp(&self) -> bool {
        self.clamp
    }

    /// Enables clamping. `false` leaves the current setting untouched; build
    /// a new scale from a config to turn clamping off.
    pub fn set_clamp(&mut self, clamp: bool) -> &mut Self {
        if clamp {
            self.clamp = clamp;
        }
        self
    }

    #[must_use]
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Replaces the exponent. `0` and `NaN` are ignored.
    pub fn set_exponent(&mut self, exponent: f64) -> &mut Self {
        if exponent != 0.0 && !exponent.is_nan() {
            self.exponent = exponent;
        }
        self
    }

    #[must_use]
    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    pub fn set_interpolator(&mut self, interpolator: Interpolator) -> &mut Self {
        self.interpolator = interpolator;
        self
    }

    /// Output for non-numeric input. Always `None`.
    #[must_use]
    pub fn unknown(&self) -> Option<f64> {
        None
    }

    #[must_use]
    pub fn tick_strategy(&self) -> &Arc<dyn TickStrategy> {
        &self.tick_strategy
    }

    /// Extends the domain outward to round values suitable for axis labels.
    pub fn nice(&mut self, count: Option<usize>) -> &mut Self {
        let before = self.domain;
        self.domain = self
            .tick_strategy
            .nice(self.domain, count.unwrap_or(DEFAULT_TICK_COUNT));
        trace!(
            before_start = before.0,
            before_end = before.1,
            after_start = self.domain.0,
            after_end = self.domain.1,
            "nice gamma scale domain"
        );
        self
    }

    /// Nice tick values spanning the domain. Recomputed on every call.
    #[must_use]
    pub fn ticks(&self, count: Option<usize>) -> Vec<f64> {
        self.tick_strategy
            .ticks(self.domain, count.unwrap_or(DEFAULT_TICK_COUNT))
    }

    /// Label formatter for [`ticks`](Self::ticks) with the same `count`.
    ///
    /// Without a specifier, values get thousands separators and as many
    /// decimals as the tick step needs.
    pub fn tick_format(
        &self,
        count: Option<usize>,
        specifier: Option<&str>,
    ) -> VisResult<TickFormatter> {
        self.tick_strategy.tick_format(
            self.domain,
            count.unwrap_or(DEFAULT_TICK_COUNT),
            specifier,
        )
    }

    /// Returns an independent scale with the same domain, range, exponent,
    /// clamping, interpolator and tick strategy.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn clamped(&self, x: f64) -> f64 {
        if !self.clamp {
            return x;
        }
        let (d0, d1) = self.domain;
        x.min(d0.max(d1)).max(d0.min(d1))
    }
}

fn normalize((a, b): Domain, x: f64) -> f64 {
    let extent = b - a;
    if extent == 0.0 { 0.5 } else { (x - a) / extent }
}
