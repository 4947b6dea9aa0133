pub mod domain;
pub mod gamma_scale;
pub mod interpolate;
pub mod power_scale;
pub mod tick_format;
pub mod ticks;

pub use domain::{
    Bounds, Domain, ScaleType, bounds, combined_domain, domain_for_scale, extend_domain,
    valid_domain_for_scale,
};
pub use gamma_scale::{GammaScale, ScaleGammaConfig};
pub use interpolate::{InterpolateFn, Interpolator};
pub use power_scale::{IntegerTicks, PowerTicks, TickStrategy};
pub use tick_format::{
    FormatSign, FormatSpecifier, FormatType, TickFormatter, precision_fixed, precision_round,
};
pub use ticks::{integer_ticks, nice_domain, tick_increment, tick_step, ticks};
