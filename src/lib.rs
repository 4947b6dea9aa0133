//! h5vis: numeric core of a hierarchical scientific-data viewer.
//!
//! Two independent building blocks live here:
//!
//! - [`core`]: the gamma (power-law) scale used for heatmap color mapping,
//!   with nice-domain rounding, tick generation and tick label formatting,
//!   plus the domain helpers visualizations build on it.
//! - [`fetch`]: a keyed asynchronous cache that runs at most one fetch per
//!   logically-equal input, with cancellation, presetting and eviction.

pub mod core;
pub mod error;
pub mod fetch;
pub mod telemetry;

pub use crate::core::{GammaScale, ScaleGammaConfig};
pub use error::{FetchError, VisError, VisResult};
pub use fetch::{FetchState, FetchStore};
