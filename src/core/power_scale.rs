use std::fmt;

use crate::error::VisResult;

use super::Domain;
use super::tick_format::TickFormatter;
use super::ticks::{integer_ticks, nice_domain, ticks};

/// Domain analysis used by continuous scales for axis labelling.
///
/// Gamma scales warp the normalized position rather than the domain values,
/// so nice bounds, tick values, and label precision only depend on the
/// domain itself. Implementations receive the current domain on every call
/// and keep no state of their own.
pub trait TickStrategy: fmt::Debug + Send + Sync {
    fn nice(&self, domain: Domain, count: usize) -> Domain;

    fn ticks(&self, domain: Domain, count: usize) -> Vec<f64>;

    fn tick_format(
        &self,
        domain: Domain,
        count: usize,
        specifier: Option<&str>,
    ) -> VisResult<TickFormatter>;
}

/// Power-scale behaviour: 1-2-5 nice steps over the raw domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PowerTicks;

impl TickStrategy for PowerTicks {
    fn nice(&self, domain: Domain, count: usize) -> Domain {
        nice_domain(domain, Some(count))
    }

    fn ticks(&self, domain: Domain, count: usize) -> Vec<f64> {
        ticks(domain.0, domain.1, count)
    }

    fn tick_format(
        &self,
        domain: Domain,
        count: usize,
        specifier: Option<&str>,
    ) -> VisResult<TickFormatter> {
        TickFormatter::for_domain(domain, count, specifier)
    }
}

/// Integer-only ticks for index axes.
///
/// Nice bounds are the enclosing integers; labels never show decimals unless
/// a specifier asks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegerTicks;

impl TickStrategy for IntegerTicks {
    fn nice(&self, domain: Domain, _count: usize) -> Domain {
        if domain.1 < domain.0 {
            (domain.0.ceil(), domain.1.floor())
        } else {
            (domain.0.floor(), domain.1.ceil())
        }
    }

    fn ticks(&self, domain: Domain, count: usize) -> Vec<f64> {
        integer_ticks(domain, count)
    }

    fn tick_format(
        &self,
        domain: Domain,
        count: usize,
        specifier: Option<&str>,
    ) -> VisResult<TickFormatter> {
        TickFormatter::for_domain(domain, count, Some(specifier.unwrap_or(",d")))
    }
}
