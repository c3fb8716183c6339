//! Domain and range value types shared by the slider, the range sheet and hosts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numeric;

/// Construction errors for domains and committed ranges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("domain bounds must be finite (min {min}, max {max})")]
    NonFinite { min: f64, max: f64 },

    #[error("domain min {min} is greater than max {max}")]
    InvertedBounds { min: f64, max: f64 },

    #[error("step must be a positive finite number, got {0}")]
    InvalidStep(f64),

    #[error("range low {low} is greater than high {high}")]
    Inverted { low: f64, high: f64 },
}

/// Closed numeric interval plus the grid every committed value aligns to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDomain", into = "RawDomain")]
pub struct Domain {
    min: f64,
    max: f64,
    step: f64,
}

#[derive(Serialize, Deserialize)]
struct RawDomain {
    min: f64,
    max: f64,
    step: f64,
}

impl TryFrom<RawDomain> for Domain {
    type Error = RangeError;

    fn try_from(raw: RawDomain) -> Result<Self, Self::Error> {
        Domain::new(raw.min, raw.max, raw.step)
    }
}

impl From<Domain> for RawDomain {
    fn from(d: Domain) -> Self {
        RawDomain {
            min: d.min,
            max: d.max,
            step: d.step,
        }
    }
}

impl Domain {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, RangeError> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(RangeError::NonFinite { min, max });
        }
        if min > max {
            return Err(RangeError::InvertedBounds { min, max });
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(RangeError::InvalidStep(step));
        }
        Ok(Self { min, max, step })
    }

    /// For literal domains known to be valid.
    pub(crate) fn fixed(min: f64, max: f64, step: f64) -> Self {
        debug_assert!(min <= max && step > 0.0);
        Self { min, max, step }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f64) -> f64 {
        numeric::clamp(value, self.min, self.max)
    }

    pub fn snap(&self, value: f64) -> f64 {
        numeric::snap(value, self.step, self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Parse field text against this domain (see [`numeric::to_number_or_null`]).
    pub fn parse(&self, text: &str) -> Option<f64> {
        numeric::to_number_or_null(text, self.min, self.max, self.step)
    }

    /// Linear interpolation across the domain; `fraction` is clamped to `[0, 1]`.
    pub fn value_at_fraction(&self, fraction: f64) -> f64 {
        let f = numeric::clamp(fraction, 0.0, 1.0);
        self.min + f * self.span()
    }

    /// Position of `value` along the domain in `[0, 1]`. A degenerate domain maps to 0.
    pub fn fraction_of(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 {
            return 0.0;
        }
        numeric::clamp((value - self.min) / span, 0.0, 1.0)
    }

    /// Narrow `max` to `ceiling`, never below `min`.
    pub fn with_ceiling(self, ceiling: f64) -> Self {
        if !ceiling.is_finite() {
            return self;
        }
        Self {
            max: self.max.min(ceiling).max(self.min),
            ..self
        }
    }
}

/// A concrete, ordered pair. `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangePair {
    low: f64,
    high: f64,
}

impl RangePair {
    pub fn new(low: f64, high: f64) -> Result<Self, RangeError> {
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    /// Build a pair that only one threshold drives.
    pub fn single(value: f64) -> Self {
        Self {
            low: value,
            high: value,
        }
    }

    /// Order two values into a pair.
    pub fn sorted(a: f64, b: f64) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }
}

/// A host's committed value: both ends set, or nothing selected yet.
///
/// Ends are independently optional so a caller can hand over a half-filled
/// value when opening a sheet; when both are set `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Range {
    low: Option<f64>,
    high: Option<f64>,
}

impl Range {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn between(low: f64, high: f64) -> Result<Self, RangeError> {
        RangePair::new(low, high).map(Self::from)
    }

    /// Build from optional ends, rejecting a fully-set inverted pair.
    pub fn from_parts(low: Option<f64>, high: Option<f64>) -> Result<Self, RangeError> {
        if let (Some(l), Some(h)) = (low, high) {
            if l > h {
                return Err(RangeError::Inverted { low: l, high: h });
            }
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> Option<f64> {
        self.low
    }

    pub fn high(&self) -> Option<f64> {
        self.high
    }

    pub fn is_complete(&self) -> bool {
        self.low.is_some() && self.high.is_some()
    }

    pub fn pair(&self) -> Option<RangePair> {
        match (self.low, self.high) {
            (Some(low), Some(high)) => RangePair::new(low, high).ok(),
            _ => None,
        }
    }

    /// Concrete values for rendering: unset ends become the domain bounds.
    pub fn resolve(&self, domain: &Domain) -> RangePair {
        let low = self.low.map_or(domain.min(), |v| domain.clamp(v));
        let high = self.high.map_or(domain.max(), |v| domain.clamp(v));
        RangePair::sorted(low, high)
    }
}

impl From<RangePair> for Range {
    fn from(pair: RangePair) -> Self {
        Self {
            low: Some(pair.low),
            high: Some(pair.high),
        }
    }
}

/// Host row text: `1,000~2,000원`, or `placeholder` when incomplete.
pub fn format_range(range: &Range, unit: &str, placeholder: &str) -> String {
    match range.pair() {
        Some(pair) => format!(
            "{}~{}{unit}",
            numeric::format_amount(pair.low()),
            numeric::format_amount(pair.high())
        ),
        None => placeholder.to_string(),
    }
}
