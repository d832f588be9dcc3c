//! Parameter domains and boundary conditions.
//!
//! A [`Bounds`] describes the interval a single parameter may take, how each
//! edge behaves ([`BoundType`]), and whether the interval wraps around. It
//! answers two questions: is a value inside the domain
//! ([`contains`](Bounds::contains)), and where does an out-of-domain value
//! land once the boundary conditions are applied
//! ([`apply_conditions`](Bounds::apply_conditions)).
//!
//! # Reflection
//!
//! When both edges are reflected and finite the value is folded back and
//! forth between them as many times as needed (a triangle wave with period
//! `2 * (max - min)`). When only one edge is reflected the value is mirrored
//! across that edge once; if the mirror image overshoots the opposite,
//! non-reflecting edge it stays outside the domain.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How an edge of a [`Bounds`] behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BoundType {
    /// The edge itself is excluded.
    Open,
    /// The edge itself is included.
    Closed,
    /// The edge is included and values beyond it are mirrored back.
    Reflected,
}

impl BoundType {
    /// Returns the lowercase name used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Reflected => "reflected",
        }
    }
}

impl fmt::Display for BoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "reflected" => Ok(Self::Reflected),
            other => Err(Error::UnsupportedConfiguration(format!(
                "unknown boundary type '{other}'"
            ))),
        }
    }
}

/// The domain of a single parameter.
///
/// # Examples
///
/// ```
/// use priors::{BoundType, Bounds};
///
/// let bounds = Bounds::new(0.0, 2.0).unwrap();
/// assert!(bounds.contains(0.0));
/// assert!(!bounds.contains(2.0));
///
/// let phase = Bounds::builder(0.0, 10.0).cyclic(true).build().unwrap();
/// assert!((phase.apply_conditions(12.5) - 2.5).abs() < 1e-12);
///
/// let mirror = Bounds::builder(0.0, 1.0)
///     .min_type(BoundType::Reflected)
///     .max_type(BoundType::Reflected)
///     .build()
///     .unwrap();
/// assert!((mirror.apply_conditions(1.25) - 0.75).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BoundsRepr"))]
pub struct Bounds {
    min: f64,
    max: f64,
    min_type: BoundType,
    max_type: BoundType,
    cyclic: bool,
}

impl Bounds {
    /// Creates bounds with a closed lower edge and an open upper edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] if `min >= max` or either edge is NaN.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        Self::builder(min, max).build()
    }

    /// Starts building bounds with non-default edge types or cyclic wrapping.
    #[must_use]
    pub fn builder(min: f64, max: f64) -> BoundsBuilder {
        BoundsBuilder::new(min, max)
    }

    /// The bounds `[-inf, inf)`, used when a parameter has no explicit domain.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            min_type: BoundType::Closed,
            max_type: BoundType::Open,
            cyclic: false,
        }
    }

    /// Lower edge.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper edge.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Behaviour of the lower edge.
    #[must_use]
    pub fn min_type(&self) -> BoundType {
        self.min_type
    }

    /// Behaviour of the upper edge.
    #[must_use]
    pub fn max_type(&self) -> BoundType {
        self.max_type
    }

    /// Whether values wrap around the interval.
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Returns `max - min`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Whether either edge is reflected.
    #[must_use]
    pub fn has_reflected_edge(&self) -> bool {
        self.min_type == BoundType::Reflected || self.max_type == BoundType::Reflected
    }

    /// Whether both edges are infinite.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_infinite() && self.max.is_infinite()
    }

    /// Returns a copy with both edges multiplied by `factor`, keeping edge
    /// types and cyclicity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] if the scaled edges are no longer
    /// ordered (for example when `factor` is not positive).
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        Self::builder(self.min * factor, self.max * factor)
            .min_type(self.min_type)
            .max_type(self.max_type)
            .cyclic(self.cyclic)
            .build()
    }

    /// Tests whether `value` lies inside the bounds, honouring edge types.
    ///
    /// Reflected edges count as closed. NaN is never contained.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        if self.is_unbounded() {
            return true;
        }
        let above_min = match self.min_type {
            BoundType::Open => value > self.min,
            BoundType::Closed | BoundType::Reflected => value >= self.min,
        };
        let below_max = match self.max_type {
            BoundType::Open => value < self.max,
            BoundType::Closed | BoundType::Reflected => value <= self.max,
        };
        above_min && below_max
    }

    /// Maps `value` back into the domain according to the boundary conditions.
    ///
    /// Values already inside the domain are returned unchanged, so applying
    /// the conditions twice gives the same result as applying them once.
    /// Open and closed edges never move a value; it may still fail
    /// [`contains`](Self::contains) afterwards.
    #[must_use]
    pub fn apply_conditions(&self, value: f64) -> f64 {
        if self.cyclic {
            return self.wrap(value);
        }
        if self.contains(value) || !self.has_reflected_edge() {
            return value;
        }
        let reflect_min = self.min_type == BoundType::Reflected;
        let reflect_max = self.max_type == BoundType::Reflected;
        if reflect_min && reflect_max && self.min.is_finite() && self.max.is_finite() {
            return self.fold(value);
        }
        if reflect_min && value < self.min {
            2.0 * self.min - value
        } else if reflect_max && value > self.max {
            2.0 * self.max - value
        } else {
            value
        }
    }

    /// Shifts `value` by whole periods into `[min, max)`.
    fn wrap(&self, value: f64) -> f64 {
        if (self.min..self.max).contains(&value) {
            return value;
        }
        if !value.is_finite() {
            return f64::NAN;
        }
        let width = self.width();
        let wrapped = self.min + (value - self.min).rem_euclid(width);
        // rounding can land exactly on (or a hair past) an edge
        if (self.min..self.max).contains(&wrapped) {
            wrapped
        } else {
            self.min
        }
    }

    /// Folds `value` between two reflecting edges.
    fn fold(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        let width = self.width();
        let offset = (value - self.min).rem_euclid(2.0 * width);
        let folded = if offset <= width {
            self.min + offset
        } else {
            self.min + (2.0 * width - offset)
        };
        folded.clamp(self.min, self.max)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_type == BoundType::Open { '(' } else { '[' };
        let close = if self.max_type == BoundType::Open { ')' } else { ']' };
        write!(f, "{open}{}, {}{close}", self.min, self.max)?;
        if self.cyclic {
            f.write_str(" cyclic")?;
        }
        Ok(())
    }
}

/// Unvalidated wire form of [`Bounds`]; deserializing goes through the builder.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct BoundsRepr {
    min: f64,
    max: f64,
    #[serde(default = "closed")]
    min_type: BoundType,
    #[serde(default = "open")]
    max_type: BoundType,
    #[serde(default)]
    cyclic: bool,
}

#[cfg(feature = "serde")]
fn closed() -> BoundType {
    BoundType::Closed
}

#[cfg(feature = "serde")]
fn open() -> BoundType {
    BoundType::Open
}

#[cfg(feature = "serde")]
impl TryFrom<BoundsRepr> for Bounds {
    type Error = Error;

    fn try_from(repr: BoundsRepr) -> Result<Self> {
        Bounds::builder(repr.min, repr.max)
            .min_type(repr.min_type)
            .max_type(repr.max_type)
            .cyclic(repr.cyclic)
            .build()
    }
}

/// Builder for [`Bounds`] with custom edge types.
///
/// Created via [`Bounds::builder`]. Defaults to a closed lower edge, an open
/// upper edge and no wrapping.
#[derive(Clone, Copy, Debug)]
pub struct BoundsBuilder {
    min: f64,
    max: f64,
    min_type: BoundType,
    max_type: BoundType,
    cyclic: bool,
}

impl BoundsBuilder {
    fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_type: BoundType::Closed,
            max_type: BoundType::Open,
            cyclic: false,
        }
    }

    /// Sets the lower edge type.
    #[must_use]
    pub fn min_type(mut self, min_type: BoundType) -> Self {
        self.min_type = min_type;
        self
    }

    /// Sets the upper edge type.
    #[must_use]
    pub fn max_type(mut self, max_type: BoundType) -> Self {
        self.max_type = max_type;
        self
    }

    /// Makes the interval wrap around.
    #[must_use]
    pub fn cyclic(mut self, cyclic: bool) -> Self {
        self.cyclic = cyclic;
        self
    }

    /// Validates the edges and builds the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] if an edge is NaN, `min >= max`, or a
    /// cyclic interval has a reflected or infinite edge.
    pub fn build(self) -> Result<Bounds> {
        let invalid = |reason| Error::InvalidBounds {
            min: self.min,
            max: self.max,
            reason,
        };
        if self.min.is_nan() || self.max.is_nan() {
            return Err(invalid("edges must not be NaN"));
        }
        if self.min >= self.max {
            return Err(invalid("min must be less than max"));
        }
        if self.cyclic {
            if self.min_type == BoundType::Reflected || self.max_type == BoundType::Reflected {
                return Err(invalid("cyclic bounds cannot have reflected edges"));
            }
            if !self.min.is_finite() || !self.max.is_finite() {
                return Err(invalid("cyclic bounds must be finite"));
            }
        }
        Ok(Bounds {
            min: self.min,
            max: self.max,
            min_type: self.min_type,
            max_type: self.max_type,
            cyclic: self.cyclic,
        })
    }
}
