//! Bounded prior distributions.
//!
//! Every distribution implements [`BoundedDistribution`]: it declares a set
//! of parameters, each with a [`Bounds`], and evaluates its density only
//! after the raw values have been passed through those bounds' boundary
//! conditions. Values that end up outside the bounds have zero density and a
//! log density of negative infinity; that is not an error.
//!
//! | Type | Name | Density |
//! |------|------|---------|
//! | [`Uniform`] | `uniform` | constant on each interval |
//! | [`Angular`] | `uniform_angle`, `sin_angle`, `cos_angle` | 1, sin θ, cos θ on an angular domain |
//! | [`SolidAngle`] | `uniform_solidangle`, `uniform_sky` | polar × azimuthal angle |
//! | [`Gaussian`] | `gaussian` | truncated normal |
//! | [`FromFile`] | `fromfile` | kernel density estimate of stored samples |
//! | [`UniformRadius`] | `uniform_radius` | `r^(dim-1)`, uniform in a ball |

mod angular;
mod from_file;
mod gaussian;
mod radius;
mod solid_angle;
mod uniform;

use core::fmt;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use angular::{AngleKind, Angular};
pub use from_file::FromFile;
pub use gaussian::{Gaussian, GaussianBuilder};
pub use radius::UniformRadius;
pub use solid_angle::{SolidAngle, SolidAngleBuilder, SolidAngleKind};
pub use uniform::Uniform;

use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::values::{ParamValues, Samples};

/// A non-fatal observation about a distribution's configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Diagnostic {
    /// The parameter has at least one reflected edge. Reflection makes the
    /// conditioned density non-smooth at the edge, which some samplers handle
    /// poorly.
    ReflectedBoundary {
        /// The affected parameter.
        param: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReflectedBoundary { param } => write!(
                f,
                "parameter '{param}' has one or more reflected boundaries; \
                 reflected boundaries can cause issues when used in an MCMC"
            ),
        }
    }
}

/// A probability distribution over named, individually bounded parameters.
///
/// Implementors provide the density of values that have already been
/// conditioned ([`pdf_conditioned`](Self::pdf_conditioned),
/// [`logpdf_conditioned`](Self::logpdf_conditioned)) and a sampler
/// ([`rvs`](Self::rvs)); the conditioning itself and the public
/// [`pdf`](Self::pdf)/[`logpdf`](Self::logpdf) entry points come for free.
///
/// # Examples
///
/// ```
/// use priors::{BoundedDistribution, Bounds, ParamValues, Uniform};
///
/// let dist = Uniform::new([
///     ("mass1", Bounds::new(10.0, 50.0).unwrap()),
///     ("mass2", Bounds::new(10.0, 50.0).unwrap()),
/// ])
/// .unwrap();
///
/// let values = ParamValues::from([("mass1", 25.0), ("mass2", 10.0)]);
/// assert!((dist.logpdf(&values).unwrap() - -7.377_758_908_227_872).abs() < 1e-12);
///
/// let mut rng = fastrand::Rng::with_seed(1);
/// let draws = dist.rvs(3, None, &mut rng).unwrap();
/// assert_eq!(draws.len(), 3);
/// ```
pub trait BoundedDistribution: fmt::Debug + Send + Sync {
    /// The registry name of this distribution.
    fn name(&self) -> &'static str;

    /// The declared parameters, in evaluation order.
    fn params(&self) -> &[String];

    /// The bounds of every declared parameter.
    fn bounds(&self) -> &BTreeMap<String, Bounds>;

    /// Density of values that have already been conditioned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a declared parameter is absent.
    fn pdf_conditioned(&self, values: &ParamValues) -> Result<f64>;

    /// Log density of values that have already been conditioned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a declared parameter is absent.
    fn logpdf_conditioned(&self, values: &ParamValues) -> Result<f64>;

    /// Draws `count` samples, restricted to `param` when given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownParameter`] if `param` is not declared.
    fn rvs(&self, count: usize, param: Option<&str>, rng: &mut fastrand::Rng)
    -> Result<Samples>;

    /// Applies each declared parameter's boundary conditions.
    ///
    /// Keys that are not declared parameters are dropped from the result;
    /// declared parameters absent from `values` stay absent.
    fn apply_boundary_conditions(&self, values: &ParamValues) -> ParamValues {
        values
            .iter()
            .filter_map(|(name, value)| {
                self.bounds()
                    .get(name)
                    .map(|b| (name, b.apply_conditions(value)))
            })
            .collect()
    }

    /// Whether every declared parameter's conditioned value is in bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a declared parameter is absent.
    fn contains(&self, values: &ParamValues) -> Result<bool> {
        let conditioned = self.apply_boundary_conditions(values);
        contains_conditioned(self.params(), self.bounds(), &conditioned)
    }

    /// Density at `values` after applying boundary conditions.
    ///
    /// Extra keys are ignored. Far in a tail the density can underflow to
    /// `0.0` while [`logpdf`](Self::logpdf) is still finite; prefer the log
    /// density there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a declared parameter is absent.
    fn pdf(&self, values: &ParamValues) -> Result<f64> {
        self.pdf_conditioned(&self.apply_boundary_conditions(values))
    }

    /// Log density at `values` after applying boundary conditions.
    ///
    /// Extra keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a declared parameter is absent.
    fn logpdf(&self, values: &ParamValues) -> Result<f64> {
        self.logpdf_conditioned(&self.apply_boundary_conditions(values))
    }

    /// Non-fatal observations about this distribution's bounds.
    fn diagnostics(&self) -> Vec<Diagnostic> {
        reflected_diagnostics(self.bounds())
    }
}

/// Parameter names and their bounds, shared by every distribution.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BoundedParams {
    params: Vec<String>,
    bounds: BTreeMap<String, Bounds>,
}

impl BoundedParams {
    /// Collects `(name, bounds)` pairs; missing bounds become unbounded.
    ///
    /// Parameters are kept in name order.
    pub(crate) fn new<K, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Bounds>)>,
    {
        let mut bounds = BTreeMap::new();
        for (name, b) in entries {
            let name = name.into();
            if bounds.contains_key(&name) {
                return Err(Error::DuplicateParameter(name));
            }
            bounds.insert(name, b.unwrap_or_default());
        }
        #[cfg(feature = "tracing")]
        for diagnostic in reflected_diagnostics(&bounds) {
            tracing::warn!(%diagnostic, "reflected boundary");
        }
        let params = bounds.keys().cloned().collect();
        Ok(Self { params, bounds })
    }

    /// Like [`new`](Self::new), but every parameter must have bounds.
    pub(crate) fn required<K, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Bounds>)>,
    {
        let entries: Vec<(String, Option<Bounds>)> =
            entries.into_iter().map(|(k, b)| (k.into(), b)).collect();
        if let Some((name, _)) = entries.iter().find(|(_, b)| b.is_none()) {
            return Err(Error::BoundsRequired(name.clone()));
        }
        Self::new(entries)
    }

    /// Keeps the given parameter order instead of sorting by name.
    pub(crate) fn with_order(mut self, order: Vec<String>) -> Result<Self> {
        if order.len() != self.params.len() {
            return Err(Error::Internal("parameter order does not match bounds"));
        }
        if let Some(name) = order.iter().find(|p| !self.bounds.contains_key(*p)) {
            return Err(Error::UnknownParameter(name.clone()));
        }
        self.params = order;
        Ok(self)
    }

    pub(crate) fn params(&self) -> &[String] {
        &self.params
    }

    pub(crate) fn bounds(&self) -> &BTreeMap<String, Bounds> {
        &self.bounds
    }

    /// The bounds of `name`; only called with declared names.
    pub(crate) fn get(&self, name: &str) -> Result<&Bounds> {
        self.bounds
            .get(name)
            .ok_or_else(|| Error::UnknownParameter(name.to_owned()))
    }

    /// Conditioned values are all inside their bounds.
    pub(crate) fn contains(&self, values: &ParamValues) -> Result<bool> {
        contains_conditioned(&self.params, &self.bounds, values)
    }

    /// Parameters to draw for an `rvs` call.
    pub(crate) fn selected<'a>(&'a self, param: Option<&'a str>) -> Result<Vec<&'a str>> {
        match param {
            Some(p) if self.bounds.contains_key(p) => Ok(vec![p]),
            Some(p) => Err(Error::UnknownParameter(p.to_owned())),
            None => Ok(self.params.iter().map(String::as_str).collect()),
        }
    }
}

fn contains_conditioned(
    params: &[String],
    bounds: &BTreeMap<String, Bounds>,
    values: &ParamValues,
) -> Result<bool> {
    for p in params {
        let value = values.require(p)?;
        let inside = bounds.get(p).is_some_and(|b| b.contains(value));
        if !inside {
            return Ok(false);
        }
    }
    Ok(true)
}

fn reflected_diagnostics(bounds: &BTreeMap<String, Bounds>) -> Vec<Diagnostic> {
    bounds
        .iter()
        .filter(|(_, b)| b.has_reflected_edge())
        .map(|(p, _)| Diagnostic::ReflectedBoundary { param: p.clone() })
        .collect()
}

/// Collects the values of `params` in order.
pub(crate) fn ordered_values(params: &[String], values: &ParamValues) -> Result<Vec<f64>> {
    params.iter().map(|p| values.require(p)).collect()
}
