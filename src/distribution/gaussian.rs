use core::f64::consts::TAU;
use std::collections::BTreeMap;

use super::{BoundedDistribution, BoundedParams};
use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::values::{ParamValues, Samples};
use crate::{rng_util, special};

/// Location, scale and normalization of one truncated normal.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Moments {
    mean: f64,
    var: f64,
    lognorm: f64,
}

impl Moments {
    fn std_dev(self) -> f64 {
        self.var.sqrt()
    }

    /// Edges standardized to `(x - mean) / sigma`.
    fn standardized(self, b: &Bounds) -> (f64, f64) {
        let sigma = self.std_dev();
        ((b.min() - self.mean) / sigma, (b.max() - self.mean) / sigma)
    }
}

/// Independent normal distributions, each truncated to its bounds.
///
/// # Examples
///
/// ```
/// use priors::{BoundedDistribution, Bounds, Gaussian, ParamValues};
///
/// let dist = Gaussian::builder()
///     .param("mass1", Some(Bounds::new(10.0, 50.0).unwrap()))
///     .param("mass2", None)
///     .mean("mass1", 30.0)
///     .var("mass1", 16.0)
///     .build()
///     .unwrap();
///
/// let values = ParamValues::from([("mass1", 30.0), ("mass2", 0.0)]);
/// assert!(dist.logpdf(&values).unwrap().is_finite());
/// assert_eq!(dist.mean("mass2"), Some(0.0));
/// ```
#[derive(Clone, Debug)]
pub struct Gaussian {
    inner: BoundedParams,
    moments: BTreeMap<String, Moments>,
}

impl Gaussian {
    #[must_use]
    pub fn builder() -> GaussianBuilder {
        GaussianBuilder::default()
    }

    /// Mean of `param`, if declared.
    #[must_use]
    pub fn mean(&self, param: &str) -> Option<f64> {
        self.moments.get(param).map(|m| m.mean)
    }

    /// Variance of `param`, if declared.
    #[must_use]
    pub fn var(&self, param: &str) -> Option<f64> {
        self.moments.get(param).map(|m| m.var)
    }

    /// Normalization of the truncated density of `param`, if declared.
    #[must_use]
    pub fn norm(&self, param: &str) -> Option<f64> {
        self.lognorm(param).map(f64::exp)
    }

    #[must_use]
    pub fn lognorm(&self, param: &str) -> Option<f64> {
        self.moments.get(param).map(|m| m.lognorm)
    }

    fn moments(&self, param: &str) -> Result<Moments> {
        self.moments
            .get(param)
            .copied()
            .ok_or_else(|| Error::UnknownParameter(param.to_owned()))
    }

    /// Inverse-CDF draw of a standard normal restricted to `[alpha, beta]`.
    ///
    /// Works on the lower tail so intervals deep in the upper tail do not
    /// collapse to a single CDF value.
    fn standard_truncated(alpha: f64, beta: f64, rng: &mut fastrand::Rng) -> f64 {
        if alpha.is_infinite() && beta.is_infinite() {
            return rng_util::standard_normal(rng);
        }
        if alpha > 0.0 {
            return -Self::standard_truncated(-beta, -alpha, rng);
        }
        let lo = special::norm_cdf(alpha);
        let hi = special::norm_cdf(beta);
        let u = rng_util::f64_range(rng, lo, hi);
        let z = special::norm_ppf(u);
        if z.is_nan() { alpha } else { z.clamp(alpha, beta) }
    }
}

impl BoundedDistribution for Gaussian {
    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn params(&self) -> &[String] {
        self.inner.params()
    }

    fn bounds(&self) -> &BTreeMap<String, Bounds> {
        self.inner.bounds()
    }

    fn pdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        // underflows to 0 far in the tails while logpdf stays finite
        Ok(self.logpdf_conditioned(values)?.exp())
    }

    fn logpdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        if !self.inner.contains(values)? {
            return Ok(f64::NEG_INFINITY);
        }
        let mut total = 0.0;
        for p in self.inner.params() {
            let m = self.moments(p)?;
            let x = values.require(p)?;
            total += m.lognorm - (x - m.mean).powi(2) / (2.0 * m.var);
        }
        Ok(total)
    }

    fn rvs(
        &self,
        count: usize,
        param: Option<&str>,
        rng: &mut fastrand::Rng,
    ) -> Result<Samples> {
        let mut out = Samples::new(count);
        for p in self.inner.selected(param)? {
            let m = self.moments(p)?;
            let (alpha, beta) = m.standardized(self.inner.get(p)?);
            let sigma = m.std_dev();
            let draws = (0..count)
                .map(|_| m.mean + sigma * Self::standard_truncated(alpha, beta, rng))
                .collect();
            out.insert(p, draws)?;
        }
        Ok(out)
    }
}

/// Builder for [`Gaussian`].
///
/// Means default to 0 and variances to 1.
#[derive(Clone, Debug, Default)]
pub struct GaussianBuilder {
    params: Vec<(String, Option<Bounds>)>,
    means: Vec<(String, f64)>,
    vars: Vec<(String, f64)>,
}

impl GaussianBuilder {
    /// Declares a parameter; `None` leaves it unbounded.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, bounds: Option<Bounds>) -> Self {
        self.params.push((name.into(), bounds));
        self
    }

    #[must_use]
    pub fn mean(mut self, name: impl Into<String>, mean: f64) -> Self {
        self.means.push((name.into(), mean));
        self
    }

    #[must_use]
    pub fn var(mut self, name: impl Into<String>, var: f64) -> Self {
        self.vars.push((name.into(), var));
        self
    }

    /// Builds the distribution.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingParameter`] if a mean or variance names an
    ///   undeclared parameter
    /// - [`Error::InvalidVariance`] if a variance is not positive and finite
    /// - [`Error::ZeroNormalization`] if a parameter's bounds hold no mass
    /// - [`Error::DuplicateParameter`] if a parameter is declared twice
    pub fn build(self) -> Result<Gaussian> {
        let inner = BoundedParams::new(self.params)?;
        let mut means: BTreeMap<String, f64> = BTreeMap::new();
        for (name, mean) in self.means {
            if !inner.bounds().contains_key(&name) {
                return Err(Error::MissingParameter(name));
            }
            means.insert(name, mean);
        }
        let mut vars: BTreeMap<String, f64> = BTreeMap::new();
        for (name, var) in self.vars {
            if !inner.bounds().contains_key(&name) {
                return Err(Error::MissingParameter(name));
            }
            if !(var.is_finite() && var > 0.0) {
                return Err(Error::InvalidVariance { param: name, var });
            }
            vars.insert(name, var);
        }

        let mut moments = BTreeMap::new();
        for (name, b) in inner.bounds() {
            let mut m = Moments {
                mean: means.get(name).copied().unwrap_or(0.0),
                var: vars.get(name).copied().unwrap_or(1.0),
                lognorm: 0.0,
            };
            let (alpha, beta) = m.standardized(b);
            let mass = special::norm_interval_mass(alpha, beta);
            if mass.is_nan() || mass <= 0.0 {
                return Err(Error::ZeroNormalization(name.clone()));
            }
            m.lognorm = -0.5 * (TAU * m.var).ln() - mass.ln();
            moments.insert(name.clone(), m);
        }
        Ok(Gaussian { inner, moments })
    }
}
