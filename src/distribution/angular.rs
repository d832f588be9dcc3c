use core::f64::consts::{FRAC_PI_2, PI, TAU};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{BoundedDistribution, BoundedParams};
use crate::bounds::{BoundType, Bounds};
use crate::error::{Error, Result};
use crate::rng_util;
use crate::values::{ParamValues, Samples};

/// The shape of an angular density.
///
/// Each kind fixes a domain and a density with a closed-form antiderivative
/// and inverse, so normalization and sampling are exact.
///
/// | Kind | Domain | Density |
/// |------|--------|---------|
/// | `Uniform` | `[0, 2π)`, cyclic | 1 |
/// | `Sin` | `[0, π]` | sin θ |
/// | `Cos` | `[-π/2, π/2]` | cos θ |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AngleKind {
    /// Flat in angle.
    Uniform,
    /// Proportional to `sin θ`; a polar angle measured from the pole.
    Sin,
    /// Proportional to `cos θ`; a latitude-like angle measured from the equator.
    Cos,
}

impl AngleKind {
    /// The registry name of the distribution this kind produces.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform_angle",
            Self::Sin => "sin_angle",
            Self::Cos => "cos_angle",
        }
    }

    /// The fixed domain, in radians.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in kinds.
    pub fn domain(self) -> Result<Bounds> {
        match self {
            Self::Uniform => Bounds::builder(0.0, TAU).cyclic(true).build(),
            Self::Sin => Bounds::builder(0.0, PI)
                .max_type(BoundType::Closed)
                .build(),
            Self::Cos => Bounds::builder(-FRAC_PI_2, FRAC_PI_2)
                .max_type(BoundType::Closed)
                .build(),
        }
    }

    fn density(self, theta: f64) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::Sin => theta.sin(),
            Self::Cos => theta.cos(),
        }
    }

    fn antiderivative(self, theta: f64) -> f64 {
        match self {
            Self::Uniform => theta,
            Self::Sin => theta.cos(),
            Self::Cos => theta.sin(),
        }
    }

    fn inverse(self, u: f64) -> f64 {
        match self {
            Self::Uniform => u,
            Self::Sin => u.acos(),
            Self::Cos => u.asin(),
        }
    }
}

/// Independent angles sharing one [`AngleKind`].
///
/// Bounds are given in multiples of π and stored in radians. Values are
/// first conditioned by the kind's domain (which wraps for
/// [`AngleKind::Uniform`]) and then by the parameter's own bounds.
///
/// # Examples
///
/// ```
/// use priors::{Angular, BoundedDistribution, Bounds, ParamValues};
///
/// let dist = Angular::uniform_angle([("phi", None)]).unwrap();
/// let wrapped = dist.pdf(&ParamValues::from([("phi", 2.0 * std::f64::consts::PI + 0.1)]));
/// let direct = dist.pdf(&ParamValues::from([("phi", 0.1)]));
/// assert_eq!(wrapped.unwrap(), direct.unwrap());
///
/// // the northern hemisphere only, in units of π
/// let theta = Angular::sin_angle([("theta", Some(Bounds::new(0.0, 0.5).unwrap()))]).unwrap();
/// assert!((theta.norm() - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct Angular {
    kind: AngleKind,
    domain: Bounds,
    inner: BoundedParams,
    norm: f64,
    lognorm: f64,
}

impl Angular {
    /// Creates an angular distribution of the given kind.
    ///
    /// `None` bounds default to the kind's domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfDomain`] if scaled bounds leave the domain and
    /// [`Error::DuplicateParameter`] if a name repeats.
    pub fn new<K, I>(kind: AngleKind, params: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Bounds>)>,
    {
        let domain = kind.domain()?;
        let mut entries = Vec::new();
        for (name, b) in params {
            let name = name.into();
            let b = match b {
                Some(b) => b.scaled(PI)?,
                None => domain,
            };
            if b.min() < domain.min() || b.max() > domain.max() {
                return Err(Error::OutOfDomain {
                    param: name,
                    min: b.min(),
                    max: b.max(),
                    domain_min: domain.min(),
                    domain_max: domain.max(),
                });
            }
            entries.push((name, Some(b)));
        }
        let inner = BoundedParams::new(entries)?;
        let lognorm = -inner
            .bounds()
            .values()
            .map(|b| (kind.antiderivative(b.max()) - kind.antiderivative(b.min())).abs().ln())
            .sum::<f64>();
        Ok(Self {
            kind,
            domain,
            inner,
            norm: lognorm.exp(),
            lognorm,
        })
    }

    /// Angles uniform on `[0, 2π)`.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn uniform_angle<K, I>(params: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Bounds>)>,
    {
        Self::new(AngleKind::Uniform, params)
    }

    /// Angles on `[0, π]` with density proportional to `sin θ`.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn sin_angle<K, I>(params: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Bounds>)>,
    {
        Self::new(AngleKind::Sin, params)
    }

    /// Angles on `[-π/2, π/2]` with density proportional to `cos θ`.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn cos_angle<K, I>(params: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Bounds>)>,
    {
        Self::new(AngleKind::Cos, params)
    }

    #[must_use]
    pub fn kind(&self) -> AngleKind {
        self.kind
    }

    /// The kind's fixed domain, in radians.
    #[must_use]
    pub fn domain(&self) -> &Bounds {
        &self.domain
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        self.norm
    }

    #[must_use]
    pub fn lognorm(&self) -> f64 {
        self.lognorm
    }
}

impl BoundedDistribution for Angular {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn params(&self) -> &[String] {
        self.inner.params()
    }

    fn bounds(&self) -> &BTreeMap<String, Bounds> {
        self.inner.bounds()
    }

    fn apply_boundary_conditions(&self, values: &ParamValues) -> ParamValues {
        values
            .iter()
            .filter_map(|(name, value)| {
                self.inner.bounds().get(name).map(|b| {
                    let value = self.domain.apply_conditions(value);
                    (name, b.apply_conditions(value))
                })
            })
            .collect()
    }

    fn pdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        if !self.inner.contains(values)? {
            return Ok(0.0);
        }
        let mut density = self.norm;
        for p in self.inner.params() {
            density *= self.kind.density(values.require(p)?);
        }
        Ok(density)
    }

    fn logpdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        if !self.inner.contains(values)? {
            return Ok(f64::NEG_INFINITY);
        }
        let mut log_density = self.lognorm;
        for p in self.inner.params() {
            log_density += self.kind.density(values.require(p)?).ln();
        }
        Ok(log_density)
    }

    fn rvs(
        &self,
        count: usize,
        param: Option<&str>,
        rng: &mut fastrand::Rng,
    ) -> Result<Samples> {
        let mut out = Samples::new(count);
        for p in self.inner.selected(param)? {
            let b = self.inner.get(p)?;
            let lo = self.kind.antiderivative(b.min());
            let hi = self.kind.antiderivative(b.max());
            let draws = (0..count)
                .map(|_| {
                    let u = rng_util::f64_range(rng, lo, hi);
                    self.kind.inverse(u).clamp(b.min(), b.max())
                })
                .collect();
            out.insert(p, draws)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domains() {
        let uniform = AngleKind::Uniform.domain().unwrap();
        assert!(uniform.is_cyclic());
        assert!(!uniform.contains(TAU));
        assert!(AngleKind::Sin.domain().unwrap().contains(PI));
        assert!(AngleKind::Cos.domain().unwrap().contains(-FRAC_PI_2));
    }

    #[test]
    fn test_default_bounds_are_domain() {
        let dist = Angular::cos_angle([("dec", None)]).unwrap();
        assert_eq!(dist.bounds()["dec"], AngleKind::Cos.domain().unwrap());
        assert!((dist.norm() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_scaled_by_pi() {
        let dist = Angular::uniform_angle([("phi", Some(Bounds::new(0.0, 1.0).unwrap()))]).unwrap();
        let b = dist.bounds()["phi"];
        assert_eq!(b.max(), PI);
        assert!((dist.norm() - 1.0 / PI).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_domain() {
        let result = Angular::sin_angle([("theta", Some(Bounds::new(0.0, 1.5).unwrap()))]);
        assert!(matches!(result, Err(Error::OutOfDomain { param, .. }) if param == "theta"));
    }

    #[test]
    fn test_sin_density() {
        let dist = Angular::sin_angle([("theta", None)]).unwrap();
        let at = |x: f64| dist.pdf(&ParamValues::from([("theta", x)])).unwrap();
        assert!((at(FRAC_PI_2) - 0.5).abs() < 1e-12);
        assert_eq!(at(0.0), 0.0);
        assert_eq!(at(-0.1), 0.0);
        let log = dist.logpdf(&ParamValues::from([("theta", 0.0)])).unwrap();
        assert_eq!(log, f64::NEG_INFINITY);
    }

    #[test]
    fn test_logpdf_matches_pdf() {
        let dist = Angular::cos_angle([("a", None), ("b", None)]).unwrap();
        let values = ParamValues::from([("a", 0.3), ("b", -1.0)]);
        let pdf = dist.pdf(&values).unwrap();
        let logpdf = dist.logpdf(&values).unwrap();
        assert!((pdf.ln() - logpdf).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_angle_wraps() {
        let dist = Angular::uniform_angle([("phi", None)]).unwrap();
        let conditioned = dist.apply_boundary_conditions(&ParamValues::from([("phi", -0.5)]));
        assert!((conditioned.get("phi").unwrap() - (TAU - 0.5)).abs() < 1e-12);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_sin_rvs_follow_cdf() {
        let dist = Angular::sin_angle([("theta", None)]).unwrap();
        let mut rng = fastrand::Rng::with_seed(3);
        let n = 20_000;
        let draws = dist.rvs(n, None, &mut rng).unwrap();
        let column = draws.get("theta").unwrap();
        assert!(column.iter().all(|&t| (0.0..=PI).contains(&t)));
        // P(theta < pi/2) = 1/2, P(theta < pi/3) = 1/4
        let below = |x: f64| column.iter().filter(|&&t| t < x).count() as f64 / n as f64;
        assert!((below(FRAC_PI_2) - 0.5).abs() < 0.02);
        assert!((below(PI / 3.0) - 0.25).abs() < 0.02);
    }

    #[test]
    fn test_restricted_rvs_in_bounds() {
        let dist =
            Angular::cos_angle([("dec", Some(Bounds::new(0.1, 0.3).unwrap()))]).unwrap();
        let mut rng = fastrand::Rng::with_seed(5);
        for row in dist.rvs(1000, None, &mut rng).unwrap().rows() {
            assert!(dist.contains(&row).unwrap());
        }
    }
}
