use std::collections::BTreeMap;

use super::{BoundedDistribution, BoundedParams};
use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::values::{ParamValues, Samples};

/// Radii of points spread uniformly through a `dim`-dimensional ball.
///
/// The CDF is the volume ratio `(r / R)^dim`, so the density is
/// `dim · r^(dim-1) / R^dim` on `[0, R]`. Every parameter needs a lower
/// bound of exactly zero.
///
/// # Examples
///
/// ```
/// use priors::{BoundedDistribution, Bounds, ParamValues, UniformRadius};
///
/// let dist = UniformRadius::new([("distance", Bounds::new(0.0, 2.0).unwrap())]).unwrap();
/// // 3 * 1^2 / 2^3
/// assert_eq!(dist.pdf(&ParamValues::from([("distance", 1.0)])).unwrap(), 0.375);
/// ```
#[derive(Clone, Debug)]
pub struct UniformRadius {
    inner: BoundedParams,
    dim: u32,
    norm: f64,
    lognorm: f64,
}

impl UniformRadius {
    /// Dimension used by [`new`](Self::new).
    pub const DEFAULT_DIM: u32 = 3;

    /// Radii in a three-dimensional ball.
    ///
    /// # Errors
    ///
    /// See [`with_dim`](Self::with_dim).
    pub fn new<K, I>(params: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Bounds)>,
    {
        Self::with_dim(params, Self::DEFAULT_DIM)
    }

    /// Radii in a `dim`-dimensional ball.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if `dim` is zero and
    /// [`Error::InvalidBounds`] unless every lower bound is 0 and every upper
    /// bound finite and positive.
    pub fn with_dim<K, I>(params: I, dim: u32) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Bounds)>,
    {
        Self::from_params(
            BoundedParams::new(params.into_iter().map(|(k, b)| (k, Some(b))))?,
            dim,
        )
    }

    /// Like [`with_dim`](Self::with_dim) with optional bounds, as read from
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundsRequired`] if any parameter has no bounds.
    pub fn with_optional_bounds<K, I>(params: I, dim: u32) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Bounds>)>,
    {
        Self::from_params(BoundedParams::required(params)?, dim)
    }

    #[allow(clippy::float_cmp)]
    fn from_params(inner: BoundedParams, dim: u32) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidDimension(dim));
        }
        let d = f64::from(dim);
        let mut norm = 1.0;
        let mut lognorm = 0.0;
        for b in inner.bounds().values() {
            if b.min() != 0.0 {
                return Err(Error::InvalidBounds {
                    min: b.min(),
                    max: b.max(),
                    reason: "radius lower bound must be 0",
                });
            }
            if !(b.max().is_finite() && b.max() > 0.0) {
                return Err(Error::InvalidBounds {
                    min: b.min(),
                    max: b.max(),
                    reason: "radius upper bound must be finite and greater than 0",
                });
            }
            norm *= d / b.max().powf(d);
            lognorm += d.ln() - d * b.max().ln();
        }
        Ok(Self {
            inner,
            dim,
            norm,
            lognorm,
        })
    }

    #[must_use]
    pub fn dim(&self) -> u32 {
        self.dim
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

impl BoundedDistribution for UniformRadius {
    fn name(&self) -> &'static str {
        "uniform_radius"
    }

    fn params(&self) -> &[String] {
        self.inner.params()
    }

    fn bounds(&self) -> &BTreeMap<String, Bounds> {
        self.inner.bounds()
    }

    fn pdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        if !self.inner.contains(values)? {
            return Ok(0.0);
        }
        let exponent = i32::try_from(self.dim - 1).unwrap_or(i32::MAX);
        let mut density = self.norm;
        for p in self.inner.params() {
            density *= values.require(p)?.powi(exponent);
        }
        Ok(density)
    }

    fn logpdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        if !self.inner.contains(values)? {
            return Ok(f64::NEG_INFINITY);
        }
        if self.dim == 1 {
            return Ok(self.lognorm);
        }
        let mut log_r = 0.0;
        for p in self.inner.params() {
            log_r += values.require(p)?.ln();
        }
        Ok(self.lognorm + f64::from(self.dim - 1) * log_r)
    }

    fn rvs(
        &self,
        count: usize,
        param: Option<&str>,
        rng: &mut fastrand::Rng,
    ) -> Result<Samples> {
        let inv_dim = 1.0 / f64::from(self.dim);
        let mut out = Samples::new(count);
        for p in self.inner.selected(param)? {
            let radius = self.inner.get(p)?.max();
            let draws = (0..count)
                .map(|_| radius * rng.f64().powf(inv_dim))
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
    fn test_norm() {
        let dist = UniformRadius::new([
            ("r1", Bounds::new(0.0, 2.0).unwrap()),
            ("r2", Bounds::new(0.0, 1.0).unwrap()),
        ])
        .unwrap();
        assert!((dist.norm() - 3.0 / 8.0 * 3.0).abs() < 1e-12);
        assert!((dist.lognorm() - dist.norm().ln()).abs() < 1e-12);
    }

    #[test]
    fn test_nonzero_lower_bound() {
        let result = UniformRadius::new([("r", Bounds::new(0.5, 1.0).unwrap())]);
        assert!(matches!(result, Err(Error::InvalidBounds { .. })));
    }

    #[test]
    fn test_lower_bound_must_be_exactly_zero() {
        for min in [-1e-300, 1e-300, -2.0] {
            let result = UniformRadius::new([("r", Bounds::new(min, 1.0).unwrap())]);
            assert!(matches!(result, Err(Error::InvalidBounds { .. })), "{min}");
        }
        assert!(UniformRadius::new([("r", Bounds::new(-0.0, 1.0).unwrap())]).is_ok());
    }

    #[test]
    fn test_infinite_upper_bound() {
        let result = UniformRadius::new([("r", Bounds::new(0.0, f64::INFINITY).unwrap())]);
        assert!(matches!(result, Err(Error::InvalidBounds { .. })));
    }

    #[test]
    fn test_zero_dim() {
        let result = UniformRadius::with_dim([("r", Bounds::new(0.0, 1.0).unwrap())], 0);
        assert!(matches!(result, Err(Error::InvalidDimension(0))));
    }

    #[test]
    fn test_dim_one_is_uniform() {
        let dist = UniformRadius::with_dim([("r", Bounds::new(0.0, 4.0).unwrap())], 1).unwrap();
        let values = ParamValues::from([("r", 3.0)]);
        assert!((dist.pdf(&values).unwrap() - 0.25).abs() < 1e-15);
        assert!((dist.logpdf(&values).unwrap() - 0.25_f64.ln()).abs() < 1e-15);
    }

    #[test]
    fn test_logpdf_at_origin() {
        let dist = UniformRadius::new([("r", Bounds::new(0.0, 1.0).unwrap())]).unwrap();
        let values = ParamValues::from([("r", 0.0)]);
        assert_eq!(dist.pdf(&values).unwrap(), 0.0);
        assert_eq!(dist.logpdf(&values).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_rvs_volume_cdf() {
        let dist = UniformRadius::new([("r", Bounds::new(0.0, 1.0).unwrap())]).unwrap();
        let mut rng = fastrand::Rng::with_seed(1234);
        let n = 10_000;
        let draws = dist.rvs(n, None, &mut rng).unwrap();
        let column = draws.get("r").unwrap();
        let below = column.iter().filter(|&&r| r < 0.5).count() as f64 / n as f64;
        assert!((below - 0.125).abs() < 0.015, "fraction {below}");
        assert!(column.iter().all(|&r| (0.0..1.0).contains(&r)));
    }
}
