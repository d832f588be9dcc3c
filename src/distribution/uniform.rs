use std::collections::BTreeMap;

use super::{BoundedDistribution, BoundedParams};
use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::rng_util;
use crate::values::{ParamValues, Samples};

/// Independent uniform densities over finite intervals.
///
/// The density is `1 / Π width_p` wherever every conditioned value lies in
/// its bounds, and zero elsewhere.
///
/// # Examples
///
/// ```
/// use priors::{BoundedDistribution, Bounds, ParamValues, Uniform};
///
/// let dist = Uniform::new([("x", Bounds::new(0.0, 2.0).unwrap())]).unwrap();
/// assert_eq!(dist.pdf(&ParamValues::from([("x", 1.0)])).unwrap(), 0.5);
/// assert_eq!(dist.pdf(&ParamValues::from([("x", 3.0)])).unwrap(), 0.0);
///
/// // cyclic bounds wrap before evaluating
/// let phi = Uniform::new([("phi", Bounds::builder(10.0, 50.0).cyclic(true).build().unwrap())])
///     .unwrap();
/// assert_eq!(phi.pdf(&ParamValues::from([("phi", 60.0)])).unwrap(), 0.025);
/// ```
#[derive(Clone, Debug)]
pub struct Uniform {
    inner: BoundedParams,
    norm: f64,
    lognorm: f64,
}

impl Uniform {
    /// Creates a uniform distribution over the given parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] if any interval is infinite and
    /// [`Error::DuplicateParameter`] if a name repeats.
    pub fn new<K, I>(params: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Bounds)>,
    {
        Self::from_params(BoundedParams::new(
            params.into_iter().map(|(k, b)| (k, Some(b))),
        )?)
    }

    /// Like [`new`](Self::new) but with optional bounds, as read from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundsRequired`] if any parameter has no bounds.
    pub fn with_optional_bounds<K, I>(params: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Bounds>)>,
    {
        Self::from_params(BoundedParams::required(params)?)
    }

    fn from_params(inner: BoundedParams) -> Result<Self> {
        if let Some(b) = inner.bounds().values().find(|b| !b.width().is_finite()) {
            return Err(Error::InvalidBounds {
                min: b.min(),
                max: b.max(),
                reason: "uniform bounds must be finite",
            });
        }
        let widths = inner.bounds().values().map(Bounds::width);
        let norm = 1.0 / widths.clone().product::<f64>();
        let lognorm = -widths.map(f64::ln).sum::<f64>();
        Ok(Self {
            inner,
            norm,
            lognorm,
        })
    }

    /// The constant density inside the bounds.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// The log of [`norm`](Self::norm).
    #[must_use]
    pub fn lognorm(&self) -> f64 {
        self.lognorm
    }
}

impl BoundedDistribution for Uniform {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn params(&self) -> &[String] {
        self.inner.params()
    }

    fn bounds(&self) -> &BTreeMap<String, Bounds> {
        self.inner.bounds()
    }

    fn pdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        Ok(if self.inner.contains(values)? {
            self.norm
        } else {
            0.0
        })
    }

    fn logpdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        Ok(if self.inner.contains(values)? {
            self.lognorm
        } else {
            f64::NEG_INFINITY
        })
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
            let draws = (0..count)
                .map(|_| rng_util::f64_range(rng, b.min(), b.max()))
                .collect();
            out.insert(p, draws)?;
        }
        Ok(out)
    }
}
