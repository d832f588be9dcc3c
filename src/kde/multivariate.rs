//! Multivariate Gaussian kernel density estimation.
//!
//! The estimator places one Gaussian kernel on every stored sample, with an
//! independent bandwidth per dimension (a diagonal bandwidth matrix). With a
//! diagonal kernel the probability mass of an axis-aligned box factorizes per
//! dimension, so [`MultivariateKde::integrate_box`] is exact rather than a
//! Monte Carlo estimate.

use crate::error::{Error, Result};
use crate::rng_util;
use crate::special;

/// A multivariate Gaussian kernel density estimator.
///
/// # Examples
///
/// ```ignore
/// use crate::kde::MultivariateKde;
///
/// // 3 samples with 2 dimensions each
/// let samples = vec![
///     vec![1.0, 2.0],
///     vec![1.5, 2.5],
///     vec![2.0, 3.0],
/// ];
/// let kde = MultivariateKde::new(samples).unwrap();
///
/// assert_eq!(kde.n_dims(), 2);
/// assert!(kde.evaluate(&[1.5, 2.5]) > 0.0);
/// ```
#[derive(Clone, Debug)]
pub(crate) struct MultivariateKde {
    /// Each inner Vec is one sample with `n_dims` values.
    samples: Vec<Vec<f64>>,
    /// The bandwidth (standard deviation) for each dimension.
    bandwidths: Vec<f64>,
    n_dims: usize,
}

impl MultivariateKde {
    /// Creates a KDE with bandwidths chosen by Scott's rule.
    ///
    /// Scott's rule for multivariate KDE sets bandwidth per dimension as
    /// `h_j = n^(-1/(d+4)) * sigma_j`.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptySamples` if `samples` is empty.
    /// Returns `Error::DimensionMismatch` if samples have inconsistent dimensions.
    /// Returns `Error::ZeroDimensions` if samples have zero dimensions.
    pub(crate) fn new(samples: Vec<Vec<f64>>) -> Result<Self> {
        let n_dims = Self::validate(&samples)?;
        let bandwidths = Self::scotts_rule(&samples, n_dims);
        Ok(Self {
            samples,
            bandwidths,
            n_dims,
        })
    }

    /// Creates a KDE with explicit bandwidths.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new), plus `Error::BandwidthDimensionMismatch`
    /// if the bandwidth count differs from the dimensionality and
    /// `Error::InvalidBandwidth` if any bandwidth is not positive.
    pub(crate) fn with_bandwidths(samples: Vec<Vec<f64>>, bandwidths: Vec<f64>) -> Result<Self> {
        let n_dims = Self::validate(&samples)?;
        if bandwidths.len() != n_dims {
            return Err(Error::BandwidthDimensionMismatch {
                expected: n_dims,
                got: bandwidths.len(),
            });
        }
        if let Some(&bw) = bandwidths.iter().find(|&&bw| bw <= 0.0 || bw.is_nan()) {
            return Err(Error::InvalidBandwidth(bw));
        }
        Ok(Self {
            samples,
            bandwidths,
            n_dims,
        })
    }

    fn validate(samples: &[Vec<f64>]) -> Result<usize> {
        let first = samples.first().ok_or(Error::EmptySamples)?;
        let n_dims = first.len();
        if n_dims == 0 {
            return Err(Error::ZeroDimensions);
        }
        if let Some((sample_index, sample)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != n_dims)
        {
            return Err(Error::DimensionMismatch {
                expected: n_dims,
                got: sample.len(),
                sample_index,
            });
        }
        Ok(n_dims)
    }

    #[allow(clippy::cast_precision_loss)]
    fn scotts_rule(samples: &[Vec<f64>], n_dims: usize) -> Vec<f64> {
        let n = samples.len() as f64;
        let scale_factor = n.powf(-1.0 / (n_dims as f64 + 4.0));

        (0..n_dims)
            .map(|dim| {
                let std_dev = Self::dimension_std_dev(samples, dim);
                // all samples identical in this dimension
                if std_dev < f64::EPSILON {
                    1.0
                } else {
                    scale_factor * std_dev
                }
            })
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn dimension_std_dev(samples: &[Vec<f64>], dim: usize) -> f64 {
        let n = samples.len() as f64;
        let mean = samples.iter().map(|s| s[dim]).sum::<f64>() / n;
        let variance = samples
            .iter()
            .map(|s| (s[dim] - mean).powi(2))
            .sum::<f64>()
            / n;
        variance.sqrt()
    }

    /// Returns the number of dimensions.
    pub(crate) fn n_dims(&self) -> usize {
        self.n_dims
    }

    /// Returns the number of samples.
    pub(crate) fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Returns the bandwidths for each dimension.
    pub(crate) fn bandwidths(&self) -> &[f64] {
        &self.bandwidths
    }

    /// Gives back the kernel centers.
    pub(crate) fn into_samples(self) -> Vec<Vec<f64>> {
        self.samples
    }

    fn check_point(&self, x: &[f64]) -> Result<()> {
        if x.len() == self.n_dims {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.n_dims,
                got: x.len(),
                sample_index: 0,
            })
        }
    }

    /// Returns the log density at `x`.
    ///
    /// `log f(x) = log((1/n) * Σ_i Π_j K_hj(x_j - x_ij))`, summed with the
    /// log-sum-exp trick so far-away points do not underflow to `ln(0)`
    /// before they have to.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if `x.len() != n_dims`.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn log_evaluate(&self, x: &[f64]) -> Result<f64> {
        self.check_point(x)?;
        let n = self.samples.len() as f64;

        // log K_h(z) = -log(h) - 0.5*log(2*pi) - 0.5*z^2
        let log_2pi = (2.0 * core::f64::consts::PI).ln();
        let log_norm: f64 = self
            .bandwidths
            .iter()
            .map(|&h| -h.ln() - 0.5 * log_2pi)
            .sum();

        let log_kernels: Vec<f64> = self
            .samples
            .iter()
            .map(|sample| {
                let quad: f64 = x
                    .iter()
                    .zip(sample)
                    .zip(&self.bandwidths)
                    .map(|((&xj, &sj), &h)| {
                        let z = (xj - sj) / h;
                        z * z
                    })
                    .sum();
                log_norm - 0.5 * quad
            })
            .collect();

        let max_log_kernel = log_kernels
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if max_log_kernel == f64::NEG_INFINITY || max_log_kernel.is_nan() {
            return Ok(max_log_kernel);
        }

        let sum_exp: f64 = log_kernels
            .iter()
            .map(|&lk| (lk - max_log_kernel).exp())
            .sum();

        Ok(-n.ln() + max_log_kernel + sum_exp.ln())
    }

    /// Returns the density at `x`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if `x.len() != n_dims`.
    pub(crate) fn evaluate(&self, x: &[f64]) -> Result<f64> {
        self.log_evaluate(x).map(f64::exp)
    }

    /// Returns the probability mass inside the box `[lower, upper]`.
    ///
    /// Each kernel contributes the product over dimensions of the normal mass
    /// between the standardized edges; the result is the mean over kernels.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if either corner has the wrong length.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn integrate_box(&self, lower: &[f64], upper: &[f64]) -> Result<f64> {
        self.check_point(lower)?;
        self.check_point(upper)?;
        let n = self.samples.len() as f64;
        let total: f64 = self
            .samples
            .iter()
            .map(|sample| {
                sample
                    .iter()
                    .zip(&self.bandwidths)
                    .zip(lower.iter().zip(upper))
                    .map(|((&center, &h), (&lo, &hi))| {
                        if hi <= lo {
                            0.0
                        } else {
                            special::norm_interval_mass((lo - center) / h, (hi - center) / h)
                        }
                    })
                    .product::<f64>()
            })
            .sum();
        Ok(total / n)
    }

    /// Draws one point from the estimated density.
    ///
    /// Picks a kernel center uniformly, then adds independent Gaussian noise
    /// with that dimension's bandwidth.
    pub(crate) fn sample(&self, rng: &mut fastrand::Rng) -> Vec<f64> {
        let center = &self.samples[rng.usize(0..self.samples.len())];
        center
            .iter()
            .zip(&self.bandwidths)
            .map(|(&c, &h)| c + rng_util::standard_normal(rng) * h)
            .collect()
    }

    /// Draws `count` points from the estimated density.
    pub(crate) fn resample(&self, count: usize, rng: &mut fastrand::Rng) -> Vec<Vec<f64>> {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}
