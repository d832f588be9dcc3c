use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::{BoundedDistribution, BoundedParams, ordered_values};
use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::kde::MultivariateKde;
use crate::values::{ParamValues, Samples};

/// Stand-in for an infinite edge when integrating the KDE over the bounds.
const RANGE_LIMIT: f64 = 2_147_483_648.0;

/// Draws attempted per requested sample before giving up on rejection.
const MAX_ATTEMPTS_PER_SAMPLE: usize = 1000;

/// A density estimated from stored samples with a Gaussian KDE.
///
/// Parameters keep the order in which their columns were supplied (or
/// found in the sample file). The estimate is renormalized to the bounds box
/// so that the truncated density integrates to one.
///
/// # Examples
///
/// ```
/// use priors::{BoundedDistribution, Bounds, FromFile, ParamValues};
///
/// let mass: Vec<f64> = (0..200).map(|i| 10.0 + f64::from(i) * 0.1).collect();
/// let dist = FromFile::from_samples(
///     [("mass", mass)],
///     [("mass", Some(Bounds::new(12.0, 25.0).unwrap()))],
/// )
/// .unwrap();
///
/// assert!(dist.pdf(&ParamValues::from([("mass", 20.0)])).unwrap() > 0.0);
/// assert_eq!(dist.pdf(&ParamValues::from([("mass", 30.0)])).unwrap(), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct FromFile {
    inner: BoundedParams,
    kde: MultivariateKde,
    file_name: Option<PathBuf>,
    norm: f64,
    lognorm: f64,
}

impl FromFile {
    /// Builds the estimate from named columns of equal length.
    ///
    /// `bounds` may name any subset of the columns; the rest are unbounded.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroDimensions`] / [`Error::EmptySamples`] if there are no
    ///   columns or no rows
    /// - [`Error::SampleLengthMismatch`] if columns differ in length
    /// - [`Error::UnknownParameter`] if `bounds` names a missing column
    /// - [`Error::ZeroNormalization`] if the bounds hold no probability mass
    pub fn from_samples<K, C, J, I>(columns: C, bounds: I) -> Result<Self>
    where
        K: Into<String>,
        C: IntoIterator<Item = (K, Vec<f64>)>,
        J: Into<String>,
        I: IntoIterator<Item = (J, Option<Bounds>)>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut data: Vec<Vec<f64>> = Vec::new();
        for (name, column) in columns {
            let name = name.into();
            if names.contains(&name) {
                return Err(Error::DuplicateParameter(name));
            }
            let expected = data.first().map_or(column.len(), Vec::len);
            if expected != column.len() {
                return Err(Error::SampleLengthMismatch {
                    param: name,
                    expected,
                    got: column.len(),
                });
            }
            names.push(name);
            data.push(column);
        }
        if names.is_empty() {
            return Err(Error::ZeroDimensions);
        }
        let n_samples = data.first().map_or(0, Vec::len);
        if n_samples == 0 {
            return Err(Error::EmptySamples);
        }

        let mut slots: BTreeMap<String, Option<Bounds>> =
            names.iter().map(|p| (p.clone(), None)).collect();
        let mut seen = BTreeSet::new();
        for (name, b) in bounds {
            let name = name.into();
            let Some(slot) = slots.get_mut(&name) else {
                return Err(Error::UnknownParameter(name));
            };
            *slot = b;
            if !seen.insert(name.clone()) {
                return Err(Error::DuplicateParameter(name));
            }
        }
        let inner = BoundedParams::new(slots)?.with_order(names)?;

        let rows: Vec<Vec<f64>> = (0..n_samples)
            .map(|i| data.iter().map(|column| column[i]).collect())
            .collect();
        Self::normalized(inner, MultivariateKde::new(rows)?, None)
    }

    /// Replaces the Scott's-rule bandwidths with explicit ones, one per
    /// parameter in [`params`](BoundedDistribution::params) order, and
    /// renormalizes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BandwidthDimensionMismatch`] for the wrong number of
    /// bandwidths, [`Error::InvalidBandwidth`] for a non-positive one and
    /// [`Error::ZeroNormalization`] if the bounds then hold no mass.
    pub fn with_bandwidths(self, bandwidths: Vec<f64>) -> Result<Self> {
        let kde = MultivariateKde::with_bandwidths(self.kde.into_samples(), bandwidths)?;
        Self::normalized(self.inner, kde, self.file_name)
    }

    fn normalized(
        inner: BoundedParams,
        kde: MultivariateKde,
        file_name: Option<PathBuf>,
    ) -> Result<Self> {
        let mut lower = Vec::with_capacity(inner.params().len());
        let mut upper = Vec::with_capacity(inner.params().len());
        for p in inner.params() {
            let b = inner.get(p)?;
            lower.push(limit_range(b.min()));
            upper.push(limit_range(b.max()));
        }
        let mass = kde.integrate_box(&lower, &upper)?;
        trace_debug!(params = ?inner.params(), mass, "normalized sample density");
        if mass.is_nan() || mass <= 0.0 {
            return Err(Error::ZeroNormalization(inner.params().join(", ")));
        }

        Ok(Self {
            inner,
            kde,
            file_name,
            norm: 1.0 / mass,
            lognorm: -mass.ln(),
        })
    }

    /// Reads the sample store at `path` and builds the estimate.
    ///
    /// When `params` is empty every stored parameter is used, in file order;
    /// otherwise only the named ones, each with its optional bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleStore`] if the file cannot be read,
    /// [`Error::MissingParameter`] if a named parameter is not stored, and
    /// anything [`from_samples`](Self::from_samples) returns.
    #[cfg(feature = "sample-file")]
    pub fn open<P, K, I>(path: P, params: I) -> Result<Self>
    where
        P: AsRef<Path>,
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Bounds>)>,
    {
        let path = path.as_ref();
        let params: Vec<(String, Option<Bounds>)> =
            params.into_iter().map(|(k, b)| (k.into(), b)).collect();
        let filter: Vec<&str> = params.iter().map(|(p, _)| p.as_str()).collect();
        let columns =
            crate::store::read_samples(path, (!filter.is_empty()).then_some(filter.as_slice()))?;
        let mut dist = Self::from_samples(columns, params)?;
        dist.file_name = Some(path.to_path_buf());
        Ok(dist)
    }

    /// The sample file this distribution was read from, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        self.norm
    }

    #[must_use]
    pub fn lognorm(&self) -> f64 {
        self.lognorm
    }

    /// Number of stored samples behind the estimate.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.kde.n_samples()
    }

    /// Kernel bandwidth per parameter, in [`params`](BoundedDistribution::params) order.
    #[must_use]
    pub fn bandwidths(&self) -> &[f64] {
        self.kde.bandwidths()
    }

    /// Conditions a KDE draw through the bounds; `None` if it lands outside.
    fn condition(&self, mut point: Vec<f64>) -> Option<Vec<f64>> {
        for (value, p) in point.iter_mut().zip(self.inner.params()) {
            let b = self.inner.bounds().get(p)?;
            *value = b.apply_conditions(*value);
            if !b.contains(*value) {
                return None;
            }
        }
        Some(point)
    }
}

fn limit_range(edge: f64) -> f64 {
    if edge.is_infinite() {
        RANGE_LIMIT.copysign(edge)
    } else {
        edge
    }
}

impl BoundedDistribution for FromFile {
    fn name(&self) -> &'static str {
        "fromfile"
    }

    fn params(&self) -> &[String] {
        self.inner.params()
    }

    fn bounds(&self) -> &BTreeMap<String, Bounds> {
        self.inner.bounds()
    }

    fn pdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        let point = ordered_values(self.inner.params(), values)?;
        if !self.inner.contains(values)? {
            return Ok(0.0);
        }
        // may underflow to 0 far from every kernel; logpdf stays finite
        Ok(self.norm * self.kde.evaluate(&point)?)
    }

    fn logpdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        let point = ordered_values(self.inner.params(), values)?;
        if !self.inner.contains(values)? {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(self.lognorm + self.kde.log_evaluate(&point)?)
    }

    fn rvs(
        &self,
        count: usize,
        param: Option<&str>,
        rng: &mut fastrand::Rng,
    ) -> Result<Samples> {
        let selected = self.inner.selected(param)?;
        let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(count); self.kde.n_dims()];
        let mut attempts = count.saturating_mul(MAX_ATTEMPTS_PER_SAMPLE);
        loop {
            let remaining = count - columns.first().map_or(0, Vec::len);
            if remaining == 0 {
                break;
            }
            if attempts < remaining {
                return Err(Error::Internal("too many KDE draws rejected by the bounds"));
            }
            attempts -= remaining;
            for point in self.kde.resample(remaining, rng) {
                let Some(point) = self.condition(point) else {
                    continue;
                };
                for (column, value) in columns.iter_mut().zip(point) {
                    column.push(value);
                }
            }
        }

        let mut out = Samples::new(count);
        for (p, column) in self.inner.params().iter().zip(columns) {
            if selected.contains(&p.as_str()) {
                out.insert(p.as_str(), column)?;
            }
        }
        Ok(out)
    }
}
