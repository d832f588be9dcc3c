//! A registry of independent distributions over disjoint parameters.

use parking_lot::Mutex;

use crate::distribution::{BoundedDistribution, Diagnostic};
use crate::error::{Error, Result};
use crate::values::{ParamValues, Samples};

/// Independent distributions combined into one prior.
///
/// Each parameter belongs to exactly one member. The joint density is the
/// product of the members' densities.
///
/// # Examples
///
/// ```
/// use priors::{Angular, Bounds, JointDistribution, ParamValues, Uniform};
///
/// let mut prior = JointDistribution::with_seed(42);
/// prior.push(Uniform::new([("mass", Bounds::new(1.0, 3.0).unwrap())]).unwrap()).unwrap();
/// prior.push(Angular::uniform_angle([("phase", None)]).unwrap()).unwrap();
///
/// // the same parameter cannot be registered twice
/// let again = Uniform::new([("mass", Bounds::new(0.0, 1.0).unwrap())]).unwrap();
/// assert!(prior.push(again).is_err());
///
/// let draws = prior.rvs(10).unwrap();
/// for row in draws.rows() {
///     assert!(prior.logpdf(&row).unwrap().is_finite());
/// }
/// ```
#[derive(Debug)]
pub struct JointDistribution {
    members: Vec<Box<dyn BoundedDistribution>>,
    params: Vec<String>,
    rng: Mutex<fastrand::Rng>,
}

impl JointDistribution {
    /// Creates an empty registry with a randomly seeded RNG.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            params: Vec::new(),
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Creates an empty registry whose [`rvs`](Self::rvs) draws are reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            members: Vec::new(),
            params: Vec::new(),
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// Registers a distribution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateParameter`] if any of its parameters is
    /// already covered by a registered distribution.
    pub fn push<D>(&mut self, dist: D) -> Result<()>
    where
        D: BoundedDistribution + 'static,
    {
        self.push_boxed(Box::new(dist))
    }

    /// Registers an already boxed distribution.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn push_boxed(&mut self, dist: Box<dyn BoundedDistribution>) -> Result<()> {
        if let Some(p) = dist.params().iter().find(|p| self.params.contains(p)) {
            return Err(Error::DuplicateParameter(p.clone()));
        }
        trace_info!(distribution = dist.name(), params = ?dist.params(), "registered distribution");
        self.params.extend(dist.params().iter().cloned());
        self.members.push(dist);
        Ok(())
    }

    /// Every registered parameter, in registration order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The registered distributions, in registration order.
    pub fn distributions(&self) -> impl Iterator<Item = &dyn BoundedDistribution> {
        self.members.iter().map(|d| &**d)
    }

    /// The distribution that declares `param`.
    #[must_use]
    pub fn distribution_for(&self, param: &str) -> Option<&dyn BoundedDistribution> {
        self.distributions()
            .find(|d| d.params().iter().any(|p| p == param))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Applies every member's boundary conditions; undeclared keys are dropped.
    #[must_use]
    pub fn apply_boundary_conditions(&self, values: &ParamValues) -> ParamValues {
        let mut out = ParamValues::new();
        for dist in &self.members {
            out.extend_from(&dist.apply_boundary_conditions(values));
        }
        out
    }

    /// Whether every member contains its parameters' conditioned values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a registered parameter is absent.
    pub fn contains(&self, values: &ParamValues) -> Result<bool> {
        for dist in &self.members {
            if !dist.contains(values)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Product of the members' densities.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a registered parameter is absent.
    pub fn pdf(&self, values: &ParamValues) -> Result<f64> {
        let mut density = 1.0;
        for dist in &self.members {
            density *= dist.pdf(values)?;
        }
        Ok(density)
    }

    /// Sum of the members' log densities, stopping at the first `-inf`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a registered parameter is absent.
    pub fn logpdf(&self, values: &ParamValues) -> Result<f64> {
        let mut total = 0.0;
        for dist in &self.members {
            let log = dist.logpdf(values)?;
            if log.is_infinite() && log.is_sign_negative() {
                return Ok(log);
            }
            total += log;
        }
        Ok(total)
    }

    /// Draws `count` joint samples with the registry's own RNG.
    ///
    /// # Errors
    ///
    /// Propagates any member's sampling error.
    pub fn rvs(&self, count: usize) -> Result<Samples> {
        let mut rng = self.rng.lock();
        self.rvs_with(count, &mut rng)
    }

    /// Draws `count` joint samples with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// Propagates any member's sampling error.
    pub fn rvs_with(&self, count: usize, rng: &mut fastrand::Rng) -> Result<Samples> {
        let mut out = Samples::new(count);
        for dist in &self.members {
            out.merge(dist.rvs(count, None, rng)?)?;
        }
        Ok(out)
    }

    /// Diagnostics of every member.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.members.iter().flat_map(|d| d.diagnostics()).collect()
    }
}

impl Default for JointDistribution {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{BoundType, Bounds};
    use crate::distribution::{Gaussian, Uniform};

    fn prior() -> JointDistribution {
        let mut joint = JointDistribution::with_seed(7);
        joint
            .push(Uniform::new([("a", Bounds::new(0.0, 4.0).unwrap())]).unwrap())
            .unwrap();
        joint
            .push(Gaussian::builder().param("b", None).build().unwrap())
            .unwrap();
        joint
    }

    #[test]
    fn test_overlap_rejected() {
        let mut joint = prior();
        let overlapping = Uniform::new([
            ("c", Bounds::new(0.0, 1.0).unwrap()),
            ("b", Bounds::new(0.0, 1.0).unwrap()),
        ])
        .unwrap();
        assert!(matches!(
            joint.push(overlapping),
            Err(Error::DuplicateParameter(p)) if p == "b"
        ));
        assert_eq!(joint.len(), 2);
        assert_eq!(joint.params(), ["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn test_pdf_is_product() {
        let joint = prior();
        let values = ParamValues::from([("a", 1.0), ("b", 0.0)]);
        let expected = 0.25 * (-0.5 * (2.0 * core::f64::consts::PI).ln()).exp();
        assert!((joint.pdf(&values).unwrap() - expected).abs() < 1e-12);
        assert!((joint.logpdf(&values).unwrap() - expected.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_logpdf_short_circuits() {
        let joint = prior();
        let values = ParamValues::from([("a", 9.0)]);
        assert_eq!(joint.logpdf(&values).unwrap(), f64::NEG_INFINITY);
        assert!(!joint.contains(&values).unwrap());
    }

    #[test]
    fn test_seeded_rvs_reproducible() {
        let first = prior().rvs(5).unwrap();
        let second = prior().rvs(5).unwrap();
        assert_eq!(first.get("a"), second.get("a"));
        assert_eq!(first.get("b"), second.get("b"));
    }

    #[test]
    fn test_lookup_and_diagnostics() {
        let mut joint = prior();
        let reflected = Bounds::builder(0.0, 1.0)
            .min_type(BoundType::Reflected)
            .build()
            .unwrap();
        joint.push(Uniform::new([("c", reflected)]).unwrap()).unwrap();
        assert_eq!(joint.distribution_for("b").map(|d| d.name()), Some("gaussian"));
        assert!(joint.distribution_for("z").is_none());
        assert_eq!(joint.diagnostics().len(), 1);
    }
}
