use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{AngleKind, Angular, BoundedDistribution};
use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::values::{ParamValues, Samples};

/// Which pair of angles a [`SolidAngle`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolidAngleKind {
    /// Polar angle from the pole (`sin θ`) and an azimuth: `theta`, `phi`.
    UniformSolidAngle,
    /// Declination from the equator (`cos δ`) and right ascension: `dec`, `ra`.
    UniformSky,
}

impl SolidAngleKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::UniformSolidAngle => "uniform_solidangle",
            Self::UniformSky => "uniform_sky",
        }
    }

    /// The density shape of the polar component.
    #[must_use]
    pub fn polar_kind(self) -> AngleKind {
        match self {
            Self::UniformSolidAngle => AngleKind::Sin,
            Self::UniformSky => AngleKind::Cos,
        }
    }

    #[must_use]
    pub fn default_polar_angle(self) -> &'static str {
        match self {
            Self::UniformSolidAngle => "theta",
            Self::UniformSky => "dec",
        }
    }

    #[must_use]
    pub fn default_azimuthal_angle(self) -> &'static str {
        match self {
            Self::UniformSolidAngle => "phi",
            Self::UniformSky => "ra",
        }
    }
}

/// A distribution uniform over (part of) the unit sphere.
///
/// Composed of a polar [`Angular`] component and a uniform azimuthal one;
/// the density is their product.
///
/// # Examples
///
/// ```
/// use priors::{BoundedDistribution, ParamValues, SolidAngle};
///
/// let sky = SolidAngle::uniform_sky().unwrap();
/// assert_eq!(sky.params(), ["dec".to_owned(), "ra".to_owned()]);
///
/// let dist = SolidAngle::builder(priors::SolidAngleKind::UniformSolidAngle)
///     .polar_angle("inclination")
///     .azimuthal_angle("polarization")
///     .build()
///     .unwrap();
/// let values = ParamValues::from([("inclination", 1.0), ("polarization", 2.0)]);
/// assert!(dist.pdf(&values).unwrap() > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct SolidAngle {
    kind: SolidAngleKind,
    polar: Angular,
    azimuthal: Angular,
    params: Vec<String>,
    bounds: BTreeMap<String, Bounds>,
}

impl SolidAngle {
    /// Starts a builder for the given kind with its default angle names.
    #[must_use]
    pub fn builder(kind: SolidAngleKind) -> SolidAngleBuilder {
        SolidAngleBuilder::new(kind)
    }

    /// The full sphere over `theta` and `phi`.
    ///
    /// # Errors
    ///
    /// Never fails with the default names and bounds.
    pub fn uniform_solid_angle() -> Result<Self> {
        Self::builder(SolidAngleKind::UniformSolidAngle).build()
    }

    /// The full sky over `dec` and `ra`.
    ///
    /// # Errors
    ///
    /// Never fails with the default names and bounds.
    pub fn uniform_sky() -> Result<Self> {
        Self::builder(SolidAngleKind::UniformSky).build()
    }

    #[must_use]
    pub fn kind(&self) -> SolidAngleKind {
        self.kind
    }

    /// Name of the polar angle parameter.
    #[must_use]
    pub fn polar_angle(&self) -> &str {
        first_param(&self.polar)
    }

    /// Name of the azimuthal angle parameter.
    #[must_use]
    pub fn azimuthal_angle(&self) -> &str {
        first_param(&self.azimuthal)
    }

    /// The polar component.
    #[must_use]
    pub fn polar(&self) -> &Angular {
        &self.polar
    }

    /// The azimuthal component.
    #[must_use]
    pub fn azimuthal(&self) -> &Angular {
        &self.azimuthal
    }
}

fn first_param(component: &Angular) -> &str {
    component.params().first().map_or("", String::as_str)
}

impl BoundedDistribution for SolidAngle {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn params(&self) -> &[String] {
        &self.params
    }

    fn bounds(&self) -> &BTreeMap<String, Bounds> {
        &self.bounds
    }

    fn apply_boundary_conditions(&self, values: &ParamValues) -> ParamValues {
        let mut out = self.polar.apply_boundary_conditions(values);
        out.extend_from(&self.azimuthal.apply_boundary_conditions(values));
        out
    }

    fn pdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        Ok(self.polar.pdf_conditioned(values)? * self.azimuthal.pdf_conditioned(values)?)
    }

    fn logpdf_conditioned(&self, values: &ParamValues) -> Result<f64> {
        Ok(self.polar.logpdf_conditioned(values)? + self.azimuthal.logpdf_conditioned(values)?)
    }

    fn rvs(
        &self,
        count: usize,
        param: Option<&str>,
        rng: &mut fastrand::Rng,
    ) -> Result<Samples> {
        match param {
            None => {
                let mut out = self.polar.rvs(count, None, rng)?;
                out.merge(self.azimuthal.rvs(count, None, rng)?)?;
                Ok(out)
            }
            Some(p) if p == self.polar_angle() => self.polar.rvs(count, Some(p), rng),
            Some(p) if p == self.azimuthal_angle() => self.azimuthal.rvs(count, Some(p), rng),
            Some(p) => Err(Error::UnknownParameter(p.to_owned())),
        }
    }
}

/// Builder for [`SolidAngle`].
///
/// Bounds are in multiples of π, as for [`Angular`].
#[derive(Clone, Debug)]
pub struct SolidAngleBuilder {
    kind: SolidAngleKind,
    polar_angle: String,
    azimuthal_angle: String,
    polar_bounds: Option<Bounds>,
    azimuthal_bounds: Option<Bounds>,
}

impl SolidAngleBuilder {
    fn new(kind: SolidAngleKind) -> Self {
        Self {
            kind,
            polar_angle: kind.default_polar_angle().to_owned(),
            azimuthal_angle: kind.default_azimuthal_angle().to_owned(),
            polar_bounds: None,
            azimuthal_bounds: None,
        }
    }

    #[must_use]
    pub fn polar_angle(mut self, name: impl Into<String>) -> Self {
        self.polar_angle = name.into();
        self
    }

    #[must_use]
    pub fn azimuthal_angle(mut self, name: impl Into<String>) -> Self {
        self.azimuthal_angle = name.into();
        self
    }

    /// Restricts the polar angle; `None` keeps the full domain.
    #[must_use]
    pub fn polar_bounds(mut self, bounds: Option<Bounds>) -> Self {
        self.polar_bounds = bounds;
        self
    }

    /// Restricts the azimuthal angle; `None` keeps the full circle.
    #[must_use]
    pub fn azimuthal_bounds(mut self, bounds: Option<Bounds>) -> Self {
        self.azimuthal_bounds = bounds;
        self
    }

    /// Builds the distribution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateParameter`] if both angles share a name and
    /// [`Error::OutOfDomain`] if either bound leaves its domain.
    pub fn build(self) -> Result<SolidAngle> {
        if self.polar_angle == self.azimuthal_angle {
            return Err(Error::DuplicateParameter(self.polar_angle));
        }
        let polar = Angular::new(
            self.kind.polar_kind(),
            [(self.polar_angle, self.polar_bounds)],
        )?;
        let azimuthal = Angular::uniform_angle([(self.azimuthal_angle, self.azimuthal_bounds)])?;
        let bounds: BTreeMap<String, Bounds> = polar
            .bounds()
            .iter()
            .chain(azimuthal.bounds())
            .map(|(p, b)| (p.clone(), *b))
            .collect();
        let params = bounds.keys().cloned().collect();
        Ok(SolidAngle {
            kind: self.kind,
            polar,
            azimuthal,
            params,
            bounds,
        })
    }
}
