//! Building distributions from configuration sections.
//!
//! A [`Section`] describes one distribution. Its `tag` lists the variable
//! parameters joined by [`VARARGS_DELIM`] and its options hold string
//! values, as read from an INI-style file:
//!
//! ```ini
//! [prior-mass1+mass2]
//! name = uniform
//! min-mass1 = 10
//! max-mass1 = 50
//! min-mass2 = 10
//! max-mass2 = 50
//! ```
//!
//! Bounds for parameter `p` come from `min-p` and `max-p`, with optional
//! `btype-min-p` / `btype-max-p` (`open`, `closed` or `reflected`; the
//! defaults are a closed minimum and an open maximum) and `cyclic-p`, whose
//! presence alone makes the bounds cyclic. Angular distributions read their
//! bounds in multiples of π.
//!
//! | `name` | Extra options |
//! |--------|---------------|
//! | `uniform` | |
//! | `uniform_angle`, `sin_angle`, `cos_angle` | |
//! | `uniform_solidangle`, `uniform_sky` | `polar-angle`, `azimuthal-angle` |
//! | `uniform_radius` | `dim` |
//! | `gaussian` | `{p}_mean`, `{p}_var` |
//! | `fromfile` | `file_name` (required) |
//!
//! Any other option is rejected.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::{BoundType, Bounds};
use crate::distribution::{
    AngleKind, Angular, BoundedDistribution, Gaussian, SolidAngle, SolidAngleKind, Uniform,
    UniformRadius,
};
use crate::error::{Error, Result};
use crate::joint::JointDistribution;

/// Separates parameter names in a section tag.
pub const VARARGS_DELIM: char = '+';

/// One distribution's configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Section {
    /// Variable parameter names joined by [`VARARGS_DELIM`].
    pub tag: String,
    /// Option names mapped to their raw values.
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: BTreeMap<String, String>,
}

impl Section {
    /// Creates a section with no options.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            options: BTreeMap::new(),
        }
    }

    /// Adds an option, replacing any earlier value.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Raw value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// The parameter names listed in the tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedConfiguration`] if a name is empty.
    pub fn variable_args(&self) -> Result<Vec<&str>> {
        let args: Vec<&str> = self.tag.split(VARARGS_DELIM).map(str::trim).collect();
        if args.iter().any(|a| a.is_empty()) {
            return Err(Error::UnsupportedConfiguration(format!(
                "empty parameter name in tag '{}'",
                self.tag
            )));
        }
        Ok(args)
    }

    fn parse_f64(&self, key: &str) -> Result<Option<f64>> {
        self.get(key)
            .map(|raw| {
                raw.trim().parse::<f64>().map_err(|_| {
                    Error::UnsupportedConfiguration(format!(
                        "option '{key}' in [{}] is not a number: '{raw}'",
                        self.tag
                    ))
                })
            })
            .transpose()
    }

    /// Rejects any option not in `allowed`.
    fn check_options(&self, allowed: &[String]) -> Result<()> {
        match self.options.keys().find(|k| !allowed.contains(k)) {
            Some(key) => Err(Error::UnsupportedConfiguration(format!(
                "unrecognized option '{key}' in [{}]",
                self.tag
            ))),
            None => Ok(()),
        }
    }
}

/// A whole prior: one section per distribution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriorConfig {
    pub sections: Vec<Section>,
}

impl PriorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section.
    #[must_use]
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

/// Reads the bounds of `param` from `section`.
///
/// Returns `Ok(None)` when neither `min-{param}` nor `max-{param}` is set;
/// the other bound options are then ignored.
///
/// # Errors
///
/// - [`Error::InvalidBounds`] if only one of the two edges is given, or the
///   edges are inconsistent
/// - [`Error::UnsupportedConfiguration`] for unparseable numbers or bound types
pub fn bounds_from_section(section: &Section, param: &str) -> Result<Option<Bounds>> {
    let min = section.parse_f64(&format!("min-{param}"))?;
    let max = section.parse_f64(&format!("max-{param}"))?;
    let (min, max) = match (min, max) {
        (None, None) => return Ok(None),
        (Some(min), Some(max)) => (min, max),
        (min, max) => {
            return Err(Error::InvalidBounds {
                min: min.unwrap_or(f64::NAN),
                max: max.unwrap_or(f64::NAN),
                reason: "both a minimum and a maximum must be given",
            });
        }
    };
    let btype = |key: String, default: BoundType| -> Result<BoundType> {
        section.get(&key).map_or(Ok(default), |raw| raw.trim().parse())
    };
    let bounds = Bounds::builder(min, max)
        .min_type(btype(format!("btype-min-{param}"), BoundType::Closed)?)
        .max_type(btype(format!("btype-max-{param}"), BoundType::Open)?)
        .cyclic(section.get(&format!("cyclic-{param}")).is_some())
        .build()?;
    Ok(Some(bounds))
}

fn bound_options(args: &[&str]) -> Vec<String> {
    let mut keys = vec!["name".to_owned()];
    for arg in args {
        for prefix in ["min", "max", "btype-min", "btype-max", "cyclic"] {
            keys.push(format!("{prefix}-{arg}"));
        }
    }
    keys
}

fn bounds_for_args<'a>(
    section: &Section,
    args: &[&'a str],
) -> Result<Vec<(&'a str, Option<Bounds>)>> {
    args.iter()
        .map(|&arg| Ok((arg, bounds_from_section(section, arg)?)))
        .collect()
}

/// The distributions that can be named in a section's `name` option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistributionKind {
    Uniform,
    UniformAngle,
    SinAngle,
    CosAngle,
    #[cfg_attr(feature = "serde", serde(rename = "uniform_solidangle"))]
    UniformSolidAngle,
    UniformSky,
    UniformRadius,
    Gaussian,
    #[cfg_attr(feature = "serde", serde(rename = "fromfile"))]
    FromFile,
}

impl DistributionKind {
    /// Every kind, in registry order.
    pub const ALL: [Self; 9] = [
        Self::Uniform,
        Self::UniformAngle,
        Self::CosAngle,
        Self::SinAngle,
        Self::UniformSolidAngle,
        Self::UniformSky,
        Self::UniformRadius,
        Self::Gaussian,
        Self::FromFile,
    ];

    /// The name used in configuration and returned by
    /// [`BoundedDistribution::name`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::UniformAngle => AngleKind::Uniform.name(),
            Self::SinAngle => AngleKind::Sin.name(),
            Self::CosAngle => AngleKind::Cos.name(),
            Self::UniformSolidAngle => SolidAngleKind::UniformSolidAngle.name(),
            Self::UniformSky => SolidAngleKind::UniformSky.name(),
            Self::UniformRadius => "uniform_radius",
            Self::Gaussian => "gaussian",
            Self::FromFile => "fromfile",
        }
    }

    /// Builds a distribution of this kind from `section`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedConfiguration`] for unknown options or
    /// malformed values, and any error the distribution's constructor returns.
    pub fn from_section(self, section: &Section) -> Result<Box<dyn BoundedDistribution>> {
        let args = section.variable_args()?;
        let mut allowed = bound_options(&args);
        let dist: Box<dyn BoundedDistribution> = match self {
            Self::Uniform => {
                section.check_options(&allowed)?;
                Box::new(Uniform::with_optional_bounds(bounds_for_args(
                    section, &args,
                )?)?)
            }
            Self::UniformAngle | Self::SinAngle | Self::CosAngle => {
                section.check_options(&allowed)?;
                let kind = match self {
                    Self::SinAngle => AngleKind::Sin,
                    Self::CosAngle => AngleKind::Cos,
                    _ => AngleKind::Uniform,
                };
                Box::new(Angular::new(kind, bounds_for_args(section, &args)?)?)
            }
            Self::UniformSolidAngle | Self::UniformSky => {
                allowed.extend(["polar-angle".to_owned(), "azimuthal-angle".to_owned()]);
                section.check_options(&allowed)?;
                Box::new(solid_angle_from_section(self, section, &args)?)
            }
            Self::UniformRadius => {
                allowed.push("dim".to_owned());
                section.check_options(&allowed)?;
                let dim = match section.get("dim") {
                    Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                        Error::UnsupportedConfiguration(format!(
                            "option 'dim' in [{}] is not a positive integer: '{raw}'",
                            section.tag
                        ))
                    })?,
                    None => UniformRadius::DEFAULT_DIM,
                };
                Box::new(UniformRadius::with_optional_bounds(
                    bounds_for_args(section, &args)?,
                    dim,
                )?)
            }
            Self::Gaussian => {
                for arg in &args {
                    allowed.extend([format!("{arg}_mean"), format!("{arg}_var")]);
                }
                section.check_options(&allowed)?;
                let mut builder = Gaussian::builder();
                for (arg, bounds) in bounds_for_args(section, &args)? {
                    builder = builder.param(arg, bounds);
                    if let Some(mean) = section.parse_f64(&format!("{arg}_mean"))? {
                        builder = builder.mean(arg, mean);
                    }
                    if let Some(var) = section.parse_f64(&format!("{arg}_var"))? {
                        builder = builder.var(arg, var);
                    }
                }
                Box::new(builder.build()?)
            }
            Self::FromFile => {
                allowed.push("file_name".to_owned());
                section.check_options(&allowed)?;
                from_file_section(section, &args)?
            }
        };
        Ok(dist)
    }
}

fn solid_angle_from_section(
    kind: DistributionKind,
    section: &Section,
    args: &[&str],
) -> Result<SolidAngle> {
    let kind = match kind {
        DistributionKind::UniformSky => SolidAngleKind::UniformSky,
        _ => SolidAngleKind::UniformSolidAngle,
    };
    let polar = section
        .get("polar-angle")
        .map_or(kind.default_polar_angle(), str::trim);
    let azimuthal = section
        .get("azimuthal-angle")
        .map_or(kind.default_azimuthal_angle(), str::trim);
    for angle in [polar, azimuthal] {
        if !args.contains(&angle) {
            return Err(Error::UnsupportedConfiguration(format!(
                "angle '{angle}' must be one of the parameters in [{}]",
                section.tag
            )));
        }
    }
    SolidAngle::builder(kind)
        .polar_angle(polar)
        .azimuthal_angle(azimuthal)
        .polar_bounds(bounds_from_section(section, polar)?)
        .azimuthal_bounds(bounds_from_section(section, azimuthal)?)
        .build()
}

#[cfg(feature = "sample-file")]
fn from_file_section(section: &Section, args: &[&str]) -> Result<Box<dyn BoundedDistribution>> {
    let file_name = section.get("file_name").ok_or_else(|| {
        Error::UnsupportedConfiguration(format!(
            "a file_name must be given for fromfile in [{}]",
            section.tag
        ))
    })?;
    Ok(Box::new(crate::distribution::FromFile::open(
        file_name.trim(),
        bounds_for_args(section, args)?,
    )?))
}

#[cfg(not(feature = "sample-file"))]
fn from_file_section(section: &Section, _args: &[&str]) -> Result<Box<dyn BoundedDistribution>> {
    Err(Error::UnsupportedConfiguration(format!(
        "fromfile in [{}] needs the sample-file feature",
        section.tag
    )))
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| Error::UnsupportedConfiguration(format!("unknown distribution '{s}'")))
    }
}

/// Builds the distribution a section names in its `name` option.
///
/// # Errors
///
/// Returns [`Error::UnsupportedConfiguration`] if `name` is missing or
/// unknown, and anything [`DistributionKind::from_section`] returns.
pub fn distribution_from_section(section: &Section) -> Result<Box<dyn BoundedDistribution>> {
    let name = section.get("name").ok_or_else(|| {
        Error::UnsupportedConfiguration(format!("no distribution name in [{}]", section.tag))
    })?;
    name.trim().parse::<DistributionKind>()?.from_section(section)
}

/// Builds every section of `config` into one joint prior.
///
/// # Errors
///
/// Returns [`Error::DuplicateParameter`] if two sections share a parameter,
/// and any error from building a section.
pub fn read_distributions(config: &PriorConfig) -> Result<JointDistribution> {
    let mut joint = JointDistribution::new();
    for section in &config.sections {
        joint.push_boxed(distribution_from_section(section)?)?;
    }
    Ok(joint)
}
