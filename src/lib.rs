#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Bounded prior distributions for Bayesian parameter estimation. Every
//! distribution evaluates a density and its logarithm, draws random samples,
//! and maps raw parameter values back into range through per-parameter
//! boundary conditions: open, closed and reflected edges, or cyclic wrapping.
//!
//! # Getting Started
//!
//! ```
//! use priors::prelude::*;
//!
//! let masses = Uniform::new([
//!     ("mass1", Bounds::new(10.0, 50.0)?),
//!     ("mass2", Bounds::new(10.0, 50.0)?),
//! ])?;
//!
//! let mut prior = JointDistribution::with_seed(7);
//! prior.push(masses)?;
//! prior.push(SolidAngle::uniform_sky()?)?;
//!
//! let point = ParamValues::from([("mass1", 25.0), ("mass2", 12.0), ("dec", 0.3), ("ra", 1.0)]);
//! assert!(prior.logpdf(&point)?.is_finite());
//!
//! let draws = prior.rvs(100)?;
//! assert_eq!(draws.len(), 100);
//! # Ok::<(), priors::Error>(())
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Bounds`] | An interval with typed edges; decides membership and conditions values. |
//! | [`BoundedDistribution`] | The contract every distribution implements: `pdf`, `logpdf`, `rvs`. |
//! | [`ParamValues`] / [`Samples`] | Named values in, labeled sample columns out. |
//! | [`JointDistribution`] | Independent distributions over disjoint parameters. |
//! | [`config`] | Builds distributions from name/option sections. |
//!
//! # Distributions
//!
//! | Type | Name(s) | Density |
//! |------|---------|---------|
//! | [`Uniform`] | `uniform` | constant |
//! | [`Angular`] | `uniform_angle`, `sin_angle`, `cos_angle` | 1, sin θ, cos θ |
//! | [`SolidAngle`] | `uniform_solidangle`, `uniform_sky` | uniform on the sphere |
//! | [`Gaussian`] | `gaussian` | truncated normal |
//! | [`FromFile`] | `fromfile` | kernel density estimate of stored samples |
//! | [`UniformRadius`] | `uniform_radius` | uniform in a ball |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on bounds, values and configuration types | off |
//! | `sample-file` | [`FromFile::open`] and the [`store`] reader for JSON sample files with file locking (enables `serde`) | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod bounds;
pub mod config;
mod distribution;
mod error;
mod joint;
mod kde;
mod rng_util;
mod special;
#[cfg(feature = "sample-file")]
pub mod store;
mod values;

pub use bounds::{BoundType, Bounds, BoundsBuilder};
pub use distribution::{
    AngleKind, Angular, BoundedDistribution, Diagnostic, FromFile, Gaussian, GaussianBuilder,
    SolidAngle, SolidAngleBuilder, SolidAngleKind, Uniform, UniformRadius,
};
pub use error::{Error, Result};
pub use joint::JointDistribution;
pub use values::{ParamValues, Samples};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use priors::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bounds::{BoundType, Bounds};
    pub use crate::config::{DistributionKind, PriorConfig, Section, read_distributions};
    pub use crate::distribution::{
        AngleKind, Angular, BoundedDistribution, Diagnostic, FromFile, Gaussian, SolidAngle,
        SolidAngleKind, Uniform, UniformRadius,
    };
    pub use crate::error::{Error, Result};
    pub use crate::joint::JointDistribution;
    pub use crate::values::{ParamValues, Samples};
}
