//! Kernel density estimation.
//!
//! - `multivariate`: joint Gaussian KDE with a diagonal bandwidth, used
//!   by the empirical [`FromFile`](crate::FromFile) distribution

mod multivariate;

pub(crate) use multivariate::MultivariateKde;
