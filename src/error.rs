#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when bounds are malformed or mutually inconsistent.
    #[error("invalid bounds [{min}, {max}]: {reason}")]
    InvalidBounds {
        /// The lower edge.
        min: f64,
        /// The upper edge.
        max: f64,
        /// What is wrong with the edges.
        reason: &'static str,
    },

    /// Returned when a distribution needs bounds for a parameter but none were given.
    #[error("bounds are required for parameter '{0}'")]
    BoundsRequired(String),

    /// Returned when user bounds fall outside an angular distribution's domain.
    #[error(
        "bounds for '{param}' must lie in [{domain_min}, {domain_max}]; got [{min}, {max}]"
    )]
    OutOfDomain {
        /// The parameter whose bounds were rejected.
        param: String,
        /// Requested lower edge, in radians.
        min: f64,
        /// Requested upper edge, in radians.
        max: f64,
        /// Lower edge of the fixed domain, in radians.
        domain_min: f64,
        /// Upper edge of the fixed domain, in radians.
        domain_max: f64,
    },

    /// Returned when a required parameter is absent from a query or an override.
    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    /// Returned when a parameter name is not declared by the distribution.
    #[error("unrecognized parameter '{0}'")]
    UnknownParameter(String),

    /// Returned when the same parameter is declared more than once.
    #[error("parameter '{0}' is declared by more than one distribution")]
    DuplicateParameter(String),

    /// Returned for unknown distribution names, options, or unparseable option values.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// Returned when a Gaussian variance is not strictly positive and finite.
    #[error("invalid variance for '{param}': {var} must be positive and finite")]
    InvalidVariance {
        /// The parameter the variance belongs to.
        param: String,
        /// The rejected variance.
        var: f64,
    },

    /// Returned when the radius dimension is zero.
    #[error("invalid dimension: {0} must be at least 1")]
    InvalidDimension(u32),

    /// Returned when the bounds enclose no probability mass.
    #[error("no probability mass inside the bounds of {0}")]
    ZeroNormalization(String),

    /// Returned when KDE is created with empty samples.
    #[error("KDE requires at least one sample")]
    EmptySamples,

    /// Returned when multivariate KDE samples have zero dimensions.
    #[error("multivariate KDE samples must have at least one dimension")]
    ZeroDimensions,

    /// Returned when multivariate KDE samples have inconsistent dimensions.
    #[error(
        "dimension mismatch: expected {expected} dimensions but sample {sample_index} has {got}"
    )]
    DimensionMismatch {
        /// The expected number of dimensions.
        expected: usize,
        /// The actual number of dimensions in the sample.
        got: usize,
        /// The index of the sample with mismatched dimensions.
        sample_index: usize,
    },

    /// Returned when bandwidth is not positive.
    #[error("invalid bandwidth: {0} must be positive")]
    InvalidBandwidth(f64),

    /// Returned when bandwidth vector length doesn't match the number of dimensions.
    #[error("bandwidth dimension mismatch: expected {expected} bandwidths but got {got}")]
    BandwidthDimensionMismatch {
        /// The expected number of bandwidths.
        expected: usize,
        /// The actual number of bandwidths provided.
        got: usize,
    },

    /// Returned when stored sample columns have different lengths.
    #[error("sample column '{param}' has {got} values, expected {expected}")]
    SampleLengthMismatch {
        /// The offending column.
        param: String,
        /// Length of the first column.
        expected: usize,
        /// Length of the offending column.
        got: usize,
    },

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),

    /// Returned when the sample store cannot be read or parsed.
    #[cfg(feature = "sample-file")]
    #[error("sample store error: {0}")]
    SampleStore(String),
}

pub type Result<T> = core::result::Result<T, Error>;
