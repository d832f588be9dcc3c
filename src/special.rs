//! Error function and standard normal helpers.

use core::f64::consts::{FRAC_2_SQRT_PI, SQRT_2};

/// Chebyshev coefficients for `erfc` on `z >= 0`.
const ERFC_COF: [f64; 28] = [
    -1.302_653_719_781_709_4,
    6.419_697_923_564_902_6e-1,
    1.947_647_320_418_583_6e-2,
    -9.561_514_786_808_631e-3,
    -9.465_953_444_820_36e-4,
    3.668_394_978_527_61e-4,
    4.252_332_480_690_7e-5,
    -2.027_857_811_253_4e-5,
    -1.624_290_004_647e-6,
    1.303_655_835_580e-6,
    1.562_644_172_2e-8,
    -8.523_809_591_5e-8,
    6.529_054_439e-9,
    5.059_343_495e-9,
    -9.913_641_56e-10,
    -2.273_651_22e-10,
    9.646_791_1e-11,
    2.394_038e-12,
    -6.886_027e-12,
    8.944_87e-13,
    3.130_92e-13,
    -1.127_08e-13,
    3.81e-16,
    7.106e-15,
    -1.523e-15,
    -9.4e-17,
    1.21e-16,
    -2.8e-17,
];

/// Chebyshev evaluation of `erfc(z)` for `z >= 0`, accurate to double precision.
fn erfc_cheb(z: f64) -> f64 {
    let t = 2.0 / (2.0 + z);
    let ty = 4.0 * t - 2.0;
    let mut d = 0.0;
    let mut dd = 0.0;
    for &c in ERFC_COF[1..].iter().rev() {
        let tmp = d;
        d = ty * d - dd + c;
        dd = tmp;
    }
    t * (-z * z + 0.5 * (ERFC_COF[0] + ty * d) - dd).exp()
}

/// Complementary error function `erfc(x) = 1 - erf(x)`.
pub(crate) fn erfc(x: f64) -> f64 {
    if x >= 0.0 {
        erfc_cheb(x)
    } else if x < 0.0 {
        2.0 - erfc_cheb(-x)
    } else {
        f64::NAN
    }
}

/// Inverse of [`erfc`] on `(0, 2)`, refined with two Halley steps.
fn inverse_erfc(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::INFINITY;
    }
    if p >= 2.0 {
        return f64::NEG_INFINITY;
    }
    let pp = if p < 1.0 { p } else { 2.0 - p };
    let t = (-2.0 * (pp / 2.0).ln()).sqrt();
    let mut x = -core::f64::consts::FRAC_1_SQRT_2
        * ((2.307_53 + t * 0.270_61) / (1.0 + t * (0.992_29 + t * 0.044_81)) - t);
    for _ in 0..2 {
        let err = erfc(x) - pp;
        x += err / (FRAC_2_SQRT_PI * (-x * x).exp() - x * err);
    }
    if p < 1.0 { x } else { -x }
}

/// Standard normal CDF Φ(x).
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal quantile Φ⁻¹(p); `±inf` at the endpoints, NaN outside `[0, 1]`.
pub(crate) fn norm_ppf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    -SQRT_2 * inverse_erfc(2.0 * p)
}

/// Standard normal mass of `[alpha, beta]`.
///
/// Evaluated on whichever tail keeps both CDF values small, so intervals far
/// into the upper tail do not cancel to zero.
pub(crate) fn norm_interval_mass(alpha: f64, beta: f64) -> f64 {
    if alpha > 0.0 {
        norm_cdf(-alpha) - norm_cdf(-beta)
    } else {
        norm_cdf(beta) - norm_cdf(alpha)
    }
}
