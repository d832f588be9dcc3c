use core::f64::consts::{FRAC_PI_2, PI, TAU};

use priors::{AngleKind, Angular, BoundedDistribution, Bounds, Error, ParamValues};

#[test]
fn test_uniform_angle_wraps_past_two_pi() {
    let dist = Angular::uniform_angle([("phi", None)]).unwrap();
    let wrapped = dist.pdf(&ParamValues::from([("phi", TAU + 0.1)])).unwrap();
    let direct = dist.pdf(&ParamValues::from([("phi", 0.1)])).unwrap();
    assert!((wrapped - direct).abs() < 1e-15);
    assert!((direct - 1.0 / TAU).abs() < 1e-15);
}

#[test]
fn test_uniform_angle_restricted_bounds() {
    // [0, pi) in multiples of pi
    let dist =
        Angular::uniform_angle([("phi", Some(Bounds::new(0.0, 1.0).unwrap()))]).unwrap();
    assert!((dist.pdf(&ParamValues::from([("phi", 1.0)])).unwrap() - 1.0 / PI).abs() < 1e-12);
    assert_eq!(dist.pdf(&ParamValues::from([("phi", 4.0)])).unwrap(), 0.0);
}

#[test]
fn test_cos_angle_density() {
    let dist = Angular::cos_angle([("dec", None)]).unwrap();
    assert_eq!(dist.kind(), AngleKind::Cos);
    assert_eq!(dist.name(), "cos_angle");
    let at_equator = dist.pdf(&ParamValues::from([("dec", 0.0)])).unwrap();
    assert!((at_equator - 0.5).abs() < 1e-12);
    assert_eq!(dist.pdf(&ParamValues::from([("dec", 2.0)])).unwrap(), 0.0);
}

#[test]
fn test_sin_angle_norm_over_partial_domain() {
    // theta in [pi/2, pi]: mass of sin is 1
    let dist =
        Angular::sin_angle([("theta", Some(Bounds::new(0.5, 1.0).unwrap()))]).unwrap();
    assert!((dist.norm() - 1.0).abs() < 1e-12);
    assert_eq!(dist.pdf(&ParamValues::from([("theta", FRAC_PI_2 - 0.1)])).unwrap(), 0.0);
}

#[test]
fn test_angle_bounds_outside_domain() {
    let result = Angular::cos_angle([("dec", Some(Bounds::new(-1.0, 0.0).unwrap()))]);
    assert!(matches!(result, Err(Error::OutOfDomain { .. })));
    let result = Angular::uniform_angle([("phi", Some(Bounds::new(0.0, 3.0).unwrap()))]);
    assert!(matches!(result, Err(Error::OutOfDomain { .. })));
}

#[test]
fn test_cos_angle_samples_follow_cdf() {
    let dist = Angular::cos_angle([("dec", None)]).unwrap();
    let mut rng = fastrand::Rng::with_seed(77);
    let n = 20_000;
    let draws = dist.rvs(n, None, &mut rng).unwrap();
    let column = draws.get("dec").unwrap();
    // P(dec < pi/6) = (sin(pi/6) + 1) / 2 = 0.75
    let below = column.iter().filter(|&&d| d < PI / 6.0).count() as f64 / n as f64;
    assert!((below - 0.75).abs() < 0.02, "fraction {below}");
}
