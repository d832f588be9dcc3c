use core::f64::consts::PI;

use priors::{BoundedDistribution, Bounds, ParamValues, SolidAngle, SolidAngleKind};

#[test]
fn test_solid_angle_pdf_factorizes() {
    let dist = SolidAngle::uniform_solid_angle().unwrap();
    let values = ParamValues::from([("theta", 0.7), ("phi", 4.0)]);
    let expected = 0.7_f64.sin() / 2.0 / (2.0 * PI);
    assert!((dist.pdf(&values).unwrap() - expected).abs() < 1e-12);
    let log = dist.polar().logpdf(&values).unwrap() + dist.azimuthal().logpdf(&values).unwrap();
    assert!((dist.logpdf(&values).unwrap() - log).abs() < 1e-12);
}

#[test]
fn test_solid_angle_upper_hemisphere() {
    let dist = SolidAngle::builder(SolidAngleKind::UniformSolidAngle)
        .polar_bounds(Some(Bounds::new(0.0, 0.5).unwrap()))
        .build()
        .unwrap();
    let north = ParamValues::from([("theta", 0.5), ("phi", 1.0)]);
    let south = ParamValues::from([("theta", 2.0), ("phi", 1.0)]);
    assert!((dist.pdf(&north).unwrap() - 0.5_f64.sin() / (2.0 * PI)).abs() < 1e-12);
    assert_eq!(dist.pdf(&south).unwrap(), 0.0);
}

#[test]
fn test_sky_draws_in_domain() {
    let dist = SolidAngle::uniform_sky().unwrap();
    let mut rng = fastrand::Rng::with_seed(4);
    let draws = dist.rvs(500, None, &mut rng).unwrap();
    for row in draws.rows() {
        assert!(dist.contains(&row).unwrap());
    }
    assert_eq!(dist.kind(), SolidAngleKind::UniformSky);
    assert_eq!(dist.polar_angle(), "dec");
    assert_eq!(dist.azimuthal_angle(), "ra");
}
