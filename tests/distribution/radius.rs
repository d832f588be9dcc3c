use priors::{BoundedDistribution, Bounds, Error, ParamValues, UniformRadius};

#[test]
fn test_radius_empirical_cdf() {
    let dist = UniformRadius::new([("r", Bounds::new(0.0, 1.0).unwrap())]).unwrap();
    let mut rng = fastrand::Rng::with_seed(2024);
    let n = 10_000;
    let draws = dist.rvs(n, None, &mut rng).unwrap();
    let below = draws.get("r").unwrap().iter().filter(|&&r| r < 0.5).count() as f64 / n as f64;
    assert!((below - 0.125).abs() < 0.015, "fraction {below}");
}

#[test]
fn test_radius_density() {
    let dist = UniformRadius::new([("distance", Bounds::new(0.0, 2.0).unwrap())]).unwrap();
    assert_eq!(dist.dim(), 3);
    let values = ParamValues::from([("distance", 1.5)]);
    let expected = 3.0 * 1.5 * 1.5 / 8.0;
    assert!((dist.pdf(&values).unwrap() - expected).abs() < 1e-12);
    assert!((dist.logpdf(&values).unwrap() - expected.ln()).abs() < 1e-12);
}

#[test]
fn test_radius_in_a_disc() {
    let dist = UniformRadius::with_dim([("r", Bounds::new(0.0, 1.0).unwrap())], 2).unwrap();
    let values = ParamValues::from([("r", 0.5)]);
    assert!((dist.pdf(&values).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_radius_rejects_bad_bounds() {
    let result = UniformRadius::new([("r", Bounds::new(-1.0, 1.0).unwrap())]);
    assert!(matches!(result, Err(Error::InvalidBounds { .. })));
}
