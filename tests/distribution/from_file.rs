use priors::{BoundedDistribution, Bounds, FromFile, ParamValues};

fn wave(n: u32, phase: f64) -> Vec<f64> {
    (0..n).map(|i| (f64::from(i) * 0.37 + phase).sin() * 3.0).collect()
}

#[test]
fn test_from_samples_two_dimensional() {
    let dist = FromFile::from_samples(
        [("mass1", wave(300, 0.0)), ("mass2", wave(300, 1.1))],
        [
            ("mass1", Some(Bounds::new(-2.0, 2.0).unwrap())),
            ("mass2", None),
        ],
    )
    .unwrap();
    assert_eq!(dist.name(), "fromfile");
    assert_eq!(dist.params(), ["mass1".to_owned(), "mass2".to_owned()]);
    assert!(dist.norm() > 1.0);
    assert!((dist.lognorm() - dist.norm().ln()).abs() < 1e-12);

    let inside = ParamValues::from([("mass1", 0.5), ("mass2", -0.5)]);
    let outside = ParamValues::from([("mass1", 2.5), ("mass2", -0.5)]);
    assert!(dist.pdf(&inside).unwrap() > 0.0);
    assert_eq!(dist.pdf(&outside).unwrap(), 0.0);
}

#[test]
fn test_from_samples_draws_respect_bounds() {
    let dist = FromFile::from_samples(
        [("x", wave(200, 0.3))],
        [("x", Some(Bounds::new(0.0, 3.5).unwrap()))],
    )
    .unwrap();
    let mut rng = fastrand::Rng::with_seed(12);
    let draws = dist.rvs(400, None, &mut rng).unwrap();
    assert!(draws.get("x").unwrap().iter().all(|x| (0.0..3.5).contains(x)));
}
