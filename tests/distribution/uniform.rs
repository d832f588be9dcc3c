use priors::{BoundType, BoundedDistribution, Bounds, Error, ParamValues, Uniform};

#[test]
fn test_uniform_two_masses_logpdf() {
    let dist = Uniform::new([
        ("mass1", Bounds::new(10.0, 50.0).unwrap()),
        ("mass2", Bounds::new(10.0, 50.0).unwrap()),
    ])
    .unwrap();

    let values = ParamValues::from([("mass1", 25.0), ("mass2", 10.0)]);
    let expected = -(1600.0_f64).ln();
    assert!((dist.logpdf(&values).unwrap() - expected).abs() < 1e-12);
    assert_eq!(dist.name(), "uniform");
}

#[test]
fn test_uniform_unit_interval_density() {
    let dist = Uniform::new([("x", Bounds::new(0.0, 2.0).unwrap())]).unwrap();
    assert_eq!(dist.pdf(&ParamValues::from([("x", 1.0)])).unwrap(), 0.5);
    assert_eq!(dist.pdf(&ParamValues::from([("x", 3.0)])).unwrap(), 0.0);
    // open upper edge
    assert_eq!(dist.pdf(&ParamValues::from([("x", 2.0)])).unwrap(), 0.0);
    assert_eq!(dist.pdf(&ParamValues::from([("x", 0.0)])).unwrap(), 0.5);
}

#[test]
fn test_uniform_reflected_edge_folds_back() {
    let b = Bounds::builder(0.0, 1.0)
        .min_type(BoundType::Reflected)
        .build()
        .unwrap();
    let dist = Uniform::new([("x", b)]).unwrap();
    let conditioned = dist.apply_boundary_conditions(&ParamValues::from([("x", -0.25)]));
    assert_eq!(conditioned.get("x"), Some(0.25));
    assert_eq!(dist.pdf(&ParamValues::from([("x", -0.25)])).unwrap(), 1.0);
    assert_eq!(dist.diagnostics().len(), 1);
}

#[test]
fn test_uniform_bounds_round_trip() {
    let b = Bounds::builder(-3.0, 4.5)
        .max_type(BoundType::Closed)
        .build()
        .unwrap();
    let dist = Uniform::new([("x", b)]).unwrap();
    assert_eq!(dist.bounds()["x"], b);
    assert_eq!(dist.params(), ["x".to_owned()]);
}

#[test]
fn test_uniform_duplicate_parameter() {
    let result = Uniform::new([
        ("x", Bounds::new(0.0, 1.0).unwrap()),
        ("x", Bounds::new(0.0, 2.0).unwrap()),
    ]);
    assert!(matches!(result, Err(Error::DuplicateParameter(_))));
}
