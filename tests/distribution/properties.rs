//! Properties every distribution shares.

use priors::{
    Angular, BoundedDistribution, Bounds, FromFile, Gaussian, ParamValues, SolidAngle, Uniform,
    UniformRadius,
};

fn all() -> Vec<Box<dyn BoundedDistribution>> {
    let column: Vec<f64> = (0..100).map(|i| f64::from(i) * 0.05).collect();
    vec![
        Box::new(Uniform::new([("x", Bounds::new(-1.0, 3.0).unwrap())]).unwrap()),
        Box::new(Angular::uniform_angle([("x", None)]).unwrap()),
        Box::new(Angular::sin_angle([("x", None)]).unwrap()),
        Box::new(Angular::cos_angle([("x", None)]).unwrap()),
        Box::new(
            Gaussian::builder()
                .param("x", Some(Bounds::new(-2.0, 2.0).unwrap()))
                .build()
                .unwrap(),
        ),
        Box::new(UniformRadius::new([("x", Bounds::new(0.0, 2.5).unwrap())]).unwrap()),
        Box::new(
            FromFile::from_samples(
                [("x", column)],
                [("x", Some(Bounds::new(0.0, 4.0).unwrap()))],
            )
            .unwrap(),
        ),
    ]
}

#[test]
fn test_logpdf_agrees_with_pdf() {
    for dist in all() {
        let near = (-40..=40).map(|i| f64::from(i) * 0.1);
        let far = [-400.0, -40.0, 40.0, 400.0];
        for x in near.chain(far) {
            let values = ParamValues::from([("x", x)]);
            let pdf = dist.pdf(&values).unwrap();
            let logpdf = dist.logpdf(&values).unwrap();
            if pdf > 0.0 {
                assert!(
                    (pdf.ln() - logpdf).abs() < 1e-9,
                    "{}: ln pdf {} != logpdf {logpdf}",
                    dist.name(),
                    pdf.ln()
                );
            } else {
                // zero either outside the support or by underflow
                assert!(
                    logpdf == f64::NEG_INFINITY || logpdf < f64::MIN_POSITIVE.ln(),
                    "{}: pdf 0 but logpdf {logpdf}",
                    dist.name()
                );
            }
        }
    }
}

#[test]
fn test_extra_keys_are_ignored() {
    for dist in all() {
        let plain = ParamValues::from([("x", 0.5)]);
        let extra = ParamValues::from([("x", 0.5), ("unrelated", 123.0)]);
        assert_eq!(dist.pdf(&plain).unwrap(), dist.pdf(&extra).unwrap());
        assert!(!dist.apply_boundary_conditions(&extra).contains_key("unrelated"));
    }
}

#[test]
fn test_missing_parameter_is_an_error() {
    for dist in all() {
        let values = ParamValues::from([("y", 0.5)]);
        assert!(dist.pdf(&values).is_err(), "{}", dist.name());
        assert!(dist.logpdf(&values).is_err(), "{}", dist.name());
    }
}

#[test]
fn test_draws_are_contained() {
    let mut rng = fastrand::Rng::with_seed(31);
    for dist in all() {
        let draws = dist.rvs(200, None, &mut rng).unwrap();
        assert_eq!(draws.len(), 200);
        for row in draws.rows() {
            assert!(dist.contains(&row).unwrap(), "{}: {row:?}", dist.name());
        }
    }
}

#[test]
fn test_solid_angle_bounds_round_trip() {
    let dist = SolidAngle::uniform_solid_angle().unwrap();
    let bounds = dist.bounds();
    assert_eq!(bounds["theta"], *dist.polar().bounds().get("theta").unwrap());
    assert_eq!(bounds["phi"], *dist.azimuthal().bounds().get("phi").unwrap());
}
