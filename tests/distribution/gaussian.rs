use core::f64::consts::PI;

use priors::{BoundedDistribution, Bounds, Error, Gaussian, ParamValues};

#[test]
fn test_unbounded_gaussian_at_zero() {
    let dist = Gaussian::builder().param("x", None).build().unwrap();
    let log = dist.logpdf(&ParamValues::from([("x", 0.0)])).unwrap();
    assert!((log - -0.5 * (2.0 * PI).ln()).abs() < 1e-12);
}

#[test]
fn test_unbounded_gaussian_far_tail_underflows() {
    let dist = Gaussian::builder().param("x", None).build().unwrap();
    let values = ParamValues::from([("x", 40.0)]);
    let log = dist.logpdf(&values).unwrap();
    assert!((log - (-800.0 - 0.5 * (2.0 * PI).ln())).abs() < 1e-9);
    assert_eq!(dist.pdf(&values).unwrap(), 0.0);
}

#[test]
fn test_gaussian_truncated_norm_integrates_to_one() {
    let dist = Gaussian::builder()
        .param("x", Some(Bounds::new(-0.5, 2.0).unwrap()))
        .mean("x", 0.3)
        .var("x", 0.8)
        .build()
        .unwrap();
    let steps = 20_000_u32;
    let h = 2.5 / f64::from(steps);
    let total: f64 = (0..steps)
        .map(|i| {
            let x = -0.5 + (f64::from(i) + 0.5) * h;
            dist.pdf(&ParamValues::from([("x", x)])).unwrap() * h
        })
        .sum();
    assert!((total - 1.0).abs() < 1e-6, "integral {total}");
}

#[test]
fn test_gaussian_far_tail_samples_stay_in_bounds() {
    let dist = Gaussian::builder()
        .param("x", Some(Bounds::new(8.0, 9.0).unwrap()))
        .build()
        .unwrap();
    let mut rng = fastrand::Rng::with_seed(99);
    let draws = dist.rvs(1000, None, &mut rng).unwrap();
    let column = draws.get("x").unwrap();
    assert!(column.iter().all(|x| (8.0..=9.0).contains(x)));
    // mass piles up at the edge nearest the mean
    let mean = column.iter().sum::<f64>() / column.len() as f64;
    assert!(mean < 8.3, "mean {mean}");
}

#[test]
fn test_gaussian_variance_for_unknown_parameter() {
    let result = Gaussian::builder().param("x", None).var("y", 2.0).build();
    assert!(matches!(result, Err(Error::MissingParameter(p)) if p == "y"));
}
