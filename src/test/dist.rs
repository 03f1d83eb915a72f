use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp};

use crate::dist::{Dist, FnVariate, INTERNET_MIX_MEAN_BYTES, Variate, internet_mix};
use crate::error::ConfigError;
use crate::sweep::{SweepConfig, run_sweep};
use crate::topo;

fn mean_of(v: &mut dyn Variate, n: usize, seed: u64) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| v.sample(&mut rng)).sum::<f64>() / n as f64
}

#[test]
fn deterministic_always_returns_its_value() {
    let d = Dist::deterministic(1500.0);
    assert_eq!(d.mean(), 1500.0);
    let mut d = d.into_variate().expect("valid");
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..10 {
        assert_eq!(d.sample(&mut rng), 1500.0);
    }
}

#[test]
fn exponential_sample_mean_matches_rate() {
    let rate = 855.1881;
    let mut v = Dist::exponential(rate).into_variate().expect("valid");
    let mean = mean_of(v.as_mut(), 50_000, 7);
    let expected = 1.0 / rate;
    assert!(
        (mean - expected).abs() < expected * 0.05,
        "mean {mean} vs {expected}"
    );
}

#[test]
fn exponential_draws_follow_rand_distr_exp() {
    let rate = 250.0;
    let mut v = Dist::exponential(rate).into_variate().expect("valid");
    let exp = Exp::new(rate).expect("valid rate");
    let mut ours = StdRng::seed_from_u64(21);
    let mut theirs = StdRng::seed_from_u64(21);
    for _ in 0..100 {
        assert_eq!(v.sample(&mut ours), exp.sample(&mut theirs));
    }
}

#[test]
fn uniform_stays_within_bounds() {
    let mut d = Dist::Uniform {
        low: 10.0,
        high: 20.0,
    }
    .into_variate()
    .expect("valid");
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..1_000 {
        let x = d.sample(&mut rng);
        assert!((10.0..20.0).contains(&x), "{x}");
    }
    let mut point = Dist::Uniform { low: 4.0, high: 4.0 }
        .into_variate()
        .expect("valid");
    assert_eq!(point.sample(&mut rng), 4.0);
}

#[test]
fn internet_mix_draws_from_the_expected_support() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut n40 = 0usize;
    let mut n1500 = 0usize;
    let n = 50_000;
    let mut sum = 0.0;
    for _ in 0..n {
        let x = internet_mix(&mut rng);
        assert!((40.0..=1500.0).contains(&x), "{x}");
        assert_eq!(x, x.round(), "sizes are whole bytes");
        if x == 40.0 {
            n40 += 1;
        }
        if x == 1500.0 {
            n1500 += 1;
        }
        sum += x;
    }
    let frac40 = n40 as f64 / n as f64;
    let frac1500 = n1500 as f64 / n as f64;
    assert!((frac40 - 0.5).abs() < 0.02, "{frac40}");
    assert!((frac1500 - 0.17).abs() < 0.02, "{frac1500}");
    let mean = sum / n as f64;
    assert!((mean - INTERNET_MIX_MEAN_BYTES).abs() < 25.0, "{mean}");
}

#[test]
fn invalid_parameters_are_rejected() {
    let cases = [
        Dist::exponential(0.0),
        Dist::exponential(-1.0),
        Dist::exponential(f64::NAN),
        Dist::deterministic(-0.5),
        Dist::deterministic(f64::INFINITY),
        Dist::Uniform { low: 5.0, high: 1.0 },
        Dist::Uniform { low: -1.0, high: 1.0 },
        Dist::Uniform {
            low: f64::NAN,
            high: 1.0,
        },
    ];
    for d in cases {
        assert!(
            matches!(d.validate(), Err(ConfigError::InvalidDistribution(_))),
            "{d:?} should be rejected"
        );
        assert!(d.into_variate().is_err());
    }
    assert!(Dist::InternetMix.validate().is_ok());
}

#[test]
fn dist_parses_from_tagged_json() {
    let d: Dist = serde_json::from_str(r#"{ "kind": "exponential", "rate": 20.0 }"#).expect("parse");
    assert_eq!(d, Dist::exponential(20.0));
    let d: Dist = serde_json::from_str(r#"{ "kind": "internet_mix" }"#).expect("parse");
    assert_eq!(d, Dist::InternetMix);
    let d: Dist =
        serde_json::from_str(r#"{ "kind": "deterministic", "value": 0.001 }"#).expect("parse");
    assert_eq!(d.mean(), 0.001);
}

#[test]
fn closures_work_as_variates() {
    let mut n = 0.0;
    let mut v = FnVariate(move || {
        n += 1.0;
        n
    });
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(v.sample(&mut rng), 1.0);
    assert_eq!(v.sample(&mut rng), 2.0);
}

#[test]
fn inverted_uniform_size_fails_the_build_instead_of_sampling() {
    let mut spec = topo::single_queue(0.001, None);
    spec.probes[0].size = Dist::Uniform {
        low: 2.0,
        high: 1.0,
    };
    assert!(matches!(
        spec.build(),
        Err(ConfigError::InvalidDistribution(_))
    ));

    let cfg = SweepConfig {
        dispersions: vec![0.001],
        ..SweepConfig::default()
    };
    assert!(matches!(
        run_sweep(&spec, &cfg),
        Err(ConfigError::InvalidDistribution(_))
    ));
}
