use crate::run::Termination;
use crate::sim::SimTime;
use crate::sweep::{SweepConfig, dispersions_from_range, run_sweep};
use crate::topo;

use super::assert_close;

#[test]
fn dispersion_range_excludes_the_stop_value() {
    let d = dispersions_from_range(0.0, 0.005, 0.0005);
    assert_eq!(d.len(), 10);
    assert_eq!(d[0], 0.0);
    assert_close(d[9], 0.0045);
    assert!(dispersions_from_range(0.0, 1.0, 0.0).is_empty());
    assert!(dispersions_from_range(1.0, 0.0, 0.1).is_empty());
}

#[test]
fn idle_queue_sweep_reproduces_the_single_server_law() {
    let spec = topo::single_queue(0.0, None);
    let cfg = SweepConfig {
        dispersions: vec![0.001, 0.1],
        repeats: 3,
        ..SweepConfig::default()
    };
    let report = run_sweep(&spec, &cfg).expect("sweep");

    assert!(report.failures.is_empty());
    assert_eq!(report.incomplete, 0);
    assert_eq!(report.completed_runs, 6);
    assert_eq!(report.samples.len(), 6);
    for s in &report.samples {
        assert_close(s.input_dispersion, s.dispersion);
        let expected = s.dispersion.max(1500.0 / topo::SERVICE_RATE_10MBPS);
        assert_close(s.output_dispersion, expected);
        assert_eq!(s.first_probe_alone, Some(true));
    }
    let seeds: Vec<u64> = report.samples.iter().map(|s| s.seed).collect();
    assert_eq!(seeds, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(report.mean_true_utilization.len(), 1);
}

#[test]
fn failed_runs_are_reported_not_dropped() {
    let spec = topo::single_queue(0.0, Some(0.3));
    let cfg = SweepConfig {
        dispersions: vec![-0.01, 0.002],
        repeats: 2,
        base_seed: 100,
        ..SweepConfig::default()
    };
    let report = run_sweep(&spec, &cfg).expect("sweep");
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().all(|f| f.dispersion == -0.01));
    assert_eq!(report.failures[1].seed, 101);
    assert_eq!(report.samples.len(), 2);
    assert_eq!(report.completed_runs, 2);
    let u = report.mean_true_utilization[0];
    assert!(u > 0.0 && u <= 1.0);
}

#[test]
fn invalid_topology_fails_the_whole_sweep() {
    let mut spec = topo::single_queue(0.0, None);
    spec.queues[0].service_rate = -5.0;
    let cfg = SweepConfig {
        dispersions: vec![0.001],
        ..SweepConfig::default()
    };
    assert!(run_sweep(&spec, &cfg).is_err());
}

#[test]
fn time_bounded_sweep_marks_runs_without_a_pair_incomplete() {
    let spec = topo::single_queue(0.0, Some(0.3));
    let cfg = SweepConfig {
        dispersions: vec![0.001],
        repeats: 2,
        termination: Termination::Until(SimTime(0.05)),
        record_delays: true,
        ..SweepConfig::default()
    };
    let report = run_sweep(&spec, &cfg).expect("sweep");
    assert_eq!(report.incomplete, 2);
    assert!(report.samples.is_empty());
    assert!(!report.cross_traffic_delays.is_empty());
    assert!(report.mean_cross_traffic_delay().expect("delays") > 0.0);
}
