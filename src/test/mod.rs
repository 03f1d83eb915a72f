mod dist;
mod scenarios;
mod simulator;
mod sweep;

use crate::dist::{Dist, FnVariate, Variate};
use crate::net::{Network, OutputLink};

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(crate) fn fixed(value: f64) -> Box<dyn Variate> {
    Dist::deterministic(value)
        .into_variate()
        .expect("valid deterministic value")
}

/// Variate that replays the given values, then yields 0.
pub(crate) fn sequence(values: Vec<f64>) -> Box<dyn Variate> {
    let mut it = values.into_iter();
    Box::new(FnVariate(move || it.next().unwrap_or(0.0)))
}

/// One queue to a sink, fed by a single probe source.
pub(crate) fn one_queue(
    service_rate: f64,
    probes: u64,
    size: Box<dyn Variate>,
    gap: Box<dyn Variate>,
    offset: f64,
) -> Network {
    let mut net = Network::default();
    let q = net.add_queue(service_rate, 0.0);
    let p = net.add_probe_source(probes, size, gap, offset);
    net.connect(p, OutputLink::Element(q)).expect("connect probe");
    net
}
