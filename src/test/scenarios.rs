use crate::net::{Network, OutputLink};
use crate::run::{self, RunConfig, RunContext};
use crate::topo;

use super::{assert_close, fixed, one_queue};

const RATE: f64 = 1_250_000.0;
const PROBE: f64 = 1500.0;

#[test]
fn widely_spaced_probes_keep_their_dispersion() {
    let net = one_queue(RATE, 2, fixed(PROBE), fixed(0.10), 0.10);
    let result = run::run(net, &RunConfig::default()).expect("run");

    assert_close(result.probe_entries[0].as_secs(), 0.10);
    assert_close(result.probe_entries[1].as_secs(), 0.20);
    assert_close(result.probe_exits[0].as_secs(), 0.1012);
    assert_close(result.probe_exits[1].as_secs(), 0.2012);
    assert_close(result.input_dispersion().expect("pair"), 0.10);
    assert_close(result.output_dispersion().expect("pair"), 0.10);

    let first = result.probes[0].hops[0];
    assert!(first.queue_was_empty && first.queue_had_no_probes);
    assert!(!first.gap, "nothing has left the queue yet");
    let second = result.probes[1].hops[0];
    assert!(second.queue_was_empty && second.queue_had_no_probes);
    assert!(second.gap, "queue went idle after the first probe");
}

#[test]
fn closely_spaced_probes_are_spread_by_queueing() {
    let net = one_queue(RATE, 2, fixed(PROBE), fixed(0.001), 0.10);
    let result = run::run(net, &RunConfig::default()).expect("run");

    assert_close(result.probe_entries[1].as_secs(), 0.101);
    assert_close(result.probe_exits[0].as_secs(), 0.1012);
    assert_close(result.probe_exits[1].as_secs(), 0.1024);

    let input = result.input_dispersion().expect("pair");
    let output = result.output_dispersion().expect("pair");
    assert_close(input, 0.001);
    assert_close(output, 0.0012);
    assert!(output > input);

    let second = result.probes[1].hops[0];
    assert!(!second.queue_was_empty);
    assert!(!second.queue_had_no_probes);
    assert!(!second.gap);
}

/// q0 (drops all cross traffic) -> wire -> q1 -> sink
fn lossy_path() -> Network {
    let mut net = Network::default();
    let q0 = net.add_queue(1_000_000.0, 1.0);
    let w = net.add_wire(0.01);
    let q1 = net.add_queue(1_000_000.0, 0.0);
    let src = net.add_packet_source(fixed(100.0), fixed(0.001));
    let probes = net.add_probe_source(2, fixed(PROBE), fixed(0.01), 0.10);
    net.connect(q0, OutputLink::Element(w)).expect("connect");
    net.connect(w, OutputLink::Element(q1)).expect("connect");
    net.connect(q1, OutputLink::Sink).expect("connect");
    net.connect(src, OutputLink::Element(q0)).expect("connect");
    net.connect(probes, OutputLink::Element(q0)).expect("connect");
    net
}

#[test]
fn certain_drop_removes_all_cross_traffic_but_never_probes() {
    let mut ctx = RunContext::new(lossy_path(), &RunConfig::with_seed(4)).expect("ctx");
    ctx.run_to_end().expect("run");

    let q0 = ctx.network().queue(0).expect("q0");
    assert!(q0.arrivals() > q0.probe_arrivals());
    let q1 = ctx.network().queue(1).expect("q1");
    assert_eq!(q1.arrivals(), 2);
    assert_eq!(q1.probe_arrivals(), 2);

    let result = ctx.finish();
    assert_eq!(result.stats.delivered_probes, 2);
    assert_eq!(result.stats.delivered_cross, 0);
    assert!(result.stats.dropped_cross > 50);
    assert!(result.stats.is_conserved(), "{:?}", result.stats);
    for probe in &result.probes {
        assert_eq!(probe.hops.len(), 2);
    }
}

#[test]
fn drop_probability_does_not_apply_when_exiting_to_a_sink() {
    let mut spec = topo::single_queue(0.01, Some(0.3));
    spec.queues[0].drop_probability = 1.0;
    let result = run::run(spec.build().expect("build"), &RunConfig::with_seed(6)).expect("run");
    assert_eq!(result.stats.dropped_cross, 0);
    assert!(result.stats.delivered_cross > 0);
}

#[test]
fn wire_adds_its_propagation_delay() {
    let mut net = Network::default();
    let w = net.add_wire(0.25);
    let q = net.add_queue(1000.0, 0.0);
    let p = net.add_probe_source(1, fixed(100.0), fixed(0.0), 0.5);
    net.connect(p, OutputLink::Element(w)).expect("connect");
    net.connect(w, OutputLink::Element(q)).expect("connect");
    let result = run::run(net, &RunConfig::default()).expect("run");

    assert_close(result.probe_entries[0].as_secs(), 0.5);
    let hop = result.probes[0].hops[0];
    assert_close(hop.entered_at.as_secs(), 0.75);
    assert_close(result.probe_exits[0].as_secs(), 0.85);
}

#[test]
fn wire_can_terminate_a_path() {
    let mut net = Network::default();
    let q = net.add_queue(1000.0, 0.0);
    let w = net.add_wire(1.0);
    let p = net.add_probe_source(1, fixed(100.0), fixed(0.0), 0.0);
    net.connect(p, OutputLink::Element(q)).expect("connect");
    net.connect(q, OutputLink::Element(w)).expect("connect");
    let result = run::run(net, &RunConfig::default()).expect("run");
    assert_close(result.probe_exits[0].as_secs(), 1.1);
    assert_eq!(result.probes[0].hops.len(), 1);
}

#[test]
fn cross_traffic_ahead_of_a_probe_delays_it() {
    let mut net = Network::default();
    let q = net.add_queue(1000.0, 0.0);
    // 500 B every 0.05 s; the first one arrives at 0.05 and is served until 0.55
    let src = net.add_packet_source(fixed(500.0), fixed(0.05));
    let p = net.add_probe_source(1, fixed(100.0), fixed(0.0), 0.10);
    net.connect(src, OutputLink::Element(q)).expect("connect");
    net.connect(p, OutputLink::Element(q)).expect("connect");
    let result = run::run(net, &RunConfig::default()).expect("run");

    // probe (serial 0) wins the tie at 0.10 against the second cross packet
    assert_close(result.probe_exits[0].as_secs(), 0.65);
    let hop = result.probes[0].hops[0];
    assert!(!hop.queue_was_empty);
    assert!(hop.queue_had_no_probes);
}
