//! 预置场景
//!
//! 10 Mbit/s 瓶颈队列 + Internet mix 背景流量 + 一对 1500 字节探测包。
//! 背景流量到达率按目标利用率换算：rate = util × service_rate / mean_size。

use super::spec::{LinkSpec, ProbeSpec, QueueSpec, SourceSpec, TopologySpec, WireSpec};
use crate::dist::{Dist, INTERNET_MIX_MEAN_BYTES};
use crate::net::DEFAULT_INJECTION_OFFSET;

/// 10 Mbit/s（bytes/s）
pub const SERVICE_RATE_10MBPS: f64 = 10_000_000.0 / 8.0;
pub const PROBE_BYTES: f64 = 1500.0;
/// 两段路径之间线路的传播时延（秒）
pub const DEFAULT_WIRE_DELAY: f64 = 0.5;

/// 达到目标利用率所需的 Internet mix 包到达率（packets/s）
pub fn cross_traffic_rate(utilization: f64, service_rate: f64) -> f64 {
    utilization * service_rate / INTERNET_MIX_MEAN_BYTES
}

fn probe_pair(dispersion: f64, into: LinkSpec) -> ProbeSpec {
    ProbeSpec {
        num_packets: 2,
        size: Dist::deterministic(PROBE_BYTES),
        interarrival: Dist::deterministic(dispersion),
        output: into,
        injection_offset: DEFAULT_INJECTION_OFFSET,
    }
}

fn internet_mix_source(utilization: f64, into: LinkSpec) -> SourceSpec {
    SourceSpec {
        size: Dist::InternetMix,
        interarrival: Dist::exponential(cross_traffic_rate(utilization, SERVICE_RATE_10MBPS)),
        output: into,
    }
}

/// 单队列：探测包对与（可选的）背景流量共享一个 10 Mbit/s 队列
pub fn single_queue(dispersion: f64, utilization: Option<f64>) -> TopologySpec {
    let sources = utilization
        .filter(|u| *u > 0.0)
        .map(|u| vec![internet_mix_source(u, LinkSpec::Queue(0))])
        .unwrap_or_default();
    TopologySpec {
        queues: vec![QueueSpec {
            service_rate: SERVICE_RATE_10MBPS,
            drop_probability: 0.0,
            output: LinkSpec::Sink,
        }],
        wires: Vec::new(),
        sources,
        probes: vec![probe_pair(dispersion, LinkSpec::Queue(0))],
    }
}

/// 两跳：queue 0 -> wire 0 -> queue 1，每个队列各有一路背景流量
pub fn two_hop(dispersion: f64, utilization: f64) -> TopologySpec {
    let queue = |output| QueueSpec {
        service_rate: SERVICE_RATE_10MBPS,
        drop_probability: 0.0,
        output,
    };
    TopologySpec {
        queues: vec![queue(LinkSpec::Wire(0)), queue(LinkSpec::Sink)],
        wires: vec![WireSpec {
            propagation_delay: DEFAULT_WIRE_DELAY,
            output: LinkSpec::Queue(1),
        }],
        sources: vec![
            internet_mix_source(utilization, LinkSpec::Queue(0)),
            internet_mix_source(utilization, LinkSpec::Queue(1)),
        ],
        probes: vec![probe_pair(dispersion, LinkSpec::Queue(0))],
    }
}
