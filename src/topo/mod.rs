//! 拓扑构建
//!
//! 场景文件格式（`TopologySpec`）与预置场景。

mod presets;
mod spec;

pub use presets::{
    DEFAULT_WIRE_DELAY, PROBE_BYTES, SERVICE_RATE_10MBPS, cross_traffic_rate, single_queue,
    two_hop,
};
pub use spec::{LinkSpec, ProbeSpec, QueueSpec, SourceSpec, TopologySpec, WireSpec};
