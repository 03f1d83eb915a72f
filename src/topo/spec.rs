//! Serializable topology description.
//!
//! Elements are referenced per kind by index, e.g. `{"queue": 1}` is the
//! second queue in `queues`. Every run builds a fresh [`Network`] from the
//! same spec so no element state leaks between runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dist::Dist;
use crate::error::ConfigError;
use crate::net::{DEFAULT_INJECTION_OFFSET, ElementId, Network, OutputLink};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologySpec {
    #[serde(default)]
    pub queues: Vec<QueueSpec>,
    #[serde(default)]
    pub wires: Vec<WireSpec>,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
    #[serde(default)]
    pub probes: Vec<ProbeSpec>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSpec {
    #[default]
    Sink,
    Queue(usize),
    Wire(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSpec {
    /// Bytes per second.
    pub service_rate: f64,
    #[serde(default)]
    pub drop_probability: f64,
    #[serde(default)]
    pub output: LinkSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSpec {
    /// Seconds.
    pub propagation_delay: f64,
    #[serde(default)]
    pub output: LinkSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub size: Dist,
    pub interarrival: Dist,
    pub output: LinkSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSpec {
    pub num_packets: u64,
    pub size: Dist,
    pub interarrival: Dist,
    pub output: LinkSpec,
    #[serde(default = "default_injection_offset")]
    pub injection_offset: f64,
}

fn default_injection_offset() -> f64 {
    DEFAULT_INJECTION_OFFSET
}

impl TopologySpec {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Same topology with every probe source spaced by `interarrival`.
    pub fn with_probe_interarrival(&self, interarrival: Dist) -> Self {
        let mut spec = self.clone();
        for probe in &mut spec.probes {
            probe.interarrival = interarrival.clone();
        }
        spec
    }

    /// Builds and validates a fresh network.
    pub fn build(&self) -> Result<Network, ConfigError> {
        let mut net = Network::default();

        let mut wiring: Vec<(ElementId, String, LinkSpec)> = Vec::new();
        for (i, q) in self.queues.iter().enumerate() {
            let id = net.add_queue(q.service_rate, q.drop_probability);
            wiring.push((id, format!("queue {i}"), q.output));
        }
        for (i, w) in self.wires.iter().enumerate() {
            let id = net.add_wire(w.propagation_delay);
            wiring.push((id, format!("wire {i}"), w.output));
        }
        for (i, s) in self.sources.iter().enumerate() {
            let id = net.add_packet_source(
                s.size.clone().into_variate()?,
                s.interarrival.clone().into_variate()?,
            );
            wiring.push((id, format!("source {i}"), s.output));
        }
        for (i, p) in self.probes.iter().enumerate() {
            let id = net.add_probe_source(
                p.num_packets,
                p.size.clone().into_variate()?,
                p.interarrival.clone().into_variate()?,
                p.injection_offset,
            );
            wiring.push((id, format!("probe source {i}"), p.output));
        }

        for (id, from, link) in wiring {
            let output = match link {
                LinkSpec::Sink => OutputLink::Sink,
                LinkSpec::Queue(i) => net.queue_id(i).map(OutputLink::Element).ok_or_else(|| {
                    ConfigError::UndefinedElement {
                        from: from.clone(),
                        target: format!("queue {i}"),
                    }
                })?,
                LinkSpec::Wire(i) => net.wire_id(i).map(OutputLink::Element).ok_or_else(|| {
                    ConfigError::UndefinedElement {
                        from: from.clone(),
                        target: format!("wire {i}"),
                    }
                })?,
            };
            net.connect(id, output)?;
        }

        net.validate()?;
        Ok(net)
    }
}
