//! 错误类型
//!
//! 配置错误在仿真开始前报告；仿真错误表示逻辑缺陷或非法采样，中止整次运行。

use std::path::PathBuf;

use thiserror::Error;

use crate::net::ElementId;
use crate::sim::SimTime;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{from} links to undefined element {target}")]
    UndefinedElement { from: String, target: String },

    #[error("{from} links to {target}, which cannot receive packets")]
    NotAnEntryTarget { from: String, target: String },

    #[error("queue {queue} has invalid service rate {rate} (must be finite and > 0)")]
    InvalidServiceRate { queue: usize, rate: f64 },

    #[error("queue {queue} drop probability {probability} is outside [0, 1]")]
    InvalidDropProbability { queue: usize, probability: f64 },

    #[error("wire {wire} has invalid propagation delay {delay}")]
    InvalidPropagationDelay { wire: usize, delay: f64 },

    #[error("probe source {probe} has invalid injection offset {offset}")]
    InvalidInjectionOffset { probe: usize, offset: f64 },

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("clock moved backward: now {now}, next event at {at}")]
    ClockRegression { now: SimTime, at: SimTime },

    #[error("queue {queue} occupancy went negative")]
    OccupancyUnderflow { queue: usize },

    #[error("probe {serial} left the network with no probes pending")]
    ProbeCountUnderflow { serial: u64 },

    #[error("packet {serial} has no transition at element {element:?}")]
    NoTransition { serial: u64, element: Option<ElementId> },

    #[error("{element} drew invalid {what} sample {value}")]
    InvalidSample {
        element: String,
        what: &'static str,
        value: f64,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
