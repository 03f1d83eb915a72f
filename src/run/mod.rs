//! 单次仿真运行
//!
//! `run` 是核心对外接口：给定拓扑与运行配置，排空网络并返回探测包时间序列、
//! 逐跳观测与队列利用率。

mod collector;
mod config;
mod context;
mod result;

pub use collector::{OccupancyWindow, ProbeRecord, QueueUtilization, RunCollector};
pub use config::{RunConfig, Termination};
pub use context::RunContext;
pub use result::{RunResult, StopReason};

use crate::error::SimError;
use crate::net::Network;

/// 执行一次完整运行
#[tracing::instrument(skip(net, cfg), fields(seed = cfg.seed, termination = ?cfg.termination))]
pub fn run(net: Network, cfg: &RunConfig) -> Result<RunResult, SimError> {
    let mut ctx = RunContext::new(net, cfg)?;
    ctx.run_to_end()?;
    Ok(ctx.finish())
}
