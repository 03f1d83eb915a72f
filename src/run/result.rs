use super::collector::{ProbeRecord, QueueUtilization};
use crate::net::Stats;
use crate::sim::SimTime;

/// 运行停止的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 所有探测包都已离开网络
    ProbesDrained,
    /// 时钟超过时间上限
    TimeBound,
    /// 网络中已没有任何在途包
    Drained,
}

/// 单次运行的结果
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// 探测包注入时间，按注入顺序
    pub probe_entries: Vec<SimTime>,
    /// 探测包离开时间，按离开顺序
    pub probe_exits: Vec<SimTime>,
    /// 探测包记录（含逐跳观测），按离开顺序
    pub probes: Vec<ProbeRecord>,
    pub utilization: Vec<QueueUtilization>,
    pub final_clock: SimTime,
    pub stats: Stats,
    /// 非探测包逐跳停留时间；仅在 `record_delays` 时记录
    pub cross_traffic_delays: Vec<f64>,
    pub stop: StopReason,
}

impl RunResult {
    /// 前两个探测包的注入间隔
    pub fn input_dispersion(&self) -> Option<f64> {
        pair_gap(&self.probe_entries)
    }

    /// 前两个探测包的离开间隔
    pub fn output_dispersion(&self) -> Option<f64> {
        pair_gap(&self.probe_exits)
    }

    pub fn queue_utilization(&self, queue: usize) -> Option<&QueueUtilization> {
        self.utilization.iter().find(|u| u.queue == queue)
    }
}

fn pair_gap(times: &[SimTime]) -> Option<f64> {
    match times {
        [first, second, ..] => Some(*second - *first),
        _ => None,
    }
}
