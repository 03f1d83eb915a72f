//! 运行记录器
//!
//! 记录探测包的进入/离开时间与逐跳观测，以及每个队列的非空时间窗口。

use std::collections::HashMap;

use crate::error::SimError;
use crate::net::{HopTrace, Network, Packet};
use crate::sim::SimTime;
use tracing::trace;

/// 队列非空的时间区间；`end` 为 None 表示尚未关闭
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupancyWindow {
    pub start: SimTime,
    pub end: Option<SimTime>,
}

impl OccupancyWindow {
    pub fn duration(&self) -> Option<f64> {
        self.end.map(|end| end - self.start)
    }
}

/// 一个到达终点的探测包
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRecord {
    pub serial: u64,
    pub entered_at: Option<SimTime>,
    pub exited_at: SimTime,
    pub hops: Vec<HopTrace>,
}

/// 单个队列的利用率
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueUtilization {
    pub queue: usize,
    pub busy_time: f64,
    pub true_utilization: f64,
    /// 扣除一对探测包发送时间后的利用率。
    ///
    /// 近似值：假设恰好一对探测包各经过该队列一次，
    /// 探测包大小取第一个生成的探测包。
    pub adjusted_utilization: f64,
}

/// 每对探测包
const PROBES_PER_PAIR: f64 = 2.0;

#[derive(Debug, Default)]
pub struct RunCollector {
    windows: Vec<Vec<OccupancyWindow>>,
    pending_probes: u64,
    probe_size: Option<f64>,
    injected: HashMap<u64, SimTime>,
    probe_entries: Vec<SimTime>,
    probe_exits: Vec<SimTime>,
    probes: Vec<ProbeRecord>,
    record_delays: bool,
    cross_delays: Vec<f64>,
}

impl RunCollector {
    pub fn new(num_queues: usize, record_delays: bool) -> Self {
        Self {
            windows: vec![Vec::new(); num_queues],
            record_delays,
            ..Self::default()
        }
    }

    pub fn pending_probes(&self) -> u64 {
        self.pending_probes
    }

    pub fn windows(&self, queue: usize) -> &[OccupancyWindow] {
        self.windows.get(queue).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn probe_created(&mut self, size: f64) {
        self.pending_probes += 1;
        self.probe_size.get_or_insert(size);
    }

    pub(crate) fn probe_injected(&mut self, serial: u64, now: SimTime) {
        self.injected.insert(serial, now);
        self.probe_entries.push(now);
    }

    /// 探测包到达终点。待离开计数下溢说明同一个包被交付了两次。
    pub(crate) fn probe_exited(&mut self, pkt: Packet, now: SimTime) -> Result<(), SimError> {
        self.pending_probes = self
            .pending_probes
            .checked_sub(1)
            .ok_or(SimError::ProbeCountUnderflow { serial: pkt.serial })?;
        self.probe_exits.push(now);
        self.probes.push(ProbeRecord {
            serial: pkt.serial,
            entered_at: self.injected.remove(&pkt.serial),
            exited_at: now,
            hops: pkt.trace,
        });
        Ok(())
    }

    pub(crate) fn cross_exited(&mut self, pkt: &Packet) {
        if self.record_delays {
            self.cross_delays
                .extend(pkt.trace.iter().filter_map(HopTrace::sojourn));
        }
    }

    pub(crate) fn open_window(&mut self, queue: usize, now: SimTime) {
        trace!(queue, now = %now, "队列开始忙");
        if let Some(w) = self.windows.get_mut(queue) {
            w.push(OccupancyWindow {
                start: now,
                end: None,
            });
        }
    }

    pub(crate) fn close_window(&mut self, queue: usize, now: SimTime) {
        trace!(queue, now = %now, "队列变空");
        if let Some(last) = self.windows.get_mut(queue).and_then(|w| w.last_mut()) {
            last.end = Some(now);
        }
    }

    /// 关闭仍未结束的窗口并计算每个队列的利用率
    pub(crate) fn finish(&mut self, clock: SimTime, net: &Network) -> Vec<QueueUtilization> {
        for w in &mut self.windows {
            if let Some(last) = w.last_mut().filter(|last| last.end.is_none()) {
                last.end = Some(clock);
            }
        }

        let total = clock.as_secs();
        net.queues()
            .map(|q| {
                let busy_time: f64 = self
                    .windows(q.index)
                    .iter()
                    .filter_map(OccupancyWindow::duration)
                    .sum();
                let ratio = |busy: f64| if total > 0.0 { busy / total } else { 0.0 };
                let true_utilization = ratio(busy_time);
                let adjusted_utilization = match self.probe_size {
                    Some(size) => ratio(busy_time - PROBES_PER_PAIR * q.tx_time(size)),
                    None => true_utilization,
                };
                QueueUtilization {
                    queue: q.index,
                    busy_time,
                    true_utilization,
                    adjusted_utilization,
                }
            })
            .collect()
    }

    pub(crate) fn into_parts(self) -> CollectedSeries {
        CollectedSeries {
            probe_entries: self.probe_entries,
            probe_exits: self.probe_exits,
            probes: self.probes,
            cross_delays: self.cross_delays,
        }
    }
}

pub(crate) struct CollectedSeries {
    pub probe_entries: Vec<SimTime>,
    pub probe_exits: Vec<SimTime>,
    pub probes: Vec<ProbeRecord>,
    pub cross_delays: Vec<f64>,
}
