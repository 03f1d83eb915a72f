//! FIFO 单服务台队列
//!
//! 不保存数据包本身：数据包留在仿真器的事件集中，队列只维护
//! busy_until 水位线与占用计数。新到达包的离开时间
//! = max(busy_until, now) + size / service_rate。

use crate::error::SimError;
use crate::net::{OutputLink, PacketKind};
use crate::sim::SimTime;

/// 到达时读取的队列状态（均为到达前的值）以及该包的离开时间
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    pub gap: bool,
    pub was_empty: bool,
    pub had_no_probes: bool,
    pub departs_at: SimTime,
}

/// 离开后的队列状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    pub now_empty: bool,
}

#[derive(Debug, Clone)]
pub struct FifoQueue {
    /// 队列序号（按声明顺序），用于 trace 与利用率统计
    pub index: usize,
    service_rate: f64,
    drop_probability: f64,
    busy_until: SimTime,
    occupancy: u64,
    probe_occupancy: u64,
    idle_since_last_departure: bool,
    arrivals: u64,
    probe_arrivals: u64,
    pub output: OutputLink,
}

impl FifoQueue {
    pub fn new(index: usize, service_rate: f64, drop_probability: f64) -> Self {
        Self {
            index,
            service_rate,
            drop_probability,
            busy_until: SimTime::ZERO,
            occupancy: 0,
            probe_occupancy: 0,
            idle_since_last_departure: false,
            arrivals: 0,
            probe_arrivals: 0,
            output: OutputLink::Sink,
        }
    }

    /// 服务速率（bytes/s）
    pub fn service_rate(&self) -> f64 {
        self.service_rate
    }

    pub fn drop_probability(&self) -> f64 {
        self.drop_probability
    }

    pub fn busy_until(&self) -> SimTime {
        self.busy_until
    }

    pub fn occupancy(&self) -> u64 {
        self.occupancy
    }

    pub fn probe_occupancy(&self) -> u64 {
        self.probe_occupancy
    }

    pub fn idle_since_last_departure(&self) -> bool {
        self.idle_since_last_departure
    }

    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn probe_arrivals(&self) -> u64 {
        self.probe_arrivals
    }

    /// 发送指定字节数所需的时间（秒）
    pub fn tx_time(&self, size: f64) -> f64 {
        size / self.service_rate
    }

    /// 数据包到达：先读取到达前状态，再更新计数与水位线
    pub fn arrive(&mut self, kind: PacketKind, size: f64, now: SimTime) -> Arrival {
        let gap = self.idle_since_last_departure;
        let was_empty = self.occupancy == 0;
        let had_no_probes = self.probe_occupancy == 0;

        self.occupancy += 1;
        self.arrivals += 1;
        if kind.is_probe() {
            self.probe_occupancy += 1;
            self.probe_arrivals += 1;
            self.idle_since_last_departure = false;
        }

        self.busy_until = self.busy_until.max(now) + self.tx_time(size);

        Arrival {
            gap,
            was_empty,
            had_no_probes,
            departs_at: self.busy_until,
        }
    }

    /// 数据包离开。计数下溢说明调度逻辑有误。
    pub fn depart(&mut self, kind: PacketKind) -> Result<Departure, SimError> {
        let underflow = || SimError::OccupancyUnderflow { queue: self.index };
        let occupancy = self.occupancy.checked_sub(1).ok_or_else(underflow)?;
        let probe_occupancy = if kind.is_probe() {
            self.probe_occupancy.checked_sub(1).ok_or_else(underflow)?
        } else {
            self.probe_occupancy
        };
        if probe_occupancy > occupancy {
            return Err(underflow());
        }

        self.occupancy = occupancy;
        self.probe_occupancy = probe_occupancy;
        let now_empty = occupancy == 0;
        if now_empty {
            self.idle_since_last_departure = true;
        }
        Ok(Departure { now_empty })
    }
}
