//! 仿真器
//!
//! 维护逻辑时钟与在途数据包集合（按完成时间排序的最小堆）。

use super::scheduled_packet::ScheduledPacket;
use super::time::SimTime;
use crate::error::SimError;
use crate::net::Packet;
use std::collections::BinaryHeap;
use tracing::trace;

/// 事件驱动仿真器：维护当前时间与在途数据包。
#[derive(Debug, Default)]
pub struct Simulator {
    now: SimTime,
    q: BinaryHeap<ScheduledPacket>,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 在途数据包数量
    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// 按数据包的 `scheduled_at` 将其放入事件集
    pub fn schedule(&mut self, pkt: Packet) {
        trace!(
            now = %self.now,
            serial = pkt.serial,
            scheduled_at = %pkt.scheduled_at,
            "调度数据包"
        );
        self.q.push(ScheduledPacket(pkt));
    }

    /// 下一个待处理数据包的完成时间
    pub fn peek_at(&self) -> Option<SimTime> {
        self.q.peek().map(ScheduledPacket::at)
    }

    /// 取出完成时间最早的数据包（同时间按序号）
    pub fn pop(&mut self) -> Option<Packet> {
        self.q.pop().map(|item| item.0)
    }

    /// 推进时钟。时间倒退视为逻辑错误。
    pub fn advance_to(&mut self, at: SimTime) -> Result<(), SimError> {
        if at.as_secs().is_nan() || at < self.now {
            return Err(SimError::ClockRegression { now: self.now, at });
        }
        self.now = at;
        Ok(())
    }

    /// 丢弃所有在途数据包，返回丢弃数量
    pub fn discard_in_flight(&mut self) -> usize {
        let n = self.q.len();
        self.q.clear();
        n
    }

    /// 遍历在途数据包（顺序不定）
    pub fn in_flight(&self) -> impl Iterator<Item = &Packet> {
        self.q.iter().map(|item| &item.0)
    }
}
