//! 数据包类型
//!
//! 定义数据包及其逐跳观测记录。

use super::id::ElementId;
use crate::sim::SimTime;

/// 数据包类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Probe,
    NonProbe,
}

impl PacketKind {
    pub fn is_probe(self) -> bool {
        matches!(self, PacketKind::Probe)
    }
}

/// 数据包进入某个队列时的观测（读取的是到达前的队列状态）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HopTrace {
    /// 队列序号（按队列声明顺序）
    pub queue: usize,
    pub entered_at: SimTime,
    /// 离开该队列的时间；仍在队列中时为 None
    pub left_at: Option<SimTime>,
    /// 自上次离队以来队列一直为空（gap）
    pub gap: bool,
    pub queue_was_empty: bool,
    pub queue_had_no_probes: bool,
}

impl HopTrace {
    /// 在该队列中的停留时间（排队 + 服务）
    pub fn sojourn(&self) -> Option<f64> {
        self.left_at.map(|left| left - self.entered_at)
    }
}

/// 网络数据包
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub kind: PacketKind,
    pub serial: u64,
    pub size: f64,
    /// 当前所在元素；到达终点后为 None
    pub location: Option<ElementId>,
    /// 当前动作（出队 / 传播 / 注入）的完成时间
    pub scheduled_at: SimTime,
    pub trace: Vec<HopTrace>,
}

impl Packet {
    pub fn new(
        kind: PacketKind,
        serial: u64,
        size: f64,
        location: ElementId,
        scheduled_at: SimTime,
    ) -> Self {
        Self {
            kind,
            serial,
            size,
            location: Some(location),
            scheduled_at,
            trace: Vec::new(),
        }
    }

    pub fn is_probe(&self) -> bool {
        self.kind.is_probe()
    }

    /// 最近一次进入的队列记录
    pub fn last_hop_mut(&mut self) -> Option<&mut HopTrace> {
        self.trace.last_mut()
    }
}
