//! 调度中的数据包
//!
//! 事件集中的条目：一个在途数据包及其下一动作的完成时间。

use super::time::SimTime;
use crate::net::Packet;
use std::cmp::Ordering;

/// 在途数据包。排序键为 (scheduled_at, serial)。
///
/// 数据包按序号顺序进入事件集，移动时保持原有位置，因此“先插入者优先”
/// 等价于“序号小者优先”。
#[derive(Debug)]
pub struct ScheduledPacket(pub(crate) Packet);

impl ScheduledPacket {
    pub fn at(&self) -> SimTime {
        self.0.scheduled_at
    }

    pub fn serial(&self) -> u64 {
        self.0.serial
    }
}

// BinaryHeap 是 max-heap；我们需要最小时间优先，因此反向比较。
impl Ord for ScheduledPacket {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.at().total_cmp(&other.at()) {
            Ordering::Equal => self.serial().cmp(&other.serial()),
            ord => ord,
        }
        .reverse()
    }
}

impl PartialOrd for ScheduledPacket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledPacket {
    fn eq(&self, other: &Self) -> bool {
        self.serial() == other.serial() && self.at().total_cmp(&other.at()) == Ordering::Equal
    }
}

impl Eq for ScheduledPacket {}
