//! 统计信息
//!
//! 单次运行的数据包计数，用于守恒检查。

/// 数据包计数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub created_probes: u64,
    pub created_cross: u64,
    pub delivered_probes: u64,
    pub delivered_cross: u64,
    pub dropped_cross: u64,
    /// 运行结束时仍在途（时间上限结束时被丢弃）
    pub in_flight: u64,
}

impl Stats {
    pub fn created(&self) -> u64 {
        self.created_probes + self.created_cross
    }

    /// created = delivered + dropped + in_flight
    pub fn is_conserved(&self) -> bool {
        self.created()
            == self.delivered_probes + self.delivered_cross + self.dropped_cross + self.in_flight
    }
}
