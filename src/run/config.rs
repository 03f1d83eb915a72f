use crate::sim::SimTime;

/// 运行终止方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// 所有探测包离开网络后停止
    ProbesDrained,
    /// 时钟超过给定时间后停止，剩余在途包被丢弃
    Until(SimTime),
}

/// 单次运行配置
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub termination: Termination,
    /// 随机数种子；相同拓扑 + 相同种子 => 相同的运行
    pub seed: u64,
    /// 记录每个到达终点的非探测包的逐跳时延
    pub record_delays: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            termination: Termination::ProbesDrained,
            seed: 0,
            record_delays: false,
        }
    }
}

impl RunConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn until(mut self, bound: SimTime) -> Self {
        self.termination = Termination::Until(bound);
        self
    }
}
