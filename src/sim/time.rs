//! 仿真时间类型
//!
//! 逻辑时钟，以秒为单位的实数。仿真纯逻辑推进，与真实时间无关。

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// 仿真时间（秒）。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SimTime(pub(crate) f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    pub fn from_secs(s: f64) -> SimTime {
        SimTime(s)
    }
    pub fn from_millis(ms: f64) -> SimTime {
        SimTime(ms / 1_000.0)
    }
    pub fn from_micros(us: f64) -> SimTime {
        SimTime(us / 1_000_000.0)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// 取两者中较晚的时间
    pub fn max(self, other: SimTime) -> SimTime {
        if other.0 > self.0 { other } else { self }
    }

    /// 全序比较（NaN 排在最后），供事件堆使用
    pub fn total_cmp(&self, other: &SimTime) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;

    fn add(self, secs: f64) -> SimTime {
        SimTime(self.0 + secs)
    }
}

impl Sub for SimTime {
    type Output = f64;

    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.9}s", self.0)
    }
}
