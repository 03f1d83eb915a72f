//! 线路类型
//!
//! 固定传播时延，不限带宽、不排队。

use super::id::OutputLink;

/// 传播线路
#[derive(Debug, Clone)]
pub struct Wire {
    pub index: usize,
    /// 传播时延（秒）
    pub propagation_delay: f64,
    pub output: OutputLink,
}

impl Wire {
    /// 创建新线路
    pub fn new(index: usize, propagation_delay: f64) -> Self {
        Self {
            index,
            propagation_delay,
            output: OutputLink::Sink,
        }
    }
}
