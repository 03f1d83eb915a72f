//! 队列策略
//!
//! 只建模一种排队规则：FIFO 单服务台，带按概率丢弃非探测包的转发。

mod fifo;

pub use fifo::{Arrival, Departure, FifoQueue};
