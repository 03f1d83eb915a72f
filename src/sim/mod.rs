//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件：仿真时间、在途数据包集合与仿真器。

// 子模块声明
mod scheduled_packet;
mod simulator;
mod time;

// 重新导出公共接口
pub use scheduled_packet::ScheduledPacket;
pub use simulator::Simulator;
pub use time::SimTime;
