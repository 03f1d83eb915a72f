//! 网络模拟模块
//!
//! 此模块包含网络模型：数据包、网络元素（队列、线路、流量源、探测源）与拓扑。

// 子模块声明
mod element;
mod id;
mod network;
mod packet;
mod stats;
mod wire;

// 重新导出公共接口
pub use element::{DEFAULT_INJECTION_OFFSET, NetworkElement, PacketSource, ProbeSource};
pub use id::{ElementId, OutputLink};
pub use network::Network;
pub use packet::{HopTrace, Packet, PacketKind};
pub use stats::Stats;
pub use wire::Wire;
