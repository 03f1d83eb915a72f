//! 网络元素
//!
//! 四种元素：队列、线路、背景流量源、探测包源。

use std::fmt;

use super::id::OutputLink;
use super::wire::Wire;
use crate::dist::Variate;
use crate::queue::FifoQueue;

/// 背景流量源：每次只允许一个尚未注入的包存在
#[derive(Debug)]
pub struct PacketSource {
    pub index: usize,
    pub size: Box<dyn Variate>,
    pub interarrival: Box<dyn Variate>,
    pub output: OutputLink,
    /// 已生成但尚未注入网络的包
    pub(crate) pending_emission: bool,
}

impl PacketSource {
    pub fn new(index: usize, size: Box<dyn Variate>, interarrival: Box<dyn Variate>) -> Self {
        Self {
            index,
            size,
            interarrival,
            output: OutputLink::Sink,
            pending_emission: false,
        }
    }

    pub fn pending_emission(&self) -> bool {
        self.pending_emission
    }
}

/// 探测包源：所有探测包在仿真开始时一次性生成
#[derive(Debug)]
pub struct ProbeSource {
    pub index: usize,
    pub size: Box<dyn Variate>,
    pub interarrival: Box<dyn Variate>,
    pub output: OutputLink,
    /// 尚未生成的探测包数量
    pub(crate) remaining: u64,
    /// 第一个探测包相对时间零点的注入时刻（秒）
    pub injection_offset: f64,
}

/// 默认注入偏移，让背景流量先进入稳态
pub const DEFAULT_INJECTION_OFFSET: f64 = 0.10;

impl ProbeSource {
    pub fn new(
        index: usize,
        num_packets: u64,
        size: Box<dyn Variate>,
        interarrival: Box<dyn Variate>,
    ) -> Self {
        Self {
            index,
            size,
            interarrival,
            output: OutputLink::Sink,
            remaining: num_packets,
            injection_offset: DEFAULT_INJECTION_OFFSET,
        }
    }

    pub fn with_offset(mut self, injection_offset: f64) -> Self {
        self.injection_offset = injection_offset;
        self
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

/// 网络元素
#[derive(Debug)]
pub enum NetworkElement {
    Queue(FifoQueue),
    Wire(Wire),
    PacketSource(PacketSource),
    ProbeSource(ProbeSource),
}

impl NetworkElement {
    pub fn output(&self) -> OutputLink {
        match self {
            NetworkElement::Queue(q) => q.output,
            NetworkElement::Wire(w) => w.output,
            NetworkElement::PacketSource(s) => s.output,
            NetworkElement::ProbeSource(p) => p.output,
        }
    }

    pub(crate) fn set_output(&mut self, link: OutputLink) {
        match self {
            NetworkElement::Queue(q) => q.output = link,
            NetworkElement::Wire(w) => w.output = link,
            NetworkElement::PacketSource(s) => s.output = link,
            NetworkElement::ProbeSource(p) => p.output = link,
        }
    }

    /// 只有队列和线路可以接收数据包
    pub fn accepts_packets(&self) -> bool {
        matches!(self, NetworkElement::Queue(_) | NetworkElement::Wire(_))
    }
}

impl fmt::Display for NetworkElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkElement::Queue(q) => write!(f, "queue {}", q.index),
            NetworkElement::Wire(w) => write!(f, "wire {}", w.index),
            NetworkElement::PacketSource(s) => write!(f, "source {}", s.index),
            NetworkElement::ProbeSource(p) => write!(f, "probe source {}", p.index),
        }
    }
}
