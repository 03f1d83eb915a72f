//! 网络拓扑管理
//!
//! 元素表 + 输出链路。先添加元素，再用 `connect` 连线，最后 `validate`。

use super::element::{NetworkElement, PacketSource, ProbeSource};
use super::id::{ElementId, OutputLink};
use super::wire::Wire;
use crate::dist::Variate;
use crate::error::ConfigError;
use crate::queue::FifoQueue;
use tracing::debug;

/// 网络拓扑
#[derive(Debug, Default)]
pub struct Network {
    elements: Vec<NetworkElement>,
    queues: Vec<ElementId>,
    wires: Vec<ElementId>,
    sources: Vec<ElementId>,
    probes: Vec<ElementId>,
}

impl Network {
    fn push(&mut self, el: NetworkElement) -> ElementId {
        let id = ElementId(self.elements.len());
        debug!(id = %id, element = %el, "添加网络元素");
        self.elements.push(el);
        id
    }

    /// 添加队列
    pub fn add_queue(&mut self, service_rate: f64, drop_probability: f64) -> ElementId {
        let index = self.queues.len();
        let id = self.push(NetworkElement::Queue(FifoQueue::new(
            index,
            service_rate,
            drop_probability,
        )));
        self.queues.push(id);
        id
    }

    /// 添加线路
    pub fn add_wire(&mut self, propagation_delay: f64) -> ElementId {
        let index = self.wires.len();
        let id = self.push(NetworkElement::Wire(Wire::new(index, propagation_delay)));
        self.wires.push(id);
        id
    }

    /// 添加背景流量源
    pub fn add_packet_source(
        &mut self,
        size: Box<dyn Variate>,
        interarrival: Box<dyn Variate>,
    ) -> ElementId {
        let index = self.sources.len();
        let id = self.push(NetworkElement::PacketSource(PacketSource::new(
            index,
            size,
            interarrival,
        )));
        self.sources.push(id);
        id
    }

    /// 添加探测包源
    pub fn add_probe_source(
        &mut self,
        num_packets: u64,
        size: Box<dyn Variate>,
        interarrival: Box<dyn Variate>,
        injection_offset: f64,
    ) -> ElementId {
        let index = self.probes.len();
        let probe =
            ProbeSource::new(index, num_packets, size, interarrival).with_offset(injection_offset);
        let id = self.push(NetworkElement::ProbeSource(probe));
        self.probes.push(id);
        id
    }

    /// 设置元素的输出链路
    pub fn connect(&mut self, from: ElementId, to: OutputLink) -> Result<(), ConfigError> {
        let el = self
            .elements
            .get_mut(from.0)
            .ok_or_else(|| ConfigError::UndefinedElement {
                from: "connect".to_string(),
                target: from.to_string(),
            })?;
        el.set_output(to);
        Ok(())
    }

    /// 检查参数与连线：每条输出链路必须指向已存在的队列或线路
    pub fn validate(&self) -> Result<(), ConfigError> {
        for el in &self.elements {
            match el {
                NetworkElement::Queue(q) => {
                    let rate = q.service_rate();
                    if !(rate.is_finite() && rate > 0.0) {
                        return Err(ConfigError::InvalidServiceRate {
                            queue: q.index,
                            rate,
                        });
                    }
                    let p = q.drop_probability();
                    if !(0.0..=1.0).contains(&p) {
                        return Err(ConfigError::InvalidDropProbability {
                            queue: q.index,
                            probability: p,
                        });
                    }
                }
                NetworkElement::Wire(w) => {
                    let delay = w.propagation_delay;
                    if !(delay.is_finite() && delay >= 0.0) {
                        return Err(ConfigError::InvalidPropagationDelay {
                            wire: w.index,
                            delay,
                        });
                    }
                }
                NetworkElement::ProbeSource(p) => {
                    let offset = p.injection_offset;
                    if !(offset.is_finite() && offset >= 0.0) {
                        return Err(ConfigError::InvalidInjectionOffset {
                            probe: p.index,
                            offset,
                        });
                    }
                }
                NetworkElement::PacketSource(_) => {}
            }

            if let OutputLink::Element(target) = el.output() {
                match self.elements.get(target.0) {
                    None => {
                        return Err(ConfigError::UndefinedElement {
                            from: el.to_string(),
                            target: target.to_string(),
                        });
                    }
                    Some(t) if !t.accepts_packets() => {
                        return Err(ConfigError::NotAnEntryTarget {
                            from: el.to_string(),
                            target: t.to_string(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    pub fn element(&self, id: ElementId) -> Option<&NetworkElement> {
        self.elements.get(id.0)
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut NetworkElement> {
        self.elements.get_mut(id.0)
    }

    /// 元素名称（用于日志与错误信息）
    pub fn describe(&self, id: ElementId) -> String {
        self.element(id)
            .map(|el| el.to_string())
            .unwrap_or_else(|| format!("element {id}"))
    }

    pub fn num_queues(&self) -> usize {
        self.queues.len()
    }

    /// 按序号获取队列
    pub fn queue(&self, index: usize) -> Option<&FifoQueue> {
        match self.queues.get(index).and_then(|id| self.element(*id)) {
            Some(NetworkElement::Queue(q)) => Some(q),
            _ => None,
        }
    }

    /// 按声明顺序遍历所有队列
    pub fn queues(&self) -> impl Iterator<Item = &FifoQueue> + '_ {
        (0..self.queues.len()).filter_map(|i| self.queue(i))
    }

    pub fn queue_id(&self, index: usize) -> Option<ElementId> {
        self.queues.get(index).copied()
    }

    pub fn wire_id(&self, index: usize) -> Option<ElementId> {
        self.wires.get(index).copied()
    }

    pub fn packet_source_ids(&self) -> &[ElementId] {
        &self.sources
    }

    pub fn probe_source_ids(&self) -> &[ElementId] {
        &self.probes
    }
}
