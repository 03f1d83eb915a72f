//! 单次运行的上下文
//!
//! 一次运行的全部可变状态（时钟、在途包、元素状态、占用窗口、随机数）都归
//! `RunContext` 所有，多次运行之间不共享任何状态。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::collector::RunCollector;
use super::config::{RunConfig, Termination};
use super::result::{RunResult, StopReason};
use crate::error::SimError;
use crate::net::{HopTrace, Network, NetworkElement, OutputLink, Packet, PacketKind, Stats};
use crate::sim::{SimTime, Simulator};

pub struct RunContext {
    net: Network,
    sim: Simulator,
    collector: RunCollector,
    stats: Stats,
    rng: StdRng,
    termination: Termination,
    next_serial: u64,
    stopped: Option<StopReason>,
}

/// 检查采样值：负数、NaN、无穷大都视为错误，不重试
fn check_sample(value: f64, what: &'static str, element: &str) -> Result<f64, SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidSample {
            element: element.to_string(),
            what,
            value,
        })
    }
}

impl RunContext {
    /// 校验拓扑并生成全部探测包
    #[tracing::instrument(skip(net, cfg), fields(seed = cfg.seed))]
    pub fn new(net: Network, cfg: &RunConfig) -> Result<Self, SimError> {
        net.validate()?;
        let collector = RunCollector::new(net.num_queues(), cfg.record_delays);
        let mut ctx = Self {
            net,
            sim: Simulator::default(),
            collector,
            stats: Stats::default(),
            rng: StdRng::seed_from_u64(cfg.seed),
            termination: cfg.termination,
            next_serial: 0,
            stopped: None,
        };
        ctx.seed_probes()?;
        debug!(
            probes = ctx.stats.created_probes,
            pending = ctx.collector.pending_probes(),
            "探测包已生成"
        );
        Ok(ctx)
    }

    pub fn now(&self) -> SimTime {
        self.sim.now()
    }

    pub fn network(&self) -> &Network {
        &self.net
    }

    pub fn collector(&self) -> &RunCollector {
        &self.collector
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn pending_probes(&self) -> u64 {
        self.collector.pending_probes()
    }

    pub fn in_flight(&self) -> impl Iterator<Item = &Packet> {
        self.sim.in_flight()
    }

    fn alloc_serial(&mut self) -> u64 {
        let serial = self.next_serial;
        self.next_serial += 1;
        serial
    }

    /// 第一个探测包在 offset 时刻注入，之后每个包再加一次间隔采样
    fn seed_probes(&mut self) -> Result<(), SimError> {
        let ids = self.net.probe_source_ids().to_vec();
        for id in ids {
            let name = self.net.describe(id);
            let mut planned = Vec::new();
            if let Some(NetworkElement::ProbeSource(p)) = self.net.element_mut(id) {
                let mut at = SimTime::from_secs(p.injection_offset);
                while p.remaining > 0 {
                    if !planned.is_empty() {
                        let gap = p.interarrival.sample(&mut self.rng);
                        at = at + check_sample(gap, "interarrival", &name)?;
                    }
                    let size = p.size.sample(&mut self.rng);
                    planned.push((at, check_sample(size, "size", &name)?));
                    p.remaining -= 1;
                }
            }
            for (at, size) in planned {
                let serial = self.alloc_serial();
                self.collector.probe_created(size);
                self.stats.created_probes += 1;
                trace!(serial, at = %at, size, "生成探测包");
                self.sim
                    .schedule(Packet::new(PacketKind::Probe, serial, size, id, at));
            }
        }
        Ok(())
    }

    /// 为所有没有待注入包的背景流量源各生成一个包
    fn replenish_sources(&mut self) -> Result<(), SimError> {
        let now = self.sim.now();
        for i in 0..self.net.packet_source_ids().len() {
            let id = self.net.packet_source_ids()[i];
            let Some(NetworkElement::PacketSource(s)) = self.net.element_mut(id) else {
                continue;
            };
            if s.pending_emission {
                continue;
            }
            let size = s.size.sample(&mut self.rng);
            let gap = s.interarrival.sample(&mut self.rng);
            s.pending_emission = true;

            let name = self.net.describe(id);
            let size = check_sample(size, "size", &name)?;
            let gap = check_sample(gap, "interarrival", &name)?;
            let serial = self.alloc_serial();
            self.stats.created_cross += 1;
            let emit_at = now + gap;
            trace!(serial, source = i, emit_at = %emit_at, size, "生成背景流量包");
            self.sim
                .schedule(Packet::new(PacketKind::NonProbe, serial, size, id, emit_at));
        }
        Ok(())
    }

    /// 执行一次迭代；返回 Some 表示运行已停止
    pub fn step(&mut self) -> Result<Option<StopReason>, SimError> {
        if let Some(reason) = self.stopped {
            return Ok(Some(reason));
        }

        self.replenish_sources()?;

        if self.sim.is_empty() {
            return Ok(Some(self.stop(StopReason::Drained)));
        }
        match self.termination {
            Termination::ProbesDrained if self.collector.pending_probes() == 0 => {
                return Ok(Some(self.stop(StopReason::ProbesDrained)));
            }
            Termination::Until(bound) if self.sim.now() > bound => {
                return Ok(Some(self.stop(StopReason::TimeBound)));
            }
            _ => {}
        }

        let Some(pkt) = self.sim.pop() else {
            return Ok(Some(self.stop(StopReason::Drained)));
        };
        self.sim.advance_to(pkt.scheduled_at)?;
        trace!(
            now = %self.sim.now(),
            serial = pkt.serial,
            kind = ?pkt.kind,
            location = ?pkt.location,
            "处理数据包"
        );

        if let Some(pkt) = self.apply_exit(pkt)? {
            let pkt = self.apply_entry(pkt)?;
            self.sim.schedule(pkt);
        }
        Ok(None)
    }

    fn stop(&mut self, reason: StopReason) -> StopReason {
        self.stopped = Some(reason);
        reason
    }

    /// 运行直到满足终止条件
    pub fn run_to_end(&mut self) -> Result<StopReason, SimError> {
        info!("▶️  开始运行仿真");
        let mut steps: u64 = 0;
        let reason = loop {
            if let Some(reason) = self.step()? {
                break reason;
            }
            steps += 1;
        };
        info!(
            total_steps = steps,
            final_time = %self.sim.now(),
            reason = ?reason,
            "✅ 仿真完成"
        );
        Ok(reason)
    }

    /// 数据包离开当前元素。返回 None 表示包已离开网络（到达终点或被丢弃）。
    pub fn apply_exit(&mut self, mut pkt: Packet) -> Result<Option<Packet>, SimError> {
        let now = self.sim.now();
        let no_transition = |pkt: &Packet| SimError::NoTransition {
            serial: pkt.serial,
            element: pkt.location,
        };
        let Some(el) = pkt.location.and_then(|id| self.net.element_mut(id)) else {
            return Err(no_transition(&pkt));
        };

        let output = match el {
            NetworkElement::Queue(q) => {
                let departure = q.depart(pkt.kind)?;
                if departure.now_empty {
                    self.collector.close_window(q.index, now);
                }
                if let Some(hop) = pkt.last_hop_mut() {
                    hop.left_at = Some(now);
                }
                if !q.output.is_sink() && !pkt.is_probe() {
                    let u: f64 = self.rng.r#gen();
                    if u < q.drop_probability() {
                        debug!(serial = pkt.serial, queue = q.index, now = %now, "丢弃非探测包");
                        self.stats.dropped_cross += 1;
                        return Ok(None);
                    }
                }
                q.output
            }
            NetworkElement::Wire(w) => w.output,
            NetworkElement::PacketSource(s) => {
                s.pending_emission = false;
                s.output
            }
            NetworkElement::ProbeSource(p) => {
                self.collector.probe_injected(pkt.serial, now);
                p.output
            }
        };

        match output {
            OutputLink::Element(next) => {
                pkt.location = Some(next);
                Ok(Some(pkt))
            }
            OutputLink::Sink => {
                self.deliver_to_sink(pkt, now)?;
                Ok(None)
            }
        }
    }

    fn deliver_to_sink(&mut self, mut pkt: Packet, now: SimTime) -> Result<(), SimError> {
        pkt.location = None;
        match pkt.kind {
            PacketKind::Probe => {
                debug!(serial = pkt.serial, now = %now, "探测包离开网络");
                self.stats.delivered_probes += 1;
                self.collector.probe_exited(pkt, now)?;
            }
            PacketKind::NonProbe => {
                self.stats.delivered_cross += 1;
                self.collector.cross_exited(&pkt);
            }
        }
        Ok(())
    }

    /// 数据包进入新元素，计算其下一动作的完成时间
    pub fn apply_entry(&mut self, mut pkt: Packet) -> Result<Packet, SimError> {
        let now = self.sim.now();
        match pkt.location.and_then(|id| self.net.element_mut(id)) {
            Some(NetworkElement::Queue(q)) => {
                let arrival = q.arrive(pkt.kind, pkt.size, now);
                if arrival.was_empty {
                    self.collector.open_window(q.index, now);
                }
                pkt.trace.push(HopTrace {
                    queue: q.index,
                    entered_at: now,
                    left_at: None,
                    gap: arrival.gap,
                    queue_was_empty: arrival.was_empty,
                    queue_had_no_probes: arrival.had_no_probes,
                });
                trace!(
                    serial = pkt.serial,
                    queue = q.index,
                    occupancy = q.occupancy(),
                    departs_at = %arrival.departs_at,
                    "进入队列"
                );
                pkt.scheduled_at = arrival.departs_at;
                Ok(pkt)
            }
            Some(NetworkElement::Wire(w)) => {
                pkt.scheduled_at = now + w.propagation_delay;
                Ok(pkt)
            }
            _ => Err(SimError::NoTransition {
                serial: pkt.serial,
                element: pkt.location,
            }),
        }
    }

    /// 结束运行：关闭未结束的占用窗口、统计利用率，丢弃剩余在途包
    pub fn finish(mut self) -> RunResult {
        let final_clock = self.sim.now();
        self.stats.in_flight = self.sim.discard_in_flight() as u64;
        let utilization = self.collector.finish(final_clock, &self.net);
        let stop = self.stopped.unwrap_or(StopReason::Drained);
        let series = self.collector.into_parts();
        RunResult {
            probe_entries: series.probe_entries,
            probe_exits: series.probe_exits,
            probes: series.probes,
            utilization,
            final_clock,
            stats: self.stats,
            cross_traffic_delays: series.cross_delays,
            stop,
        }
    }
}
