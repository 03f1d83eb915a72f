//! Dispersion sweep: many independent runs per input dispersion.
//!
//! Each run gets its own network built from the topology spec and its own
//! seed; only the per-run summaries are merged here. A failed run is kept
//! as a [`RunFailure`] instead of silently shrinking the aggregate.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dist::Dist;
use crate::error::ConfigError;
use crate::run::{self, RunConfig, RunResult, Termination};
use crate::topo::TopologySpec;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Input dispersions (seconds) to probe at.
    pub dispersions: Vec<f64>,
    /// Runs per dispersion.
    pub repeats: usize,
    /// Run `k` (counted across the whole sweep) uses seed `base_seed + k`.
    pub base_seed: u64,
    pub termination: Termination,
    pub record_delays: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            dispersions: Vec::new(),
            repeats: 1,
            base_seed: 0,
            termination: Termination::ProbesDrained,
            record_delays: false,
        }
    }
}

/// `start, start + step, ...` up to but excluding `stop`.
pub fn dispersions_from_range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// One probe pair observed in one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSample {
    pub dispersion: f64,
    pub repeat: usize,
    pub seed: u64,
    pub input_dispersion: f64,
    pub output_dispersion: f64,
    pub entries: [f64; 2],
    pub exits: [f64; 2],
    /// First hop of each probe found no other probe in the queue.
    pub first_probe_alone: Option<bool>,
    pub second_probe_alone: Option<bool>,
    /// First hop of the second probe saw the queue go idle since the last departure.
    pub second_probe_gap: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunFailure {
    pub dispersion: f64,
    pub repeat: usize,
    pub seed: u64,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    pub samples: Vec<PairSample>,
    pub failures: Vec<RunFailure>,
    /// Runs that finished with fewer than two probes out.
    pub incomplete: usize,
    pub completed_runs: usize,
    pub mean_true_utilization: Vec<f64>,
    pub mean_adjusted_utilization: Vec<f64>,
    /// Final clock of the last completed run.
    pub last_clock: f64,
    pub cross_traffic_delays: Vec<f64>,
}

impl SweepReport {
    pub fn mean_cross_traffic_delay(&self) -> Option<f64> {
        if self.cross_traffic_delays.is_empty() {
            return None;
        }
        let sum: f64 = self.cross_traffic_delays.iter().sum();
        Some(sum / self.cross_traffic_delays.len() as f64)
    }

    fn absorb(&mut self, dispersion: f64, repeat: usize, seed: u64, result: RunResult) {
        if self.mean_true_utilization.len() < result.utilization.len() {
            self.mean_true_utilization.resize(result.utilization.len(), 0.0);
            self.mean_adjusted_utilization
                .resize(result.utilization.len(), 0.0);
        }
        for u in &result.utilization {
            self.mean_true_utilization[u.queue] += u.true_utilization;
            self.mean_adjusted_utilization[u.queue] += u.adjusted_utilization;
        }
        self.completed_runs += 1;
        self.last_clock = result.final_clock.as_secs();
        self.cross_traffic_delays
            .extend_from_slice(&result.cross_traffic_delays);

        match pair_sample(dispersion, repeat, seed, &result) {
            Some(sample) => self.samples.push(sample),
            None => self.incomplete += 1,
        }
    }

    fn finalize(&mut self) {
        if self.completed_runs == 0 {
            return;
        }
        let n = self.completed_runs as f64;
        for v in self
            .mean_true_utilization
            .iter_mut()
            .chain(self.mean_adjusted_utilization.iter_mut())
        {
            *v /= n;
        }
    }
}

fn pair_sample(dispersion: f64, repeat: usize, seed: u64, result: &RunResult) -> Option<PairSample> {
    let (input, output) = (result.input_dispersion()?, result.output_dispersion()?);
    let first_hop = |i: usize| result.probes.get(i).and_then(|p| p.hops.first());
    Some(PairSample {
        dispersion,
        repeat,
        seed,
        input_dispersion: input,
        output_dispersion: output,
        entries: [
            result.probe_entries[0].as_secs(),
            result.probe_entries[1].as_secs(),
        ],
        exits: [result.probe_exits[0].as_secs(), result.probe_exits[1].as_secs()],
        first_probe_alone: first_hop(0).map(|h| h.queue_had_no_probes),
        second_probe_alone: first_hop(1).map(|h| h.queue_had_no_probes),
        second_probe_gap: first_hop(1).map(|h| h.gap),
    })
}

/// Runs every dispersion `cfg.repeats` times.
///
/// Fails up front only when the topology itself is invalid.
#[tracing::instrument(skip(spec, cfg), fields(dispersions = cfg.dispersions.len(), repeats = cfg.repeats))]
pub fn run_sweep(spec: &TopologySpec, cfg: &SweepConfig) -> Result<SweepReport, ConfigError> {
    spec.build()?;

    let mut report = SweepReport::default();
    let mut run_index: u64 = 0;
    for &dispersion in &cfg.dispersions {
        let probed = spec.with_probe_interarrival(Dist::deterministic(dispersion));
        for repeat in 0..cfg.repeats {
            let seed = cfg.base_seed.wrapping_add(run_index);
            run_index += 1;
            let run_cfg = RunConfig {
                termination: cfg.termination,
                seed,
                record_delays: cfg.record_delays,
            };
            let outcome = probed
                .build()
                .map_err(Into::into)
                .and_then(|net| run::run(net, &run_cfg));
            match outcome {
                Ok(result) => {
                    debug!(dispersion, repeat, seed, out = ?result.output_dispersion(), "run done");
                    report.absorb(dispersion, repeat, seed, result);
                }
                Err(e) => {
                    warn!(dispersion, repeat, seed, error = %e, "run failed");
                    report.failures.push(RunFailure {
                        dispersion,
                        repeat,
                        seed,
                        error: e.to_string(),
                    });
                }
            }
        }
    }
    report.finalize();

    info!(
        completed = report.completed_runs,
        failed = report.failures.len(),
        incomplete = report.incomplete,
        "sweep finished"
    );
    Ok(report)
}
