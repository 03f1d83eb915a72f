//! 探测包对色散扫描
//!
//! 对每个输入色散值重复运行仿真，输出 (输入色散, 输出色散) 对与平均利用率。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use mqsim_rs::run::Termination;
use mqsim_rs::sim::SimTime;
use mqsim_rs::sweep::{SweepConfig, SweepReport, dispersions_from_range, run_sweep};
use mqsim_rs::topo::{self, TopologySpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// 单个 10 Mbit/s 队列 + Internet mix 背景流量
    Single,
    /// 单个队列，无背景流量
    SingleIdle,
    /// queue -> wire -> queue，两个队列各有背景流量
    TwoHop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputStyle {
    /// 每行：输入色散 输出色散 探测包标志 -gap
    Dispersion,
    /// 每个探测包一行：进入时间 离开时间
    Times,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "dispersion_sweep",
    about = "Probe-pair dispersion sweep over a queueing network"
)]
struct Args {
    /// Scenario JSON (TopologySpec); overrides --preset
    #[arg(long)]
    scenario: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Preset::Single)]
    preset: Preset,

    /// Target cross-traffic utilization for presets
    #[arg(long, default_value_t = 0.30)]
    utilization: f64,

    /// First input dispersion (s)
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Sweep stops before this dispersion (s)
    #[arg(long, default_value_t = 0.005)]
    stop: f64,

    #[arg(long, default_value_t = 0.0005)]
    step: f64,

    /// Explicit dispersions (s), comma separated; overrides the range
    #[arg(long, value_delimiter = ',')]
    dispersion: Vec<f64>,

    /// Runs per dispersion
    #[arg(long, default_value_t = 100)]
    repeats: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop each run once the clock passes this time (s) instead of when probes drain
    #[arg(long)]
    until: Option<f64>,

    /// Record per-hop delays of cross-traffic packets
    #[arg(long)]
    record_delays: bool,

    #[arg(long, value_enum, default_value_t = OutputStyle::Dispersion)]
    output: OutputStyle,
}

fn flag(v: Option<bool>) -> &'static str {
    match v {
        Some(true) => "1",
        Some(false) => "0",
        None => "-",
    }
}

fn print_text(report: &SweepReport, style: OutputStyle) {
    for s in &report.samples {
        match style {
            OutputStyle::Times => {
                println!("{} {}", s.entries[0], s.exits[0]);
                println!("{} {}", s.entries[1], s.exits[1]);
            }
            _ => println!(
                "{:.10} {:.10}  {} {} -{}",
                s.input_dispersion,
                s.output_dispersion,
                flag(s.first_probe_alone),
                flag(s.second_probe_alone),
                flag(s.second_probe_gap)
            ),
        }
    }
    println!(
        "TRUE UTILIZATION (incl. probe packets): {:?}",
        report.mean_true_utilization
    );
    println!("ADJUSTED UTILIZATION: {:?}", report.mean_adjusted_utilization);
    println!("TIMECLOCK: {}", report.last_clock);
}

fn main() -> ExitCode {
    // 初始化 tracing（输出到 stderr，stdout 留给结果）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let spec = match &args.scenario {
        Some(path) => match TopologySpec::from_path(path) {
            Ok(spec) => spec,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        },
        None => match args.preset {
            Preset::Single => topo::single_queue(0.0, Some(args.utilization)),
            Preset::SingleIdle => topo::single_queue(0.0, None),
            Preset::TwoHop => topo::two_hop(0.0, args.utilization),
        },
    };

    let dispersions = if args.dispersion.is_empty() {
        dispersions_from_range(args.start, args.stop, args.step)
    } else {
        args.dispersion.clone()
    };
    let cfg = SweepConfig {
        dispersions,
        repeats: args.repeats,
        base_seed: args.seed,
        termination: args
            .until
            .map(|t| Termination::Until(SimTime::from_secs(t)))
            .unwrap_or(Termination::ProbesDrained),
        record_delays: args.record_delays,
    };

    let report = match run_sweep(&spec, &cfg) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    match args.output {
        OutputStyle::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        style => print_text(&report, style),
    }

    for f in &report.failures {
        eprintln!(
            "run failed: dispersion={} repeat={} seed={}: {}",
            f.dispersion, f.repeat, f.seed, f.error
        );
    }
    if let Some(mean) = report.mean_cross_traffic_delay() {
        eprintln!("((({mean})))");
        eprintln!("Total number of packets: {}", report.cross_traffic_delays.len());
    }

    if report.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
