use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use electric_motor::config::load_engine_configs;
use electric_motor::engine;
use electric_motor::export::{labels, summary, telemetry, writer_for_path};
use electric_motor::propulsion::PropertyTree;
use electric_motor::simulation::{SimulationConfig, ThrottleProfile, run_simulation};
use electric_motor::units::watts_to_hp;
use log::{LevelFilter, Log, Metadata, Record};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Run an electric motor against its thruster at a fixed time step"
)]
struct Cli {
    /// Engine catalog: YAML list, single TOML file, or directory of TOML files
    #[arg(long, default_value = "configs/motors")]
    config: PathBuf,

    /// Engine name from the catalog (case-insensitive, defaults to the first entry)
    #[arg(long)]
    engine: Option<String>,

    /// Normalized throttle command (not clamped)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    throttle: f64,

    /// Switch the throttle to `--step-to` at this time (s)
    #[arg(long, requires = "step_to")]
    step_at: Option<f64>,

    /// Throttle applied from `--step-at` onwards
    #[arg(long, requires = "step_at", allow_negative_numbers = true)]
    step_to: Option<f64>,

    /// Ramp the throttle linearly to this value, then hold it
    #[arg(
        long,
        requires = "ramp_over",
        conflicts_with = "step_at",
        allow_negative_numbers = true
    )]
    ramp_to: Option<f64>,

    /// Ramp length (s)
    #[arg(long, requires = "ramp_to")]
    ramp_over: Option<f64>,

    /// Simulated time (s)
    #[arg(long, default_value_t = 5.0)]
    duration: f64,

    /// Frame time step (s)
    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    /// Propeller advance forwarded to the thruster
    #[arg(long, default_value_t = 0.0)]
    advance: f64,

    /// Feather the propeller
    #[arg(long, default_value_t = false)]
    feather: bool,

    /// Write per-frame telemetry CSV (`-` for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON run summary
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Delimiter for the engine label/value lines
    #[arg(long, default_value = ",")]
    delimiter: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "[{}] {}",
                record.level().as_str().to_lowercase(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = load_engine_configs(&cli.config)?;
    let (engine_number, engine_cfg) = engine::select(&catalog, cli.engine.as_deref())?;
    let mut motor = engine::from_config(engine_cfg, engine_number)?;

    let throttle = match (cli.step_at, cli.step_to, cli.ramp_to, cli.ramp_over) {
        (Some(at_s), Some(after), _, _) => ThrottleProfile::Step {
            before: cli.throttle,
            after,
            at_s,
        },
        (_, _, Some(to), Some(duration_s)) => ThrottleProfile::Ramp {
            from: cli.throttle,
            to,
            duration_s,
        },
        _ => ThrottleProfile::Constant(cli.throttle),
    };
    let sim_config = SimulationConfig {
        prop_advance: cli.advance,
        prop_feather: cli.feather,
        ..SimulationConfig::new(cli.duration, cli.dt, throttle)
    };

    let mut properties = PropertyTree::new();
    let report = run_simulation(&mut motor, &sim_config, &mut properties)?;

    let csv_to_stdout = cli.csv.as_deref() == Some(Path::new("-"));
    if let Some(path) = &cli.csv {
        let writer = writer_for_path(path)?;
        telemetry::write_records(writer, &report.telemetry())?;
    }
    let run_summary = report.summary(&motor, &sim_config);
    if let Some(path) = &cli.summary {
        summary::write_summary(path, &run_summary)?;
    }

    let mut out: Box<dyn Write> = if csv_to_stdout {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };

    let rated_watts = motor.config().max_power_watts;
    writeln!(out, "=== Motor Run ===")?;
    writeln!(
        out,
        "Engine          : {} (engine {}, {}-commanded)",
        motor.name(),
        motor.engine_number(),
        motor.mode().label()
    )?;
    writeln!(
        out,
        "Rated power     : {:.1} W ({:.3} hp)",
        rated_watts,
        watts_to_hp(rated_watts)
    )?;
    if motor.filter().is_enabled() {
        writeln!(out, "Feedback filter : tau = {:.3} s", motor.filter().tau())?;
    } else {
        writeln!(out, "Feedback filter : disabled")?;
    }
    writeln!(
        out,
        "Frames          : {} x {} s",
        run_summary.steps, run_summary.dt_s
    )?;
    writeln!(out, "Final power     : {:.3} hp", report.final_horsepower)?;
    writeln!(out, "Peak power      : {:.3} hp", report.peak_horsepower)?;
    writeln!(
        out,
        "Mean power      : {:.1} ft-lbf/s",
        report.mean_power_ftlb_s
    )?;
    writeln!(out, "Saturated frames: {}", report.saturated_steps)?;
    writeln!(out, "Thruster RPM    : {:.1}", report.final_thruster_rpm)?;
    for (name, value) in properties.iter() {
        writeln!(out, "{name} = {value:.3}")?;
    }
    writeln!(out, "{}", labels::engine_labels(&motor, &cli.delimiter))?;
    writeln!(out, "{}", labels::engine_values(&motor, &cli.delimiter))?;

    Ok(())
}
