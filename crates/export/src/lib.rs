//! Export helpers: delimited engine labels/values, CSV telemetry and JSON summaries.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod labels {
    use motor_propulsion::{ElectricMotor, Thruster};

    /// Column labels for an engine followed by its thruster's labels.
    pub fn engine_labels<T: Thruster>(motor: &ElectricMotor<T>, delimiter: &str) -> String {
        format!(
            "{} HP (engine {}){}{}",
            motor.name(),
            motor.engine_number(),
            delimiter,
            motor
                .thruster()
                .labels(motor.engine_number(), delimiter)
        )
    }

    /// Values matching [`engine_labels`], horsepower first.
    pub fn engine_values<T: Thruster>(motor: &ElectricMotor<T>, delimiter: &str) -> String {
        format!(
            "{}{}{}",
            motor.horsepower(),
            delimiter,
            motor.thruster().values(delimiter)
        )
    }
}

pub mod telemetry {
    use std::io::Write;

    use serde::Serialize;

    /// Column order written by [`write_records`].
    pub const HEADER: &str = "time_s,throttle,raw_power_ftlb_s,commanded_power_ftlb_s,horsepower,filtered_feedback,thruster_rpm,power_required_ftlb_s,saturated";

    /// One CSV row per simulation frame.
    #[derive(Debug, Clone, Serialize)]
    pub struct TelemetryRecord {
        pub time_s: f64,
        pub throttle: f64,
        pub raw_power_ftlb_s: f64,
        pub commanded_power_ftlb_s: f64,
        pub horsepower: f64,
        pub filtered_feedback: f64,
        pub thruster_rpm: f64,
        pub power_required_ftlb_s: f64,
        pub saturated: bool,
    }

    /// Write the header and every record as CSV.
    pub fn write_records<W: Write>(writer: W, records: &[TelemetryRecord]) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(HEADER.split(','))?;
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

pub mod summary {
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    /// Run-level summary written as a JSON sidecar.
    #[derive(Debug, Clone, Serialize)]
    pub struct RunSummary {
        pub engine: String,
        pub engine_number: usize,
        pub mode: String,
        pub max_power_watts: f64,
        pub tau_s: f64,
        pub duration_s: f64,
        pub dt_s: f64,
        pub steps: usize,
        pub final_horsepower: f64,
        pub peak_horsepower: f64,
        pub mean_power_ftlb_s: f64,
        pub saturated_steps: usize,
        pub final_thruster_rpm: f64,
    }

    /// Write the summary as pretty JSON, creating parent directories.
    pub fn write_summary(output: &Path, summary: &RunSummary) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(output)?, summary)?;
        Ok(())
    }
}
