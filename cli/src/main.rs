//! Command-line runner
//!
//! ```text
//! signal-control-cli <input.json> <output.json> [--config cfg.json] [--debug true|false] [--stats stats.json]
//! ```
//!
//! Reads the command document, runs it, writes the per-step result to
//! `output.json` and the run statistics to `--stats` (default:
//! `output_stats.json` next to the output file).

use log::info;
use serde::Serialize;
use serde_json::to_string_pretty;
use signal_control_core::{
    load_commands, CommandError, ConfigError, Orchestrator, SignalConfig, SimulationError,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

const USAGE: &str = "usage: signal-control-cli <input.json> <output.json> [--config cfg.json] [--debug true|false] [--stats stats.json]";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Commands(#[from] CommandError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug)]
struct Args {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    debug: bool,
    stats: Option<PathBuf>,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let mut positional = Vec::new();
        let mut config = None;
        let mut debug = false;
        let mut stats = None;

        while let Some(arg) = raw.next() {
            match arg.as_str() {
                "--config" => config = Some(PathBuf::from(Self::value(&arg, raw.next())?)),
                "--stats" => stats = Some(PathBuf::from(Self::value(&arg, raw.next())?)),
                "--debug" => {
                    debug = match Self::value(&arg, raw.next())?.to_ascii_lowercase().as_str() {
                        "true" => true,
                        "false" => false,
                        other => {
                            return Err(CliError::Usage(format!(
                                "--debug expects true or false, got {:?}",
                                other
                            )))
                        }
                    }
                }
                flag if flag.starts_with("--") => {
                    return Err(CliError::Usage(format!("unknown option {}", flag)))
                }
                _ => positional.push(PathBuf::from(&arg)),
            }
        }

        let mut positional = positional.into_iter();
        match (positional.next(), positional.next(), positional.next()) {
            (Some(input), Some(output), None) => Ok(Self {
                input,
                output,
                config,
                debug,
                stats,
            }),
            _ => Err(CliError::Usage(
                "expected exactly an input and an output file".to_string(),
            )),
        }
    }

    fn value(flag: &str, value: Option<String>) -> Result<String, CliError> {
        value.ok_or_else(|| CliError::Usage(format!("{} needs a value", flag)))
    }

    fn stats_path(&self) -> PathBuf {
        match &self.stats {
            Some(path) => path.clone(),
            None => self
                .output
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join("output_stats.json"),
        }
    }
}

fn write_json<T: Serialize>(
    path: &Path,
    what: &'static str,
    value: &T,
) -> Result<(), CliError> {
    let json = to_string_pretty(value).map_err(|source| CliError::Serialize { what, source })?;
    std::fs::write(path, json).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => SignalConfig::from_file(path)?,
        None => SignalConfig::default(),
    };
    let commands = load_commands(&args.input)?;

    let mut orchestrator = Orchestrator::new(config)?;
    orchestrator.set_tracing(args.debug);
    orchestrator.execute_commands(&commands);

    write_json(&args.output, "result", &orchestrator.result())?;
    let stats_path = args.stats_path();
    write_json(&stats_path, "statistics", &orchestrator.statistics())?;

    info!(
        "wrote {} and {}",
        args.output.display(),
        stats_path.display()
    );
    if orchestrator.event_log().is_enabled() {
        info!("{} trace events recorded", orchestrator.event_log().len());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
