//! calm CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Wire observability**: configure `tracing-subscriber` with an
//!    `EnvFilter` (`RUST_LOG`, default `info`) and a text or JSON formatter.
//!    Every `tracing` event emitted by the `calm` library flows through it.
//! 2. **Load configuration**: read [`CaptureSettings`] from a JSON file given
//!    with `--config` and install them before the first `attempt`.
//! 3. **Run a probe**: execute a built-in callable through
//!    [`calm::attempt`] (or [`calm::attempt_dyn`] for the unsupported shape),
//!    apply the requested transition, print the outcome's [`calm::Report`] as
//!    JSON, and optionally dispatch the outcome to [`TracingLogger`].

use std::fs::File;
use std::hint::black_box;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use calm::{attempt, attempt_dyn, BoxError, Callable, CaptureSettings, Outcome, TracingLogger};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "calm", about = "Run panic probes through calm", version, long_about = None)]
struct Cli {
    /// Path to a JSON file with capture settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a built-in callable and report its outcome.
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
struct ProbeArgs {
    /// What the probed callable does.
    #[arg(value_enum)]
    fault: Fault,

    /// Transition applied to the outcome before reporting.
    #[arg(long, value_enum, default_value_t = Transition::Leave)]
    then: Transition,

    /// Dispatch the outcome to the tracing logger after reporting. Panic
    /// outcomes then panic, fatal outcomes exit the process.
    #[arg(long)]
    log: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Fault {
    /// Integer division by zero.
    DivideByZero,
    /// An explicit `panic!` with a message.
    Explicit,
    /// Returns a value and no error.
    Succeed,
    /// Returns an error without panicking.
    ReturnError,
    /// A callable shape `attempt_dyn` does not accept.
    Unsupported,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Transition {
    /// Leave the level as produced.
    Leave,
    /// Downgrade a panic to an error.
    KeepCalm,
    /// Upgrade a panic to fatal.
    Escalate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    if let Some(path) = &cli.config {
        let settings = load_settings(path)?;
        calm::configure(settings).context("failed to install capture settings")?;
        info!(path = %path.display(), "capture settings loaded");
    }

    match cli.command {
        Command::Probe(args) => probe(&args),
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    let installed = match log_format {
        LogFormat::Text => subscriber.try_init(),
        LogFormat::Json => subscriber.json().try_init(),
    };
    installed.map_err(|err| anyhow::anyhow!("failed to init tracing: {err}"))
}

fn load_settings(path: &Path) -> Result<CaptureSettings> {
    let file =
        File::open(path).with_context(|| format!("cannot read config {}", path.display()))?;
    let settings: CaptureSettings = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid config {}", path.display()))?;
    settings.validate()?;
    Ok(settings)
}

fn probe(args: &ProbeArgs) -> Result<()> {
    let mut outcome = run_fault(args.fault);
    match args.then {
        Transition::Leave => {}
        Transition::KeepCalm => {
            outcome.keep_calm();
        }
        Transition::Escalate => {
            outcome.escalate();
        }
    }
    info!(fault = ?args.fault, level = %outcome.level(), "probe finished");

    let report = serde_json::to_string_pretty(&outcome.report())
        .context("failed to serialise outcome report")?;
    println!("{report}");

    if args.log {
        outcome.log(&mut TracingLogger::default());
    }
    Ok(())
}

fn run_fault(fault: Fault) -> Outcome {
    match fault {
        Fault::DivideByZero => attempt(Callable::value(|| 1 / black_box(0))),
        Fault::Explicit => attempt(Callable::unit(|| panic!("probe requested a panic"))),
        Fault::Succeed => attempt(Callable::value(|| 17_i32)),
        Fault::ReturnError => attempt(Callable::fallible(|| -> Result<(), BoxError> {
            Err("probe returned an error".into())
        })),
        Fault::Unsupported => {
            let pair: Box<dyn FnOnce() -> (i32, i32)> = Box::new(|| (17, 0));
            attempt_dyn(pair)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use calm::{FaultCode, Level};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn probe_arguments_parse() {
        let cli = Cli::try_parse_from([
            "calm",
            "--log-format",
            "json",
            "probe",
            "divide-by-zero",
            "--then",
            "keep-calm",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Probe(args) = cli.command;
        assert_eq!(args.fault, Fault::DivideByZero);
        assert_eq!(args.then, Transition::KeepCalm);
        assert!(!args.log);
    }

    #[test]
    fn faults_map_to_expected_levels() {
        let outcome = run_fault(Fault::DivideByZero);
        assert_eq!(outcome.level(), Level::Panic);
        assert!(outcome.text().contains("divide by zero"));

        assert_eq!(run_fault(Fault::Explicit).text(), "panic: probe requested a panic");
        assert_eq!(run_fault(Fault::Succeed).value_as::<i32>(), Some(&17));
        assert!(run_fault(Fault::ReturnError).is_ok());

        let unsupported = run_fault(Fault::Unsupported);
        assert_eq!(unsupported.level(), Level::Error);
        assert_eq!(unsupported.code(), FaultCode::UnsupportedShape.as_u32());
    }

    #[test]
    fn settings_file_is_loaded_and_validated() {
        let dir = std::env::temp_dir().join(format!("calm-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.json");
        std::fs::write(&good, r#"{ "buffer_size": 2048, "echo_intercepted": true }"#).unwrap();
        let settings = load_settings(&good).unwrap();
        assert_eq!(settings.buffer_size, 2048);
        assert!(settings.echo_intercepted);

        let bad = dir.join("bad.json");
        std::fs::write(&bad, r#"{ "buffer_size": 1 }"#).unwrap();
        assert!(load_settings(&bad).is_err());

        assert!(load_settings(&dir.join("missing.json")).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
