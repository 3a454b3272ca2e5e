//! Binary entrypoint for `shortkey-replay`.
//!
//! Feeds a key script through the shortkey engine and prints what each press
//! resolved to, or checks a binding config without running anything.
use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use clap::{Parser, Subcommand};
use keymap::{ActionId, Config};
use shortkey_engine::{Disposition, KeySource, Options, Trigger, configure};
use thiserror::Error;
use tokio::{runtime, time::sleep};
use tracing::{debug, info};

/// Key script parsing.
mod script;

use crate::script::{ScriptError, Step};

#[derive(Parser, Debug)]
#[command(
    name = "shortkey-replay",
    about = "Replay key scripts through the shortcut engine",
    version
)]
/// Command-line interface for the `shortkey-replay` binary.
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Logging controls
    #[command(flatten)]
    log: logging::LogArgs,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Replay a key script against a binding config.
    Run {
        /// Path to the binding config (RON)
        #[arg(long, value_name = "PATH")]
        config: PathBuf,

        /// Override the sequence timeout from the config
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,

        /// Key script to replay
        script: PathBuf,
    },
    /// Load and validate a binding config then exit.
    Check {
        /// Path to the binding config (RON)
        path: PathBuf,

        /// Dump the resolved bindings as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
}

/// Failures surfaced to the user.
#[derive(Debug, Error)]
enum Error {
    /// Config could not be loaded or failed validation.
    #[error("{}", .0.pretty())]
    Config(#[from] keymap::Error),
    /// Script file could not be read.
    #[error("cannot read script {path:?}: {source}")]
    ReadScript {
        /// Script path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Script contents did not parse.
    #[error(transparent)]
    Script(#[from] ScriptError),
    /// The engine refused to start.
    #[error(transparent)]
    Engine(#[from] shortkey_engine::Error),
    /// The tokio runtime could not be built.
    #[error("failed to start runtime: {0}")]
    Runtime(io::Error),
    /// `--dump` output could not be serialized.
    #[error("failed to serialize bindings: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log);

    let result = match &cli.command {
        Command::Check { path, dump } => check(path, *dump),
        Command::Run {
            config,
            timeout_ms,
            script,
        } => run(config, *timeout_ms, script),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Validate a config and print a summary, or the bindings as JSON.
fn check(path: &Path, dump: bool) -> Result<(), Error> {
    let cfg = Config::load_from_path(path)?;
    cfg.validate(Some(path))?;
    let table = cfg.table();
    if dump {
        println!("{}", serde_json::to_string_pretty(&table.snapshot())?);
    } else {
        println!(
            "{}: {} bindings, sequence timeout {}ms",
            path.display(),
            table.len(),
            cfg.sequence_timeout_ms
        );
    }
    Ok(())
}

/// Replay `script_path` against the bindings in `config_path`.
fn run(config_path: &Path, timeout_ms: Option<u64>, script_path: &Path) -> Result<(), Error> {
    let cfg = Config::load_from_path(config_path)?;
    let src = fs::read_to_string(script_path).map_err(|source| Error::ReadScript {
        path: script_path.to_path_buf(),
        source,
    })?;
    let lines = script::parse(&src)?;

    let mut options = Options::from(&cfg);
    if let Some(ms) = timeout_ms {
        options.sequence_timeout = Duration::from_millis(ms);
    }

    let rt = runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(Error::Runtime)?;

    rt.block_on(async move {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let handler = move |action: &ActionId| {
            counter.fetch_add(1, Ordering::Relaxed);
            info!(%action, "action fired");
        };

        let source = KeySource::new();
        let handle = configure(&source, cfg.table(), handler, options)?;

        for line in lines {
            match line.step {
                Step::Key { spec, event } => {
                    let disposition = source.emit(&event);
                    println!("{:>4}  {:<20} {}", line.number, spec, describe(&disposition));
                }
                Step::Wait(d) => {
                    let before = handle.pending_key();
                    sleep(d).await;
                    if let Some(first) = before
                        && handle.pending_key().is_none()
                    {
                        println!("{:>4}  {:<20} sequence '{}' expired", line.number, "", first);
                    }
                    debug!(ms = d.as_millis() as u64, "waited");
                }
                Step::Rebind(path) => {
                    let path = relative_to_script(script_path, &path);
                    let next = Config::load_from_path(&path)?;
                    handle.rebind(next.table());
                    println!(
                        "{:>4}  {:<20} rebound to {}",
                        line.number,
                        "",
                        path.display()
                    );
                }
            }
        }

        handle.dispose();
        println!("{} action(s) fired", fired.load(Ordering::Relaxed));
        Ok::<(), Error>(())
    })
}

/// Resolve a path named in a script against the script's own directory.
fn relative_to_script(script_path: &Path, path: &Path) -> PathBuf {
    match script_path.parent() {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// One-line description of what a key press resolved to.
fn describe(d: &Disposition) -> String {
    match d {
        Disposition::Suppressed => "suppressed (editable target)".to_string(),
        Disposition::Fired { action, trigger } => {
            let via = match trigger {
                Trigger::Chord => "chord",
                Trigger::Key => "key",
                Trigger::Sequence => "sequence",
            };
            format!("fired {} ({})", action, via)
        }
        Disposition::Pending { first } => format!("waiting for second key after '{}'", first),
        Disposition::Unmatched => "unmatched".to_string(),
    }
}
