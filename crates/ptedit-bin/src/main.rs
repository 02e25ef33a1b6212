//! ptedit entrypoint.
//!
//! Headless driver for the editing core: opens the document, replays a
//! command script (standing in for a window system's decoded key events),
//! and saves on exit or end of script.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::dispatch;
use core_actions::io_ops::{open_document, write_document};
use core_config::load_from;
use core_model::{EditorModel, surface_from_config};
use core_render::GlyphTable;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod script;

const LOG_FILE_NAME: &str = "ptedit.log";

#[derive(Parser, Debug)]
#[command(name = "ptedit", version, about = "Piece-table line editor")]
struct Args {
    /// Document to open and save. Falls back to `SAVE_TXT`, then `[document].path`, then `saved.txt`.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `ptedit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Command script to replay; stdin when omitted.
    #[arg(long = "script")]
    pub script: Option<PathBuf>,
    /// Print the saved document to stdout.
    #[arg(long = "print")]
    pub print: bool,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global subscriber already installed; drop guard so the writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ScriptStats {
    commands: usize,
    skipped: usize,
    quit: bool,
}

/// Feed every script line to the dispatcher until `exit` or end of input.
///
/// Unparseable lines are logged and skipped. A dispatch error is fatal.
fn run_script<R: BufRead>(reader: R, model: &mut EditorModel) -> Result<ScriptStats> {
    let mut stats = ScriptStats::default();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("reading script line {line_no}"))?;
        let commands = match script::parse_line(&line) {
            Ok(commands) => commands,
            Err(e) => {
                warn!(target: "runtime.script", line = line_no, error = %e, "script_line_skipped");
                stats.skipped += 1;
                continue;
            }
        };
        for command in commands {
            let result = dispatch(command, model)
                .with_context(|| format!("applying {command:?} from script line {line_no}"))?;
            stats.commands += 1;
            if result.quit {
                stats.quit = true;
                return Ok(stats);
            }
        }
    }
    Ok(stats)
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let path = config.document_path(args.path.as_deref());
    let viewport = config.viewport();
    let opened = open_document(&path, viewport.initial_line_count());
    info!(
        target: "runtime.startup",
        path = %path.display(),
        loaded = opened.loaded,
        fresh = opened.fresh,
        lines = opened.lines.len(),
        config_source = ?config.source,
        "bootstrap_complete"
    );

    let mut model = EditorModel::new(
        opened.lines,
        surface_from_config(&config),
        GlyphTable::placeholder(),
    )?;

    let stats = match args.script.as_ref() {
        Some(script) => {
            let file = File::open(script)
                .with_context(|| format!("opening script {}", script.display()))?;
            run_script(BufReader::new(file), &mut model)?
        }
        None => run_script(io::stdin().lock(), &mut model)?,
    };

    let written = match write_document(&path, model.line_list()) {
        Ok(n) => n,
        Err(e) => {
            tracing::error!(target: "io", path = %path.display(), error = %e, "file_write_error");
            return Err(e);
        }
    };
    info!(
        target: "runtime",
        commands = stats.commands,
        skipped = stats.skipped,
        quit = stats.quit,
        lines = written,
        "shutdown"
    );

    if args.print {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", model.serialize())?;
    }
    drop(startup.log_guard.take());
    Ok(())
}
