//! vimbox entrypoint: replay a key script against a text buffer and print
//! the result.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::load_from;
use core_model::SessionOptions;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod replay;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vimbox", version, about = "Replay vim-style keys against a text buffer")]
struct Args {
    /// Text file to edit. Standard input is read when omitted.
    pub path: Option<PathBuf>,
    /// Key script, e.g. `<Esc>2ddp` (see `<Esc>`, `<CR>`, `<BS>`, `<S-x>`, `<Ime>`).
    #[arg(short, long)]
    pub keys: String,
    /// Configuration file path (overrides discovery of `vimbox.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Initial caret offset in chars.
    #[arg(long, default_value_t = 0)]
    pub caret: usize,
    /// Print the final mode to stderr.
    #[arg(long)]
    pub mode: bool,
}

fn configure_logging(debug: bool) -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let file_appender = tracing_appender::rolling::never(log_dir, "vimbox.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let fallback = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("VIMBOX_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        // Global subscriber already installed; dropping the guard stops the writer.
        Err(_) => None,
    }
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

fn read_input(path: Option<&Path>) -> Result<String> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading standard input")?;
            buf
        }
    };
    // Surfaces hold `\n` line breaks only.
    Ok(content.replace("\r\n", "\n"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let _log_guard = configure_logging(config.debug());
    install_panic_hook();
    info!(
        target: "runtime.startup",
        path = args.path.as_ref().map(|p| p.display().to_string()).as_deref(),
        config_override = args.config.is_some(),
        config = config.source.as_ref().map(|p| p.display().to_string()).as_deref(),
        keys = args.keys.as_str(),
        "startup"
    );

    let content = read_input(args.path.as_deref())?;
    let caret = args.caret.min(content.chars().count());
    if caret != args.caret {
        warn!(target: "runtime.startup", requested = args.caret, clamped = caret, "caret_clamped");
    }
    let options = SessionOptions {
        chord_window: config.chord_window(),
        history_depth: config.history_depth(),
        passthrough: config.passthrough().to_vec(),
    };
    let report = replay::replay(&content, caret, &args.keys, options)?;

    for msg in &report.messages {
        eprintln!("{}", msg.text);
    }
    if args.mode {
        eprintln!("-- {} --", report.mode.as_str().to_uppercase());
    }
    print!("{}", report.text);
    Ok(())
}
