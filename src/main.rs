//! main.rs
//! Entry point for dirnav

use dirnav::app::AppState;
use dirnav::config::Config;
use dirnav::core::terminal::{TerminalSession, restore_terminal};
use dirnav::core::{ListOptions, list_dir};
use dirnav::utils::cli::{CliAction, handle_args};
use dirnav::utils::{expand_home_path, init_logging, normalize_path};

use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal();

        eprintln!("\n[dirnav] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let start_dir = match handle_args() {
        CliAction::Exit => return Ok(()),
        CliAction::Fail => std::process::exit(1),
        CliAction::RunApp => std::env::current_dir()?,
        CliAction::RunAppAtPath(path_arg) => resolve_start_dir(&path_arg),
    };

    let config = Config::load();
    let _log_guard = init_logging(config.general().log_level());

    let options = ListOptions {
        show_hidden: config.general().show_hidden(),
        scripts: config.interpreters(),
    };
    if let Err(e) = list_dir(&start_dir, &options) {
        eprintln!("\n[dirnav] Error: {e}");
        std::process::exit(1);
    }

    let mut session = match TerminalSession::start() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("\n[dirnav] Error: cannot set up the terminal: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(dir = %start_dir.display(), "dirnav started");
    let mut app = AppState::from_dir(&config, &start_dir);
    session.run(&mut app)
}

/// Absolute, normalized form of the PATH argument.
fn resolve_start_dir(arg: &str) -> PathBuf {
    let expanded = expand_home_path(arg);
    let absolute = std::path::absolute(&expanded).unwrap_or(expanded);
    normalize_path(&absolute)
}
