//! External process handling for dirnav.
//!
//! Scripts are run through an interpreter chosen by file extension ([Interpreters]) and plain
//! files are opened in a pager. Both are described by an [ExternalCommand] and run in the
//! foreground with [run_foreground] while the terminal session is suspended.

use crate::core::error::OpError;

use phf::phf_map;
use tracing::{info, warn};

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Built-in extension to interpreter table. Extensions are lowercase without the dot.
static DEFAULT_INTERPRETERS: phf::Map<&'static str, &'static str> = phf_map! {
    "py" => "python3",
    "sh" => "sh",
    "bash" => "bash",
    "pl" => "perl",
    "rb" => "ruby",
    "lua" => "lua",
    "js" => "node",
};

/// Extension to interpreter mapping used to recognise and run scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreters {
    map: HashMap<String, String>,
}

impl Default for Interpreters {
    fn default() -> Self {
        let map = DEFAULT_INTERPRETERS
            .entries()
            .map(|(ext, prog)| ((*ext).to_string(), (*prog).to_string()))
            .collect();
        Interpreters { map }
    }
}

impl Interpreters {
    /// Built-in table with user entries layered on top.
    ///
    /// Keys may carry a leading dot and any case. An empty interpreter removes the extension.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut table = Self::default();
        for (ext, prog) in overrides {
            let ext = ext.trim_start_matches('.').to_ascii_lowercase();
            if ext.is_empty() {
                continue;
            }
            let prog = prog.trim();
            if prog.is_empty() {
                table.map.remove(&ext);
            } else {
                table.map.insert(ext, prog.to_string());
            }
        }
        table
    }

    pub fn interpreter_for(&self, name: &OsStr) -> Option<&str> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        self.map.get(&ext).map(String::as_str)
    }

    #[inline]
    pub fn is_script_name(&self, name: &OsStr) -> bool {
        self.interpreter_for(name).is_some()
    }
}

/// What an external command is launched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchKind {
    Script,
    Pager,
}

/// A program to run in the foreground with the terminal released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<OsString>,
    kind: LaunchKind,
    target: PathBuf,
    pause: bool,
}

impl ExternalCommand {
    /// `interpreter <script>`, run from the script's directory.
    pub fn script(interpreter: &str, script: &Path, pause: bool) -> Self {
        ExternalCommand {
            program: interpreter.to_string(),
            args: vec![script.as_os_str().to_os_string()],
            kind: LaunchKind::Script,
            target: script.to_path_buf(),
            pause,
        }
    }

    /// Pager command line such as `less -R`, with the file appended.
    pub fn pager(pager: &str, file: &Path) -> Self {
        let mut parts = pager.split_whitespace();
        let program = parts.next().unwrap_or("less").to_string();
        let mut args: Vec<OsString> = parts.map(OsString::from).collect();
        args.push(file.as_os_str().to_os_string());

        ExternalCommand {
            program,
            args,
            kind: LaunchKind::Pager,
            target: file.to_path_buf(),
            pause: false,
        }
    }

    #[inline]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    #[inline]
    pub fn kind(&self) -> LaunchKind {
        self.kind
    }

    #[inline]
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn target_name(&self) -> String {
        self.target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.target.display().to_string())
    }

    #[inline]
    pub fn pause(&self) -> bool {
        self.pause
    }
}

/// Runs the command to completion with inherited stdio.
///
/// The terminal must already be released by the caller. There is no timeout.
pub fn run_foreground(cmd: &ExternalCommand) -> Result<ExitStatus, OpError> {
    let resolved = which::which(cmd.program())
        .map_err(|_| OpError::ExternalProgramNotFound(cmd.program().to_string()))?;

    let mut command = Command::new(&resolved);
    command.args(cmd.args());
    if cmd.kind() == LaunchKind::Script
        && let Some(dir) = cmd.target().parent()
        && !dir.as_os_str().is_empty()
    {
        command.current_dir(dir);
    }

    if cmd.pause() {
        let mut stdout = io::stdout();
        writeln!(
            stdout,
            "--- Running '{}' with {} ---\n",
            cmd.target_name(),
            cmd.program()
        )?;
        stdout.flush()?;
    }

    info!(program = %resolved.display(), target = %cmd.target().display(), "launching");
    let status = command.status().map_err(|e| {
        warn!(program = cmd.program(), error = %e, "spawn failed");
        if e.kind() == io::ErrorKind::NotFound {
            OpError::ExternalProgramNotFound(cmd.program().to_string())
        } else {
            OpError::IoError(e)
        }
    })?;

    if cmd.pause() {
        let mut stdout = io::stdout();
        writeln!(
            stdout,
            "\n--- '{}' finished (exit code {}) ---",
            cmd.target_name(),
            exit_code_label(&status)
        )?;
        write!(stdout, "Press Enter to return...")?;
        stdout.flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
    }

    Ok(status)
}

/// Exit code as text, `signal` when the child was killed by one.
pub fn exit_code_label(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}
