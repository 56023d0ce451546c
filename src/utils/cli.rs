//! Command-line argument parsing and help for dirnav.
//!
//! When invoked without arguments (`dn`) the browser opens in the current directory.

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    RunApp,
    RunAppAtPath(String),
    Exit,
    /// Bad arguments or a failed `--init`; the process exits with status 1.
    Fail,
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

/// Decides what to do with the arguments after the program name.
/// Informational flags print and return [CliAction::Exit], usage errors [CliAction::Fail].
pub fn parse_args(args: &[String]) -> CliAction {
    let arg = match args {
        [] => return CliAction::RunApp,
        [arg] => arg.as_str(),
        _ => {
            eprintln!("Error: dn accepts only one argument at a time.");
            eprintln!("Usage: dn [PATH] or dn [OPTION]");
            return CliAction::Fail;
        }
    };

    match arg {
        "--version" | "-v" => {
            println!("dirnav {}", env!("CARGO_PKG_VERSION"));
            CliAction::Exit
        }
        "-h" | "--help" => {
            print_help();
            CliAction::Exit
        }
        "--keybinds" | "--keys" => {
            println!("{KEYBINDS_TEXT}");
            CliAction::Exit
        }
        "--init" => match Config::generate_default(&Config::default_path()) {
            Ok(()) => CliAction::Exit,
            Err(e) => {
                eprintln!("Error: {e}");
                CliAction::Fail
            }
        },
        arg if !arg.starts_with('-') && !arg.trim().is_empty() => {
            CliAction::RunAppAtPath(arg.to_string())
        }
        arg => {
            eprintln!("Unknown argument: {arg}");
            eprintln!("Try --help for available options");
            CliAction::Fail
        }
    }
}

fn print_help() {
    println!(
        r#"dirnav - a small terminal directory browser

USAGE:
  dn [PATH]

PATH:
  Directory to open (defaults to current directory)

OPTIONS:
      --init              Generate a commented default configuration
      --keybinds          Display the default keybinds
  -h, --help              Print help information
  -v, --version           Display the installed version of dirnav

ENVIRONMENT:
  DIRNAV_CONFIG           Override the default config path
  DIRNAV_LOG              Log filter, e.g. "debug" (overrides [general] log_level)
  PAGER                   Viewer for plain files when [general] pager is unset
"#
    );
}

const KEYBINDS_TEXT: &str = r##"
=========================
 Key Bindings
=========================
[keys]
  go_up                     ["k", "Up"]
  go_down                   ["j", "Down"]
  page_up                   ["PageUp"]
  page_down                 ["PageDown"]
  go_to_top                 ["g", "Home"]
  go_to_bottom              ["G", "End"]
  go_parent                 ["h", "Left", "Backspace", "u"]
  open                      ["Enter", "l", "Right"]
  rename                    ["r"]
  copy                      ["c"]
  delete                    ["d"]
  refresh                   ["Ctrl+r"]
  quit                      ["q"]

  Prompts:
    Enter confirms input, Esc cancels, y confirms a (y/N) question.

  Syntax Reference:
    Modifiers: <c-x> (Ctrl), <m-x>/<a-x> (Alt/Meta), <s-x> (Shift)
    Standard:  Ctrl+x, Alt+x, Shift+x
    Special:   "space", "Backspace", "Enter", "Esc", "Tab", "PageUp", "F5"
"##;
