//! Input configuration options for dirnav
//!
//! This module defines the `[keys]` table of dirnav.toml: a list of key strings per action.

use serde::Deserialize;

/// Key strings for every bindable action
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Keys {
    go_up: Vec<String>,
    go_down: Vec<String>,
    page_up: Vec<String>,
    page_down: Vec<String>,
    go_to_top: Vec<String>,
    go_to_bottom: Vec<String>,
    go_parent: Vec<String>,
    open: Vec<String>,
    rename: Vec<String>,
    copy: Vec<String>,
    delete: Vec<String>,
    refresh: Vec<String>,
    quit: Vec<String>,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    go_up,
    go_down,
    page_up,
    page_down,
    go_to_top,
    go_to_bottom,
    go_parent,
    open,
    rename,
    copy,
    delete,
    refresh,
    quit,
);

impl Default for Keys {
    fn default() -> Self {
        Keys {
            go_up: vec!["k".into(), "Up".into()],
            go_down: vec!["j".into(), "Down".into()],
            page_up: vec!["PageUp".into()],
            page_down: vec!["PageDown".into()],
            go_to_top: vec!["g".into(), "Home".into()],
            go_to_bottom: vec!["G".into(), "End".into()],
            go_parent: vec![
                "h".into(),
                "Left".into(),
                "Backspace".into(),
                "u".into(),
            ],
            open: vec!["Enter".into(), "l".into(), "Right".into()],

            rename: vec!["r".into()],
            copy: vec!["c".into()],
            delete: vec!["d".into()],

            refresh: vec!["Ctrl+r".into()],
            quit: vec!["q".into()],
        }
    }
}
