//! Theme configuration options for dirnav
//!
//! This module defines the `[theme]` table of dirnav.toml. Every color is a [ColorPair];
//! anything left at "default" falls back to the internal theme.

use crate::utils::parse_color;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use std::sync::LazyLock;

/// Theme configuration options
/// # Examples
/// ```toml
/// [theme.directory]
/// fg = "cyan"
/// [theme.selection]
/// bg = "#303030"
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Theme {
    path: ColorPair,
    border: ColorPair,
    entry: ColorPair,
    directory: ColorPair,
    script: ColorPair,
    selection: ColorPair,
    info: ColorPair,
    error: ColorPair,
    prompt: ColorPair,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            path: ColorPair::default(),
            border: ColorPair {
                fg: Color::Indexed(238),
                ..ColorPair::default()
            },
            entry: ColorPair::default(),
            directory: ColorPair {
                fg: Color::Blue,
                ..ColorPair::default()
            },
            script: ColorPair {
                fg: Color::Green,
                ..ColorPair::default()
            },
            selection: ColorPair {
                fg: Color::Black,
                bg: Color::Cyan,
            },
            info: ColorPair::default(),
            error: ColorPair {
                fg: Color::Red,
                ..ColorPair::default()
            },
            prompt: ColorPair {
                fg: Color::Yellow,
                ..ColorPair::default()
            },
        }
    }
}

impl Theme {
    /// Internal default theme, used as the fallback for Reset colors.
    pub fn internal_defaults() -> &'static Self {
        static DEFAULT: LazyLock<Theme> = LazyLock::new(Theme::default);
        &DEFAULT
    }

    pub fn path_style(&self) -> Style {
        self.path
            .style_or(&Theme::internal_defaults().path)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        self.border.style_or(&Theme::internal_defaults().border)
    }

    pub fn entry_style(&self) -> Style {
        self.entry.style_or(&Theme::internal_defaults().entry)
    }

    pub fn directory_style(&self) -> Style {
        self.directory
            .style_or(&Theme::internal_defaults().directory)
            .add_modifier(Modifier::BOLD)
    }

    pub fn script_style(&self) -> Style {
        self.script.style_or(&Theme::internal_defaults().script)
    }

    pub fn selection_style(&self) -> Style {
        self.selection
            .style_or(&Theme::internal_defaults().selection)
    }

    pub fn info_style(&self) -> Style {
        self.info.style_or(&Theme::internal_defaults().info)
    }

    pub fn error_style(&self) -> Style {
        self.error
            .style_or(&Theme::internal_defaults().error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn prompt_style(&self) -> Style {
        self.prompt.style_or(&Theme::internal_defaults().prompt)
    }
}

/// Foreground and background color of one themed element.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ColorPair {
    #[serde(default, deserialize_with = "deserialize_color_field")]
    fg: Color,
    #[serde(default, deserialize_with = "deserialize_color_field")]
    bg: Color,
}

impl Default for ColorPair {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

impl ColorPair {
    /// Replaces Reset colors with those from `other`.
    pub fn resolve(&self, other: &ColorPair) -> Self {
        Self {
            fg: if self.fg == Color::Reset {
                other.fg
            } else {
                self.fg
            },
            bg: if self.bg == Color::Reset {
                other.bg
            } else {
                self.bg
            },
        }
    }

    pub fn style_or(&self, fallback: &ColorPair) -> Style {
        let resolved = self.resolve(fallback);
        Style::default().fg(resolved.fg).bg(resolved.bg)
    }
}

fn deserialize_color_field<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(parse_color(&s))
}
