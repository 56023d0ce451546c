//! Widgets and line builders used by the renderer.

use crate::app::{AppState, PromptState};
use crate::config::Theme;
use crate::core::formatter::{DATE_WIDTH, PERM_WIDTH, SIZE_WIDTH};
use crate::core::{Entry, FormattedEntry, StyleTag, fit_to_width};

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Key help shown when there is neither a prompt nor a status message.
pub const HELP_LINE: &str =
    "q:Quit Enter/\u{2192}:Open/Run Bksp/\u{2190}/u:Up | r:Rename c:Copy d:Delete ^R:Refresh";

/// Columns taken by permissions, size and date plus their separating spaces.
pub const META_WIDTH: usize = PERM_WIDTH + SIZE_WIDTH + DATE_WIDTH + 3;

/// Narrowest name column for which the metadata columns are still shown.
const MIN_NAME_WIDTH: usize = 12;

pub fn list_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
}

/// Builds one list row exactly `width` columns wide.
///
/// The name is left aligned and truncated; permissions, size and date sit on the right when
/// there is room for them.
pub fn entry_line(entry: &Entry, width: usize, theme: &Theme, selected: bool) -> Line<'static> {
    let formatted = FormattedEntry::from_entry(entry);

    let text = if width >= META_WIDTH + MIN_NAME_WIDTH {
        let name = fit_to_width(&formatted.name, width - META_WIDTH);
        format!(
            "{name} {:<pw$} {:>sw$} {:>dw$}",
            formatted.permissions,
            formatted.size,
            formatted.date,
            pw = PERM_WIDTH,
            sw = SIZE_WIDTH,
            dw = DATE_WIDTH,
        )
    } else {
        fit_to_width(&formatted.name, width)
    };

    let style = if selected {
        entry_style(entry, formatted.style, theme).patch(theme.selection_style())
    } else {
        entry_style(entry, formatted.style, theme)
    };
    Line::from(Span::styled(text, style))
}

fn entry_style(entry: &Entry, tag: StyleTag, theme: &Theme) -> Style {
    match tag {
        StyleTag::Directory => theme.directory_style(),
        StyleTag::Script => theme.script_style(),
        StyleTag::Plain if entry.is_executable() => theme.script_style(),
        StyleTag::Plain => theme.entry_style(),
    }
}

/// Draws the last screen line: an open prompt wins over the status message, which wins over
/// the key help.
pub fn draw_bottom_line(frame: &mut Frame, app: &AppState, area: Rect) {
    let theme = app.config().theme();
    let width = area.width as usize;

    match app.prompt().state() {
        PromptState::TextInput {
            label,
            buffer,
            cursor,
            ..
        } => {
            let label = fit_to_width(label, label.width().min(width));
            let label_w = label.width();
            let visible_width = width.saturating_sub(label_w + 1);
            let (visible, cursor_offset) = input_field_view(buffer, *cursor, visible_width);

            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(label, theme.prompt_style()),
                    Span::raw(visible.to_string()),
                ])),
                area,
            );
            frame.set_cursor_position((
                area.x + (label_w + cursor_offset) as u16,
                area.y,
            ));
        }
        PromptState::Confirm { label, .. } => {
            frame.render_widget(
                Paragraph::new(Span::styled(fit_to_width(label, width), theme.prompt_style())),
                area,
            );
        }
        PromptState::None => {
            let (text, style) = match app.status() {
                Some(status) if status.is_error() => (status.text(), theme.error_style()),
                Some(status) => (status.text(), theme.info_style()),
                None => (HELP_LINE, theme.info_style()),
            };
            frame.render_widget(
                Paragraph::new(Span::styled(fit_to_width(text, width), style)),
                area,
            );
        }
    }
}

/// Window of `input_text` that fits `visible_width` columns and keeps the cursor on screen.
///
/// Returns the visible slice and the cursor's column offset inside it.
pub fn input_field_view(input_text: &str, cursor_pos: usize, visible_width: usize) -> (&str, usize) {
    let cursor_pos = cursor_pos.min(input_text.len());
    if input_text.width() <= visible_width {
        return (input_text, input_text[..cursor_pos].width());
    }

    // Walk back from the cursor until the window is full
    let mut start = cursor_pos;
    let mut used = 0;
    for (idx, ch) in input_text[..cursor_pos].char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w >= visible_width {
            break;
        }
        used += w;
        start = idx;
    }

    let mut end = start;
    let mut total = 0;
    for (idx, ch) in input_text[start..].char_indices() {
        let w = ch.width().unwrap_or(0);
        if total + w > visible_width {
            break;
        }
        total += w;
        end = start + idx + ch.len_utf8();
    }

    (&input_text[start..end], used)
}
