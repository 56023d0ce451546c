//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the terminal loop and the
//! layout helper that splits the screen into header, list and bottom line.
//!
//! This module should stay mostly "pure rendering": it reads state + config and
//! produces widgets. The only write back is [AppState::update_layout_metrics].

use crate::app::{AppState, LayoutMetrics};
use crate::ui::widgets;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

/// Smallest terminal that still shows the browser.
pub const MIN_WIDTH: u16 = 20;
pub const MIN_HEIGHT: u16 = 5;

/// Screen regions of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub list: Rect,
    pub bottom: Rect,
}

/// Renders the entire terminal UI for dirnav on each frame.
pub fn render(frame: &mut Frame, app: &mut AppState) {
    let area = frame.area();

    let Some(areas) = layout_areas(area) else {
        app.update_layout_metrics(LayoutMetrics {
            width: area.width,
            height: area.height,
            list_rows: 0,
            too_small: true,
        });
        frame.render_widget(
            Paragraph::new("Terminal too small!")
                .alignment(Alignment::Center)
                .style(app.config().theme().error_style()),
            area,
        );
        return;
    };

    let block = widgets::list_block(app.config().theme());
    let inner = block.inner(areas.list);
    app.update_layout_metrics(LayoutMetrics {
        width: area.width,
        height: area.height,
        list_rows: inner.height as usize,
        too_small: false,
    });

    render_header(frame, app, areas.header);

    frame.render_widget(block, areas.list);
    render_entries(frame, app, inner);

    widgets::draw_bottom_line(frame, app, areas.bottom);
}

/// Splits `area` into header, list and bottom line. `None` when the terminal is too small.
pub fn layout_areas(area: Rect) -> Option<Areas> {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        return None;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    Some(Areas {
        header: chunks[0],
        list: chunks[1],
        bottom: chunks[2],
    })
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let theme = app.config().theme();
    let path = crate::utils::shorten_home_path(app.nav().current_dir());
    let text = crate::core::fit_to_width(&format!("Path: {path}"), area.width as usize);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, theme.path_style()))),
        area,
    );
}

/// Draws the rows inside the scroll window.
fn render_entries(frame: &mut Frame, app: &AppState, area: Rect) {
    let theme = app.config().theme();
    let nav = app.nav();

    if nav.entries().is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("(empty)", theme.info_style())),
            area,
        );
        return;
    }

    let width = area.width as usize;
    let selected = nav.selected_idx();
    let items: Vec<ListItem> = nav
        .visible_range()
        .filter_map(|idx| {
            nav.entries()
                .get(idx)
                .map(|entry| widgets::entry_line(entry, width, theme, selected == Some(idx)))
        })
        .map(ListItem::new)
        .collect();

    frame.render_widget(List::new(items), area);
}
