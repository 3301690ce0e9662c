//! Main rendering module
//!
//! Handles rendering the complete UI including:
//! - Header with the theme toggle
//! - Quote panel with fade and share link
//! - Author filter input
//! - Favorites overlay, popups, and status bar

use crate::app::{App, PopupState};
use crate::session::DisplayPhase;
use crate::store::favorites::FavoriteRow;
use crate::types::{truncate, Focus};
use crate::ui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

/// Main render function - entry point for all UI rendering
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let now = Instant::now();

    frame.render_widget(Block::default().style(app.theme.block_style()), area);

    // Main layout: header, quote, filter, status bar
    let layout = Layout::vertical([
        Constraint::Length(3),  // Header
        Constraint::Min(6),     // Quote
        Constraint::Length(3),  // Author filter
        Constraint::Length(1),  // Status bar
    ])
    .split(area);

    render_header(frame, app, now, layout[0]);
    render_quote(frame, app, now, layout[1]);
    render_filter(frame, app, now, layout[2]);
    render_status_bar(frame, app, now, layout[3]);

    if app.focus == Focus::Favorites {
        render_favorites(frame, app, area);
    }

    render_popups(frame, app, area);
}

/// Render header with the fetch control state and theme toggle
fn render_header(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let theme = &app.theme;

    let header_block = Block::default()
        .style(theme.block_style())
        .title(" quotebox ")
        .title_style(theme.title())
        .borders(Borders::BOTTOM)
        .border_style(theme.border());
    let inner = header_block.inner(area);
    frame.render_widget(header_block, area);

    let controls = app.controls(now);
    let fetch_style = if controls.new_quote { theme.text() } else { theme.text_dim() };
    let save_style = if controls.save {
        theme.text()
    } else if app.save_label(now) == "Saved!" {
        theme.success()
    } else {
        theme.disabled()
    };

    let left = Line::from(vec![
        Span::styled(format!(" {} ", app.session.fetch_label()), fetch_style),
        Span::styled("│ ", theme.border()),
        Span::styled(app.save_label(now), save_style),
        Span::styled(format!("  ★ {}", app.favorites.len()), theme.text_dim()),
    ]);
    frame.render_widget(Paragraph::new(left), inner);

    let toggle = app.theme_manager.toggle_state();
    let marker = if toggle.pressed { "◉" } else { "○" };
    let right = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", marker), theme.key()),
        Span::styled(toggle.label, theme.text_dim()),
        Span::raw(" "),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(right, inner);
}

/// Render the quote panel
fn render_quote(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .style(theme.block_style())
        .borders(Borders::ALL)
        .border_style(if app.session.loading { theme.border() } else { theme.border_focused() });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    let text_height = inner.height.saturating_sub(2);
    let body = match app.session.phase() {
        DisplayPhase::Fetching => vec![Line::from(vec![
            Span::styled(widgets::spinner_frame(), theme.key()),
            Span::raw(" "),
            Span::styled(app.session.displayed().to_string(), theme.text_dim()),
        ])],
        _ => vec![Line::styled(
            app.session.displayed().to_string(),
            theme.quote(app.session.opacity(now)),
        )],
    };

    // Vertically center a short quote
    let pad = text_height.saturating_sub(estimate_height(app.session.displayed(), inner.width)) / 2;
    lines.extend(std::iter::repeat(Line::raw("")).take(pad as usize));
    lines.extend(body);

    let quote = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(quote, Rect { height: text_height, ..inner });

    if let Some(link) = app.session.share_link() {
        let link_area = Rect {
            x: inner.x,
            y: inner.y + inner.height.saturating_sub(1),
            width: inner.width,
            height: 1,
        };
        let link_widget = Paragraph::new(truncate(link, inner.width as usize))
            .style(theme.text_dim())
            .alignment(Alignment::Center);
        frame.render_widget(link_widget, link_area);
    }
}

/// Rows a wrapped line of `text` needs at `width`
fn estimate_height(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    let chars = text.chars().count() as u16;
    chars.div_ceil(width).max(1)
}

/// Render the author filter input
fn render_filter(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let theme = &app.theme;
    let editing = app.focus == Focus::FilterInput;
    let enabled = app.controls(now).filter;

    let block = Block::default()
        .style(theme.block_style())
        .title(" Author ")
        .title_style(if editing { theme.title() } else { theme.text_dim() })
        .borders(Borders::ALL)
        .border_style(if editing { theme.border_focused() } else { theme.border() });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = if editing {
        Line::from(vec![
            Span::styled(app.filter_input.clone(), theme.text()),
            Span::styled("_", theme.key()),
        ])
    } else if app.session.preferred_author.is_empty() {
        Line::styled("any author  (press / to filter)", theme.text_dim())
    } else {
        let style = if enabled { theme.text() } else { theme.disabled() };
        Line::styled(app.session.preferred_author.clone(), style)
    };
    frame.render_widget(Paragraph::new(content), inner);
}

/// Render status bar with keybindings
fn render_status_bar(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let theme = &app.theme;

    let hints = match app.focus {
        Focus::Quote => app.controls(now).hints(),
        Focus::FilterInput => vec![("Enter", "Apply"), ("Esc", "Cancel")],
        Focus::Favorites => vec![
            ("j/k", "Navigate"),
            ("d", "Remove"),
            ("C", "Clear"),
            ("Esc", "Close"),
        ],
    };

    let right = if app.session.preferred_author.is_empty() {
        String::new()
    } else {
        format!("author ~ {}", app.session.preferred_author)
    };

    widgets::render_status_bar(frame, &hints, &right, theme, area);
}

/// Render the favorites overlay
fn render_favorites(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let width = (area.width / 5 * 4).max(20);
    let height = (area.height / 4 * 3).max(6);
    let popup_area = widgets::centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .style(theme.block_style())
        .title(format!(" Favorites ({}) ", app.favorites.len()))
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let max_len = inner.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .favorites
        .render()
        .into_iter()
        .map(|row| match row {
            FavoriteRow::Placeholder(text) => ListItem::new(Line::styled(text, theme.text_dim())),
            FavoriteRow::Entry { index, text } => {
                let style = if index == app.favorites_selected {
                    theme.selected()
                } else {
                    theme.text()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>2}. ", index + 1), theme.text_dim()),
                    Span::styled(truncate(text, max_len), style),
                ]))
            }
        })
        .collect();

    let mut state = ListState::default();
    if !app.favorites.is_empty() {
        state.select(Some(app.favorites_selected));
    }
    frame.render_stateful_widget(List::new(items), inner, &mut state);
}

/// Render popups if active
fn render_popups(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    match &app.popup {
        PopupState::None => {}

        PopupState::Confirm { title, message, .. } => {
            widgets::render_confirm_popup(frame, title, message, theme, area);
        }
    }

    // Flash message (success/error feedback)
    if let Some((msg, is_error, _)) = &app.flash_message {
        widgets::render_flash_message(frame, msg, *is_error, theme, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_height() {
        assert_eq!(estimate_height("", 10), 1);
        assert_eq!(estimate_height("abcdefghij", 10), 1);
        assert_eq!(estimate_height("abcdefghijk", 10), 2);
        assert_eq!(estimate_height("abc", 0), 1);
    }
}
