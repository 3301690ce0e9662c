//! Reusable UI widgets
//!
//! Contains the building blocks shared by the main view and overlays:
//! - Popup dialogs (confirmation)
//! - Spinner and flash feedback
//! - Key hint status bar

use crate::ui::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render a centered popup dialog
pub fn render_popup(
    frame: &mut Frame,
    title: &str,
    content: Vec<Line>,
    buttons: &[(&str, char)], // (label, key)
    theme: &Theme,
    area: Rect,
) {
    // Calculate popup size
    let popup_width = 56.min(area.width.saturating_sub(4));
    let popup_height = (content.len() as u16 + 6).min(area.height.saturating_sub(2));

    let popup_area = centered_rect(popup_width, popup_height, area);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused())
        .style(theme.text());

    frame.render_widget(block, popup_area);

    // Inner area for content
    let inner = Rect {
        x: popup_area.x + 2,
        y: popup_area.y + 1,
        width: popup_area.width.saturating_sub(4),
        height: popup_area.height.saturating_sub(4),
    };

    let content_widget = Paragraph::new(content)
        .style(theme.text())
        .wrap(Wrap { trim: false });
    frame.render_widget(content_widget, inner);

    // Render buttons at bottom
    if !buttons.is_empty() {
        let button_area = Rect {
            x: popup_area.x + 2,
            y: popup_area.y + popup_area.height.saturating_sub(2),
            width: popup_area.width.saturating_sub(4),
            height: 1,
        };

        let buttons_widget = Paragraph::new(Line::from(key_spans(
            buttons.iter().map(|(label, key)| (key.to_string(), *label)),
            theme,
        )))
        .alignment(Alignment::Center);
        frame.render_widget(buttons_widget, button_area);
    }
}

/// Render a confirmation popup with Yes/No buttons
pub fn render_confirm_popup(
    frame: &mut Frame,
    title: &str,
    message: &str,
    theme: &Theme,
    area: Rect,
) {
    let content = vec![
        Line::raw(""),
        Line::raw(message.to_string()),
        Line::raw(""),
    ];

    render_popup(
        frame,
        title,
        content,
        &[("Yes", 'y'), ("Cancel", 'n')],
        theme,
        area,
    );
}

/// Current spinner glyph, advancing every 100 ms
pub fn spinner_frame() -> &'static str {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    SPINNER_FRAMES[(millis / 100) as usize % SPINNER_FRAMES.len()]
}

/// Render a flash message on the line above the status bar
pub fn render_flash_message(
    frame: &mut Frame,
    message: &str,
    is_error: bool,
    theme: &Theme,
    area: Rect,
) {
    let style = if is_error { theme.error() } else { theme.success() };
    let prefix = if is_error { "✗ " } else { "✓ " };

    let flash_area = Rect {
        x: area.x + 1,
        y: area.y + area.height.saturating_sub(2),
        width: area.width.saturating_sub(2),
        height: 1,
    };

    frame.render_widget(Clear, flash_area);
    let flash = Paragraph::new(Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(message.to_string(), style),
    ]))
    .style(theme.block_style());

    frame.render_widget(flash, flash_area);
}

/// Render key hints on the left and free text on the right of a one-line bar
pub fn render_status_bar(
    frame: &mut Frame,
    hints: &[(&str, &str)],
    right_content: &str,
    theme: &Theme,
    area: Rect,
) {
    frame.render_widget(Clear, area);

    let left_widget = Paragraph::new(Line::from(key_spans(
        hints.iter().map(|(key, label)| (key.to_string(), *label)),
        theme,
    )))
    .style(theme.text_dim());

    let right_len = right_content.chars().count() as u16;
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len + 1),
        y: area.y,
        width: (right_len + 1).min(area.width),
        height: 1,
    };
    let right_widget = Paragraph::new(right_content.to_string())
        .style(theme.text_dim());

    frame.render_widget(left_widget, area);
    frame.render_widget(right_widget, right_area);
}

/// `[key] label` spans separated by gaps
fn key_spans<'a>(
    items: impl Iterator<Item = (String, &'a str)>,
    theme: &Theme,
) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    for (i, (key, label)) in items.enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled("[", theme.text_dim()));
        spans.push(Span::styled(key, theme.key()));
        spans.push(Span::styled("] ", theme.text_dim()));
        spans.push(Span::styled(label, theme.text()));
    }
    spans
}

/// Helper: Create a centered rect of given size
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect { x, y, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(40, 20, area);

        assert_eq!(popup.x, 30);
        assert_eq!(popup.y, 15);
        assert_eq!(popup.width, 40);
        assert_eq!(popup.height, 20);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(5, 5, 20, 10);
        let popup = centered_rect(40, 20, area);

        assert_eq!(popup, Rect::new(5, 5, 20, 10));
    }

    #[test]
    fn test_key_spans_layout() {
        let theme = Theme::dark();
        let spans = key_spans(
            vec![("y".to_string(), "Yes"), ("n".to_string(), "Cancel")].into_iter(),
            &theme,
        );
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "[y] Yes  [n] Cancel");
    }

    #[test]
    fn test_spinner_frame_is_known() {
        assert!(SPINNER_FRAMES.contains(&spinner_frame()));
    }
}
