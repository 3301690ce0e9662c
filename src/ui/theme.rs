//! Theme definitions for quotebox
//!
//! Provides the two palettes behind the light/dark toggle, both Gruvbox.
//! Each theme defines colors for all UI elements.

use crate::store::ThemeMode;
use ratatui::style::{Color, Modifier, Style};

/// Complete theme with all required colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,

    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,

    // Accent colors
    pub accent: Color,

    // Status colors
    pub success: Color,
    pub error: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub disabled: Color,
}

impl Theme {
    /// Create a theme from a display mode
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Gruvbox dark
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,

            // Base
            bg: Color::Rgb(40, 40, 40),           // #282828
            fg: Color::Rgb(235, 219, 178),        // #ebdbb2
            fg_dim: Color::Rgb(146, 131, 116),    // #928374

            // Accent (orange)
            accent: Color::Rgb(254, 128, 25),     // #fe8019

            // Status
            success: Color::Rgb(184, 187, 38),    // #b8bb26
            error: Color::Rgb(251, 73, 52),       // #fb4934

            // UI elements
            border: Color::Rgb(80, 73, 69),       // #504945
            border_focused: Color::Rgb(168, 153, 132), // #a89984
            selection_bg: Color::Rgb(80, 73, 69), // #504945
            selection_fg: Color::Rgb(235, 219, 178), // #ebdbb2
            disabled: Color::Rgb(102, 92, 84),    // #665c54
        }
    }

    /// Gruvbox light
    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,

            // Base
            bg: Color::Rgb(251, 241, 199),        // #fbf1c7
            fg: Color::Rgb(60, 56, 54),           // #3c3836
            fg_dim: Color::Rgb(124, 111, 100),    // #7c6f64

            // Accent (orange)
            accent: Color::Rgb(175, 58, 3),       // #af3a03

            // Status
            success: Color::Rgb(121, 116, 14),    // #79740e
            error: Color::Rgb(157, 0, 6),         // #9d0006

            // UI elements
            border: Color::Rgb(213, 196, 161),    // #d5c4a1
            border_focused: Color::Rgb(102, 92, 84), // #665c54
            selection_bg: Color::Rgb(213, 196, 161), // #d5c4a1
            selection_fg: Color::Rgb(40, 40, 40), // #282828
            disabled: Color::Rgb(189, 174, 147),  // #bdae93
        }
    }

    // Style helpers for common UI patterns

    /// Background for blocks and panels
    pub fn block_style(&self) -> Style {
        Style::default().bg(self.bg)
    }

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Dimmed text style
    pub fn text_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Text for a control that cannot be used right now
    pub fn disabled(&self) -> Style {
        Style::default()
            .fg(self.disabled)
            .bg(self.bg)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    /// Title/header style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Key label in hints and buttons
    pub fn key(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected item style
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style (unfocused)
    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    /// Border style (focused)
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused).bg(self.bg)
    }

    /// Success message style
    pub fn success(&self) -> Style {
        Style::default().fg(self.success).bg(self.bg)
    }

    /// Error message style
    pub fn error(&self) -> Style {
        Style::default().fg(self.error).bg(self.bg)
    }

    /// Quote text at the given opacity, blending the foreground into the background
    pub fn quote(&self, opacity: f32) -> Style {
        Style::default()
            .fg(blend(self.bg, self.fg, opacity))
            .bg(self.bg)
            .add_modifier(Modifier::ITALIC)
    }
}

/// Linear blend from `from` (t = 0) to `to` (t = 1). Non-RGB colors snap.
fn blend(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_mode() {
        let dark = Theme::from_mode(ThemeMode::Dark);
        assert_eq!(dark.bg, Color::Rgb(40, 40, 40));
        assert_eq!(dark.mode, ThemeMode::Dark);

        let light = Theme::from_mode(ThemeMode::Light);
        assert_eq!(light.bg, Color::Rgb(251, 241, 199));
        assert_eq!(light.mode, ThemeMode::Light);
    }

    #[test]
    fn test_quote_fade_endpoints() {
        let theme = Theme::dark();
        assert_eq!(theme.quote(1.0).fg, Some(theme.fg));
        assert_eq!(theme.quote(0.0).fg, Some(theme.bg));
    }

    #[test]
    fn test_blend_midpoint_and_snap() {
        assert_eq!(
            blend(Color::Rgb(0, 0, 0), Color::Rgb(200, 100, 50), 0.5),
            Color::Rgb(100, 50, 25)
        );
        assert_eq!(blend(Color::Reset, Color::White, 0.2), Color::Reset);
        assert_eq!(blend(Color::Reset, Color::White, 0.8), Color::White);
    }
}
