//! Shared data types for quotebox
//!
//! Small types passed between the controller and the renderer.

/// Which part of the screen receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Quote,
    FilterInput,
    Favorites,
}

/// Enabled state of every interaction point, as the renderer shows them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub new_quote: bool,
    pub filter: bool,
    pub copy: bool,
    pub share: bool,
    pub save: bool,
    pub open_favorites: bool,
}

impl Controls {
    /// Key hints for the status bar, skipping disabled actions
    pub fn hints(&self) -> Vec<(&'static str, &'static str)> {
        let mut hints = Vec::new();
        if self.new_quote {
            hints.push(("Space", "New quote"));
        }
        if self.filter {
            hints.push(("/", "Author"));
        }
        if self.copy {
            hints.push(("c", "Copy"));
        }
        if self.share {
            hints.push(("w", "Share"));
        }
        if self.save {
            hints.push(("s", "Save"));
        }
        if self.open_favorites {
            hints.push(("f", "Favorites"));
        }
        hints.push(("t", "Theme"));
        hints.push(("q", "Quit"));
        hints
    }
}

// Helper functions

/// Build a share URL by percent-encoding `text` onto `template`
pub fn share_link(template: &str, text: &str) -> String {
    format!("{}{}", template, urlencoding::encode(text))
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_link_encodes_text() {
        assert_eq!(
            share_link("https://twitter.com/intent/tweet?text=", "a&b = c?"),
            "https://twitter.com/intent/tweet?text=a%26b%20%3D%20c%3F"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("–––", 3), "–––");
    }

    #[test]
    fn test_hints_skip_disabled_actions() {
        let controls = Controls {
            new_quote: false,
            filter: false,
            copy: false,
            share: false,
            save: false,
            open_favorites: false,
        };
        let keys: Vec<&str> = controls.hints().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["t", "q"]);
    }
}
