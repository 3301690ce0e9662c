//! Display session state
//!
//! Owns the quote currently on screen and the fade cycle around each fetch:
//!
//! ```text
//! Idle -> FadingOut -> Fetching -> FadingIn -> Idle
//! ```
//!
//! `loading` is the only gate: a trigger while it is set is dropped, not
//! queued. The session never performs I/O itself; `tick` hands back a
//! `FetchRequest` when the fade-out finishes and the controller runs it.

use crate::config::DisplayConfig;
use crate::types::share_link;
use std::time::{Duration, Instant};

/// Transient text shown while a fetch is in flight
pub const LOADING_MESSAGE: &str = "Fetching quote...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    Idle,
    FadingOut { since: Instant },
    Fetching,
    FadingIn { since: Instant },
}

/// Work the controller must start once the quote is hidden
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub author_filter: String,
    pub last_quote: String,
}

#[derive(Debug)]
pub struct Session {
    pub loading: bool,
    pub last_quote: String,
    pub current_quote_text: String,
    pub preferred_author: String,

    displayed: String,
    phase: DisplayPhase,
    actions_enabled: bool,
    share_link: Option<String>,
    fade: Duration,
    share_url: String,
}

impl Session {
    pub fn new(display: &DisplayConfig, preferred_author: &str) -> Self {
        Self {
            loading: false,
            last_quote: String::new(),
            current_quote_text: String::new(),
            preferred_author: preferred_author.trim().to_string(),
            displayed: String::new(),
            phase: DisplayPhase::Idle,
            actions_enabled: false,
            share_link: None,
            fade: display.fade(),
            share_url: display.share_url.clone(),
        }
    }

    /// Start a new cycle. Returns false when one is already running.
    pub fn begin(&mut self, now: Instant) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.phase = DisplayPhase::FadingOut { since: now };
        true
    }

    /// Advance timed transitions. Returns a fetch request when the
    /// fade-out has just completed.
    pub fn tick(&mut self, now: Instant) -> Option<FetchRequest> {
        match self.phase {
            DisplayPhase::FadingOut { since } if now.duration_since(since) >= self.fade => {
                Some(self.on_fade_out_complete())
            }
            DisplayPhase::FadingIn { since } if now.duration_since(since) >= self.fade => {
                self.on_fade_in_complete();
                None
            }
            _ => None,
        }
    }

    fn on_fade_out_complete(&mut self) -> FetchRequest {
        self.displayed = LOADING_MESSAGE.to_string();
        self.phase = DisplayPhase::Fetching;
        FetchRequest {
            author_filter: self.preferred_author.clone(),
            last_quote: self.last_quote.clone(),
        }
    }

    /// Show the fetched quote and start fading it in.
    /// Ignored unless a fetch is outstanding.
    pub fn finish_fetch(&mut self, quote: String, now: Instant) -> bool {
        if self.phase != DisplayPhase::Fetching {
            tracing::warn!("Dropping quote that arrived outside a fetch");
            return false;
        }

        self.current_quote_text = quote.trim().to_string();
        self.share_link = Some(share_link(&self.share_url, &self.current_quote_text));
        self.last_quote = quote.clone();
        self.displayed = quote;
        self.actions_enabled = true;
        self.phase = DisplayPhase::FadingIn { since: now };
        true
    }

    fn on_fade_in_complete(&mut self) {
        self.phase = DisplayPhase::Idle;
        self.loading = false;
    }

    /// Visibility of the quote text in [0, 1]
    pub fn opacity(&self, now: Instant) -> f32 {
        let progress = |since: Instant| {
            if self.fade.is_zero() {
                1.0
            } else {
                (now.duration_since(since).as_secs_f32() / self.fade.as_secs_f32()).min(1.0)
            }
        };

        match self.phase {
            DisplayPhase::Idle | DisplayPhase::Fetching => 1.0,
            DisplayPhase::FadingOut { since } => 1.0 - progress(since),
            DisplayPhase::FadingIn { since } => progress(since),
        }
    }

    pub fn phase(&self) -> DisplayPhase {
        self.phase
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Copy, share, save and open-favorites unlock after the first quote lands
    pub fn actions_enabled(&self) -> bool {
        self.actions_enabled
    }

    pub fn share_link(&self) -> Option<&str> {
        self.share_link.as_deref()
    }

    /// The new-quote control and filter input are usable only between cycles
    pub fn controls_enabled(&self) -> bool {
        !self.loading
    }

    pub fn fetch_label(&self) -> &'static str {
        if self.loading {
            "Loading…"
        } else {
            "New quote"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (Session, Instant) {
        (Session::new(&DisplayConfig::default(), ""), Instant::now())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_full_cycle() {
        let (mut s, t0) = session();
        assert!(s.controls_enabled());
        assert!(!s.actions_enabled());

        assert!(s.begin(t0));
        assert!(!s.controls_enabled());
        assert_eq!(s.fetch_label(), "Loading…");
        assert!(matches!(s.phase(), DisplayPhase::FadingOut { .. }));

        // Fade not finished yet
        assert_eq!(s.tick(t0 + ms(100)), None);

        let request = s.tick(t0 + ms(250)).unwrap();
        assert_eq!(request, FetchRequest { author_filter: String::new(), last_quote: String::new() });
        assert_eq!(s.phase(), DisplayPhase::Fetching);
        assert_eq!(s.displayed(), LOADING_MESSAGE);
        assert!(!s.actions_enabled());

        assert!(s.finish_fetch("Life is short – Anon".into(), t0 + ms(400)));
        assert_eq!(s.displayed(), "Life is short – Anon");
        assert_eq!(s.last_quote, "Life is short – Anon");
        assert!(s.actions_enabled());
        assert!(!s.controls_enabled());

        s.tick(t0 + ms(650));
        assert_eq!(s.phase(), DisplayPhase::Idle);
        assert!(s.controls_enabled());
        assert_eq!(s.fetch_label(), "New quote");
    }

    #[test]
    fn test_reentrant_trigger_is_ignored() {
        let (mut s, t0) = session();
        assert!(s.begin(t0));
        assert!(!s.begin(t0 + ms(10)));

        s.tick(t0 + ms(250));
        assert!(!s.begin(t0 + ms(300)));
        assert_eq!(s.phase(), DisplayPhase::Fetching);
    }

    #[test]
    fn test_request_carries_filter_and_last_quote() {
        let (mut s, t0) = session();
        s.preferred_author = "twain".into();
        s.last_quote = "Old – Someone".into();

        s.begin(t0);
        let request = s.tick(t0 + ms(250)).unwrap();
        assert_eq!(request.author_filter, "twain");
        assert_eq!(request.last_quote, "Old – Someone");
    }

    #[test]
    fn test_stray_result_is_dropped() {
        let (mut s, t0) = session();
        assert!(!s.finish_fetch("late".into(), t0));
        assert_eq!(s.displayed(), "");
        assert!(!s.actions_enabled());
    }

    #[test]
    fn test_share_link_and_trimmed_text() {
        let (mut s, t0) = session();
        s.begin(t0);
        s.tick(t0 + ms(250));
        s.finish_fetch(" Be kind – Anon ".into(), t0 + ms(300));

        assert_eq!(s.current_quote_text, "Be kind – Anon");
        assert_eq!(s.last_quote, " Be kind – Anon ");
        assert_eq!(
            s.share_link(),
            Some("https://twitter.com/intent/tweet?text=Be%20kind%20%E2%80%93%20Anon")
        );
    }

    #[test]
    fn test_opacity_follows_fades() {
        let (mut s, t0) = session();
        assert_eq!(s.opacity(t0), 1.0);

        s.begin(t0);
        assert!((s.opacity(t0 + ms(125)) - 0.5).abs() < 0.01);

        s.tick(t0 + ms(250));
        s.finish_fetch("q".into(), t0 + ms(250));
        assert_eq!(s.opacity(t0 + ms(250)), 0.0);
        assert_eq!(s.opacity(t0 + ms(600)), 1.0);
    }

    #[test]
    fn test_zero_fade_completes_on_next_tick() {
        let display = DisplayConfig { fade_ms: 0, ..DisplayConfig::default() };
        let mut s = Session::new(&display, "");
        let t0 = Instant::now();

        s.begin(t0);
        assert!(s.tick(t0).is_some());
        s.finish_fetch("q".into(), t0);
        s.tick(t0);
        assert_eq!(s.phase(), DisplayPhase::Idle);
    }
}
