//! Application state and event handling
//!
//! This is the core of quotebox, managing:
//! - The display session and its fetch/fade cycle
//! - Event handling (keyboard input)
//! - Favorites overlay, confirmation popup, and flash feedback

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::quotes::QuoteFetcher;
use crate::session::{FetchRequest, Session};
use crate::store::{Favorites, SharedStorage, ThemeManager};
use crate::types::{Controls, Focus};
use crate::ui::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long a flash message stays on screen
const FLASH_DURATION: Duration = Duration::from_secs(3);

/// Main application state
pub struct App {
    // Core state
    pub should_quit: bool,
    pub config: Config,
    pub theme: Theme,
    pub session: Session,

    // Persistence
    pub favorites: Favorites,
    pub theme_manager: ThemeManager,

    // Input state
    pub focus: Focus,
    pub filter_input: String,
    pub favorites_selected: usize,

    // Popup state
    pub popup: PopupState,

    // Flash message (temporary feedback)
    pub flash_message: Option<(String, bool, Instant)>, // (message, is_error, timestamp)

    // "Saved!" confirmation on the save control
    pub saved_until: Option<Instant>,

    fetcher: QuoteFetcher,
    fetch_tx: mpsc::UnboundedSender<String>,
    clipboard: Clipboard,
}

/// Popup overlay state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupState {
    None,
    Confirm {
        title: String,
        message: String,
        action: ConfirmAction,
    },
}

/// Action waiting for a yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearFavorites,
}

/// Application state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    FilterInput,
    Favorites,
    ConfirmAction,
}

impl App {
    /// Create a new App instance. Fetch results come back on the
    /// receiver paired with `fetch_tx`.
    pub fn new(
        config: Config,
        fetcher: QuoteFetcher,
        storage: SharedStorage,
        clipboard: Clipboard,
        fetch_tx: mpsc::UnboundedSender<String>,
        preferred_author: &str,
    ) -> Self {
        let favorites = Favorites::load(storage.clone());
        let theme_manager = ThemeManager::load(storage);
        let theme = Theme::from_mode(theme_manager.mode());
        let session = Session::new(&config.display, preferred_author);

        Self {
            should_quit: false,
            config,
            theme,
            session,

            favorites,
            theme_manager,

            focus: Focus::Quote,
            filter_input: String::new(),
            favorites_selected: 0,

            popup: PopupState::None,
            flash_message: None,
            saved_until: None,

            fetcher,
            fetch_tx,
            clipboard,
        }
    }

    /// Get current app state
    pub fn state(&self) -> AppState {
        match &self.popup {
            PopupState::Confirm { .. } => AppState::ConfirmAction,
            PopupState::None => match self.focus {
                Focus::Quote => AppState::Normal,
                Focus::FilterInput => AppState::FilterInput,
                Focus::Favorites => AppState::Favorites,
            },
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.state() {
            AppState::ConfirmAction => self.handle_confirm_key(key, now),
            AppState::FilterInput => self.handle_filter_key(key),
            AppState::Favorites => self.handle_favorites_key(key),
            AppState::Normal => self.handle_normal_key(key, now),
        }
    }

    /// Handle key in normal state
    fn handle_normal_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.request_quote(now);
            }
            KeyCode::Char('/') => self.start_filter_input(),
            KeyCode::Char('c') => self.copy_quote(now),
            KeyCode::Char('w') => self.share_quote(now),
            KeyCode::Char('s') => self.save_favorite(now),
            KeyCode::Char('f') => self.open_favorites(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Handle keys while editing the author filter
    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.filter_input.push(c),
            KeyCode::Backspace => {
                self.filter_input.pop();
            }
            KeyCode::Enter => {
                self.session.preferred_author = self.filter_input.trim().to_string();
                tracing::debug!("Author filter set to '{}'", self.session.preferred_author);
                self.focus = Focus::Quote;
            }
            KeyCode::Esc => {
                self.filter_input = self.session.preferred_author.clone();
                self.focus = Focus::Quote;
            }
            _ => {}
        }
    }

    /// Handle keys in the favorites overlay
    fn handle_favorites_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_favorites(),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.favorites_selected < self.favorites.len().saturating_sub(1) {
                    self.favorites_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.favorites_selected = self.favorites_selected.saturating_sub(1);
            }
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_favorite(),
            KeyCode::Char('C') => self.prompt_clear_favorites(),
            _ => {}
        }
    }

    /// Handle keys in confirm popup
    fn handle_confirm_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.execute_pending_action(now),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.popup = PopupState::None;
            }
            _ => {}
        }
    }

    /// Advance timers: fades, flash expiry, and the save confirmation
    pub fn tick(&mut self, now: Instant) {
        if let Some(request) = self.session.tick(now) {
            self.spawn_fetch(request);
        }

        if let Some((_, _, at)) = &self.flash_message {
            if now.duration_since(*at) >= FLASH_DURATION {
                self.flash_message = None;
            }
        }

        if matches!(self.saved_until, Some(until) if now >= until) {
            self.saved_until = None;
        }
    }

    /// A fetch task finished; show its quote
    pub fn on_quote_ready(&mut self, quote: String, now: Instant) {
        tracing::debug!("Quote ready: {}", quote);
        self.session.finish_fetch(quote, now);
    }

    /// Start a fetch/display cycle. Ignored while one is running.
    pub fn request_quote(&mut self, now: Instant) -> bool {
        if !self.session.begin(now) {
            tracing::debug!("Quote request ignored, fetch already in flight");
            return false;
        }
        true
    }

    /// Enabled state of every control
    pub fn controls(&self, now: Instant) -> Controls {
        let idle = self.session.controls_enabled();
        let actions = self.session.actions_enabled();
        Controls {
            new_quote: idle,
            filter: idle,
            copy: actions,
            share: actions,
            save: actions && !self.save_confirming(now),
            open_favorites: actions,
        }
    }

    pub fn save_label(&self, now: Instant) -> &'static str {
        if self.save_confirming(now) {
            "Saved!"
        } else {
            "Save"
        }
    }

    // === HELPER METHODS ===

    fn save_confirming(&self, now: Instant) -> bool {
        matches!(self.saved_until, Some(until) if now < until)
    }

    /// Run the fetch sequence off the input path; the result returns over the channel
    fn spawn_fetch(&self, request: FetchRequest) {
        let fetcher = self.fetcher.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let quote = fetcher
                .next_quote(&request.author_filter, &request.last_quote)
                .await;
            if tx.send(quote).is_err() {
                tracing::debug!("Fetch finished after the UI shut down");
            }
        });
    }

    fn start_filter_input(&mut self) {
        if !self.session.controls_enabled() {
            return;
        }
        self.filter_input = self.session.preferred_author.clone();
        self.focus = Focus::FilterInput;
    }

    fn copy_quote(&mut self, now: Instant) {
        if !self.session.actions_enabled() || self.session.current_quote_text.is_empty() {
            return;
        }
        let text = self.session.current_quote_text.clone();
        match self.clipboard.copy(&text) {
            Ok(()) => {
                tracing::info!("Quote copied to clipboard");
                self.show_flash("Quote copied", false, now);
            }
            Err(e) => {
                tracing::warn!("Failed to copy quote to clipboard: {}", e);
                self.show_flash("Could not copy quote", true, now);
            }
        }
    }

    fn share_quote(&mut self, now: Instant) {
        let link = match self.session.share_link() {
            Some(link) if self.session.actions_enabled() => link.to_string(),
            _ => return,
        };
        match self.clipboard.copy(&link) {
            Ok(()) => self.show_flash("Share link copied", false, now),
            Err(e) => {
                tracing::warn!("Failed to copy share link: {}", e);
                self.show_flash(&format!("Share: {}", link), false, now);
            }
        }
    }

    fn save_favorite(&mut self, now: Instant) {
        if !self.controls(now).save {
            return;
        }
        let text = self.session.current_quote_text.clone();
        if self.favorites.add(&text) {
            self.saved_until = Some(now + self.config.display.save_confirm());
        }
    }

    fn open_favorites(&mut self) {
        if !self.session.actions_enabled() {
            return;
        }
        self.favorites_selected = self
            .favorites_selected
            .min(self.favorites.len().saturating_sub(1));
        self.focus = Focus::Favorites;
    }

    fn close_favorites(&mut self) {
        self.focus = Focus::Quote;
    }

    fn remove_selected_favorite(&mut self) {
        if let Some(removed) = self.favorites.remove(self.favorites_selected) {
            tracing::debug!("Removed favorite: {}", removed);
            self.favorites_selected = self
                .favorites_selected
                .min(self.favorites.len().saturating_sub(1));
        }
    }

    /// Ask before wiping the list; nothing to ask about when it is empty
    fn prompt_clear_favorites(&mut self) {
        if self.favorites.is_empty() {
            return;
        }
        self.popup = PopupState::Confirm {
            title: "Clear Favorites".into(),
            message: format!(
                "Are you sure you want to clear all {} favorite(s)?",
                self.favorites.len()
            ),
            action: ConfirmAction::ClearFavorites,
        };
    }

    /// Execute the pending confirmed action
    fn execute_pending_action(&mut self, now: Instant) {
        let action = match &self.popup {
            PopupState::Confirm { action, .. } => *action,
            PopupState::None => return,
        };
        self.popup = PopupState::None;

        match action {
            ConfirmAction::ClearFavorites => {
                self.favorites.clear();
                self.favorites_selected = 0;
                self.show_flash("Favorites cleared", false, now);
            }
        }
    }

    fn toggle_theme(&mut self) {
        let mode = self.theme_manager.toggle();
        self.theme = Theme::from_mode(mode);
        tracing::debug!("Theme switched to {}", mode);
    }

    /// Show a flash message
    fn show_flash(&mut self, message: &str, is_error: bool, now: Instant) {
        self.flash_message = Some((message.into(), is_error, now));
    }
}
