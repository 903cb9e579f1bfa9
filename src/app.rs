use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

use crate::config::AppConfig;
use crate::display::{
    Component, OptimizedDisplay, ProblematicDisplay, UserCard, UserDisplayProps,
};
use crate::trace::TraceBuffer;
use crate::users::{self, UserId, USERS};

/// Seconds a status message stays in the header
const STATUS_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

/// Controller: owns the selection and the force counter, and redraws both
/// display components side by side.
pub struct App {
    pub popup: Popup,
    pub should_quit: bool,

    // Controller state
    pub selected_user: UserId,
    pub counter: u64,
    pub render_count: u64,

    // Children and their latest output
    problematic: ProblematicDisplay,
    optimized: OptimizedDisplay,
    pub problematic_card: UserCard,
    pub optimized_card: UserCard,

    // Console (None when tracing is disabled)
    pub trace: Option<TraceBuffer>,

    // Status message (shown in header, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(config: &AppConfig, trace: Option<TraceBuffer>) -> Self {
        let selected_user = config.initial_user;
        let props = UserDisplayProps { user_id: selected_user };

        tracing::info!(target: "rerender", "controller rendered 1 times");
        let mut problematic = ProblematicDisplay::problematic();
        let mut optimized = OptimizedDisplay::optimized();
        let problematic_card = problematic.render(&props);
        let optimized_card = optimized.render(&props);

        if users::find_user(selected_user).is_none() {
            tracing::warn!(target: "rerender", "initial user {} does not exist", selected_user);
        }

        Self {
            popup: Popup::None,
            should_quit: false,
            selected_user,
            counter: 0,
            render_count: 1,
            problematic,
            optimized,
            problematic_card,
            optimized_card,
            trace,
            status_message: None,
            status_message_time: None,
        }
    }

    /// Change the selection. Re-selecting the current user is not a state
    /// change and redraws nothing. Returns whether a redraw happened.
    pub fn select_user(&mut self, id: UserId) -> bool {
        if id == self.selected_user {
            tracing::debug!(target: "rerender", "user {} already selected, no redraw", id);
            return false;
        }

        tracing::info!(target: "rerender", "selected user {} -> {}", self.selected_user, id);
        self.selected_user = id;
        self.redraw();
        true
    }

    /// Bump the unrelated counter, redrawing children with unchanged props
    pub fn force_rerender(&mut self) {
        self.counter += 1;
        tracing::info!(target: "rerender", "force re-render (counter {})", self.counter);
        self.redraw();
    }

    fn redraw(&mut self) {
        self.render_count += 1;
        tracing::info!(target: "rerender", "controller rendered {} times", self.render_count);

        let props = UserDisplayProps { user_id: self.selected_user };
        self.problematic_card = self.problematic.render(&props);
        self.optimized_card = self.optimized.render(&props);
    }

    pub fn problematic_renders(&self) -> u64 {
        self.problematic.render_count()
    }

    pub fn optimized_renders(&self) -> u64 {
        self.optimized.render_count()
    }

    /// Render requests the optimized display answered from its gate
    pub fn optimized_skips(&self) -> u64 {
        self.optimized.skipped()
    }

    /// Linear searches the memoized lookup actually ran
    pub fn optimized_searches(&self) -> u64 {
        self.optimized.inner().lookup().searches()
    }

    /// Selector row of the current selection, if it is a known user
    pub fn selected_index(&self) -> Option<usize> {
        users::position_of(self.selected_user)
    }

    /// Set a status message (auto-clears after a few seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        // Handle popups first
        if self.popup != Popup::None {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')
            ) {
                self.popup = Popup::None;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char(c @ '1'..='5') => {
                let id = c.to_digit(10).unwrap_or_default();
                self.pick(id);
            }
            KeyCode::Char('f') | KeyCode::Char(' ') => {
                self.force_rerender();
                self.set_status(format!("Forced re-render (counter {})", self.counter));
            }
            KeyCode::Char('c') => {
                if let Some(trace) = &self.trace {
                    trace.clear();
                }
                self.set_status("Console cleared");
            }
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,
            _ => {}
        }

        Ok(())
    }

    fn move_selection(&mut self, delta: isize) {
        let last = USERS.len() - 1;
        let index = match self.selected_index() {
            Some(i) => i.saturating_add_signed(delta).min(last),
            // Unknown selection: start from the top
            None => 0,
        };
        self.pick(USERS[index].id);
    }

    fn pick(&mut self, id: UserId) {
        if self.select_user(id) {
            let name = users::find_user(id).map(|u| u.name).unwrap_or("unknown user");
            self.set_status(format!("Selected {} - {}", id, name));
        } else {
            self.set_status(format!("User {} already selected", id));
        }
    }

    pub fn tick(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::ReferenceIdentity;

    fn app_with_user(initial_user: UserId) -> App {
        let config = AppConfig {
            initial_user,
            ..AppConfig::default()
        };
        App::new(&config, None)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    #[test]
    fn test_initial_render() {
        let app = app_with_user(1);
        assert_eq!(app.problematic_renders(), 1);
        assert_eq!(app.optimized_renders(), 1);
        assert_eq!(app.render_count, 1);
        assert_eq!(app.problematic_card.summary, "User: Alice (admin) - Active");
        assert_eq!(app.optimized_card.summary, "User: Alice (admin) - Active");
    }

    #[test]
    fn test_force_rerender_three_times() {
        let mut app = app_with_user(1);
        for _ in 0..3 {
            app.force_rerender();
        }

        assert_eq!(app.counter, 3);
        assert_eq!(app.problematic_renders(), 4);
        assert_eq!(app.optimized_renders(), 1);
        assert_eq!(app.optimized_skips(), 3);
        assert_eq!(app.optimized_searches(), 1);
        assert_eq!(app.problematic_card.title, "Problematic Component (Render count: 4)");
        assert_eq!(app.optimized_card.title, "Optimized Component (Render count: 1)");
    }

    #[test]
    fn test_forced_redraw_shows_reference_identity() {
        let mut app = app_with_user(1);
        assert_eq!(app.optimized_card.reference, ReferenceIdentity::New);

        app.force_rerender();
        assert_eq!(app.problematic_card.reference, ReferenceIdentity::New);
        assert_eq!(app.optimized_card.reference, ReferenceIdentity::Stable);

        app.select_user(2);
        assert_eq!(app.optimized_card.reference, ReferenceIdentity::New);
        app.force_rerender();
        app.force_rerender();
        assert_eq!(app.optimized_card.reference, ReferenceIdentity::Stable);
        assert_eq!(app.problematic_card.reference, ReferenceIdentity::New);
    }

    #[test]
    fn test_select_user_then_reselect() {
        let mut app = app_with_user(1);

        assert!(app.select_user(2));
        assert_eq!(app.optimized_renders(), 2);
        assert_eq!(app.problematic_renders(), 2);

        // Same value again: no state change, nothing redraws
        assert!(!app.select_user(2));
        assert_eq!(app.optimized_renders(), 2);
        assert_eq!(app.problematic_renders(), 2);
        assert_eq!(app.render_count, 2);

        assert_eq!(app.optimized_card.summary, "User: Bob (user) - Inactive");
        assert_eq!(app.problematic_card.summary, "User: Bob (user) - Inactive");
    }

    #[test]
    fn test_invalid_user_renders_not_found() {
        let mut app = app_with_user(1);
        assert!(app.select_user(99));
        assert_eq!(app.problematic_card.summary, "User not found");
        assert_eq!(app.optimized_card.summary, "User not found");
        assert_eq!(app.selected_index(), None);

        let app = app_with_user(42);
        assert_eq!(app.optimized_card.summary, "User not found");
    }

    #[test]
    fn test_keys_drive_controller() {
        let mut app = app_with_user(1);

        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.counter, 2);
        assert_eq!(app.optimized_renders(), 1);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_user, 2);
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.selected_user, 5);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_user, 5, "selection stops at the last user");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_user, 4);
        assert_eq!(app.optimized_renders(), 4);
        assert!(app.status_message.is_some());

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.popup, Popup::Help);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.counter, 2, "keys are swallowed while help is open");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.popup, Popup::None);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_moving_from_unknown_selection_starts_at_top() {
        let mut app = app_with_user(99);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_user, 1);
    }

    #[test]
    fn test_clear_console() {
        let trace = TraceBuffer::new(10);
        trace.push("something happened");
        let mut app = App::new(&AppConfig::default(), Some(trace.clone()));
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(trace.len(), 0);
    }
}
