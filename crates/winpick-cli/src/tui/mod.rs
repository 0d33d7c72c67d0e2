//! Terminal frontend for [`SelectorSession`].

mod keys;
mod view;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, warn};
use winpick_core::{SelectorSession, SessionError, SessionState};

use crate::log_writer;
use keys::Control;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// Owns the terminal while the picker is drawn. Log output is held back
/// until the terminal is restored.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn init() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(error) = stdout.execute(EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(error);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        log_writer::global().hold();
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(error) = disable_raw_mode() {
            warn!(%error, "failed to leave raw mode");
        }
        if let Err(error) = self.terminal.backend_mut().execute(LeaveAlternateScreen) {
            warn!(%error, "failed to leave alternate screen");
        }
        if let Err(error) = self.terminal.show_cursor() {
            debug!(%error, "failed to restore cursor");
        }
        log_writer::global().resume();
    }
}

/// Draws the session and feeds it key presses until it completes or the
/// user cancels.
pub fn run(session: &mut SelectorSession) -> Result<Outcome> {
    let mut guard = TerminalGuard::init()?;

    loop {
        guard.terminal.draw(|frame| view::render(frame, session))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(outcome) = handle_key(session, key)? {
                return Ok(outcome);
            }
        }
    }
}

/// Applies one key press. Cancel keys win, then keymap bindings, then the
/// built-in controls.
pub fn handle_key(
    session: &mut SelectorSession,
    key: KeyEvent,
) -> Result<Option<Outcome>, SessionError> {
    if keys::is_cancel(&key) {
        session.cancel();
        return Ok(Some(Outcome::Cancelled));
    }

    if let Some(name) = keys::key_name(&key) {
        if session.dispatch_key(&name)? {
            debug!(key = %name, state = ?session.state(), "key dispatched");
            return Ok(match session.state() {
                SessionState::Completed => Some(Outcome::Completed),
                SessionState::Cancelled => Some(Outcome::Cancelled),
                _ => None,
            });
        }
    }

    match keys::control_for(&key) {
        Some(Control::Next) => session.select_next(),
        Some(Control::Previous) => session.select_previous(),
        Some(Control::First) => session.select_first(),
        Some(Control::Last) => session.select_last(),
        Some(Control::ToggleMark) => session.toggle_mark(),
        Some(Control::MarkAll) => session.mark_all(),
        Some(Control::DeleteChar) => session.pop_query_char(),
        Some(Control::ClearQuery) => session.set_query(""),
        Some(Control::ToggleFuzzy) => session.toggle_fuzzy(),
        Some(Control::Insert(character)) => session.push_query_char(character),
        Some(Control::Cancel) | None => {}
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::Arc;
    use winpick_core::testing::StubWindowManager;
    use winpick_core::{
        CandidateSource, LocalSessionGuard, Placement, SessionGuard, SkimCandidateMatcher,
        WindowEntry, WindowId, WindowSource,
    };

    fn open_session(windows: Arc<StubWindowManager>, guard: &LocalSessionGuard) -> SelectorSession {
        let source = CandidateSource::builder(WindowSource::new(windows))
            .build()
            .unwrap();
        let mut session = SelectorSession::new(
            source,
            Box::new(SkimCandidateMatcher::new()),
            Arc::new(guard.clone()),
        );
        session.open().unwrap();
        session
    }

    fn windows() -> Arc<StubWindowManager> {
        Arc::new(StubWindowManager::with_windows(vec![
            WindowEntry::new(1, "Inbox", "Thunderbird"),
            WindowEntry::new(2, "~/src/winpick", "Alacritty").current(),
            WindowEntry::new(3, "Rust docs", "Firefox"),
        ]))
    }

    fn press(session: &mut SelectorSession, code: KeyCode, modifiers: KeyModifiers) -> Option<Outcome> {
        handle_key(session, KeyEvent::new(code, modifiers)).unwrap()
    }

    fn type_text(session: &mut SelectorSession, text: &str) {
        for character in text.chars() {
            press(session, KeyCode::Char(character), KeyModifiers::NONE);
        }
    }

    #[test]
    fn typing_filters_and_enter_switches() {
        let windows = windows();
        let guard = LocalSessionGuard::new();
        let mut session = open_session(windows.clone(), &guard);

        type_text(&mut session, "rust");
        let outcome = press(&mut session, KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(outcome, Some(Outcome::Completed));
        assert_eq!(windows.focused(), vec![(WindowId(3), Placement::Current)]);
        assert!(!guard.is_active());
    }

    #[test]
    fn control_o_switches_in_other_window() {
        let windows = windows();
        let guard = LocalSessionGuard::new();
        let mut session = open_session(windows.clone(), &guard);

        press(&mut session, KeyCode::Down, KeyModifiers::NONE);
        let outcome = press(&mut session, KeyCode::Char('o'), KeyModifiers::CONTROL);

        assert_eq!(outcome, Some(Outcome::Completed));
        assert_eq!(windows.focused(), vec![(WindowId(3), Placement::OtherWindow)]);
    }

    #[test]
    fn escape_cancels_and_releases_guard() {
        let guard = LocalSessionGuard::new();
        let mut session = open_session(windows(), &guard);

        let outcome = press(&mut session, KeyCode::Esc, KeyModifiers::NONE);

        assert_eq!(outcome, Some(Outcome::Cancelled));
        assert_eq!(session.state(), SessionState::Cancelled);
        assert!(!guard.is_active());
    }

    #[test]
    fn marked_windows_are_killed_and_session_stays_open() {
        let windows = windows();
        let guard = LocalSessionGuard::new();
        let mut session = open_session(windows.clone(), &guard);

        press(&mut session, KeyCode::Tab, KeyModifiers::NONE);
        press(&mut session, KeyCode::Tab, KeyModifiers::NONE);
        let outcome = press(
            &mut session,
            KeyCode::Char('D'),
            KeyModifiers::ALT | KeyModifiers::SHIFT,
        );

        assert_eq!(outcome, None);
        assert!(session.is_open());
        assert_eq!(windows.closed(), vec![WindowId(1), WindowId(3)]);
        assert_eq!(session.snapshot().len(), 1);
        assert_eq!(session.status().map(|status| status.text.as_str()), Some("Killed 2 windows"));

        press(&mut session, KeyCode::Char('x'), KeyModifiers::NONE);

        assert!(session.status().is_none());
    }

    #[test]
    fn backspace_and_clear_edit_the_query() {
        let guard = LocalSessionGuard::new();
        let mut session = open_session(windows(), &guard);

        type_text(&mut session, "inbx");
        press(&mut session, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(session.query().text, "inb");

        press(&mut session, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(session.query().text, "");
        assert_eq!(session.match_count(), 3);
    }

    #[test]
    fn control_s_toggles_substring_matching() {
        let guard = LocalSessionGuard::new();
        let mut session = open_session(windows(), &guard);

        press(&mut session, KeyCode::Char('s'), KeyModifiers::CONTROL);
        type_text(&mut session, "rdc");

        assert!(!session.query().fuzzy);
        assert_eq!(session.match_count(), 0);
    }
}
