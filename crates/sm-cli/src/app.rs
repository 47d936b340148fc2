//! Terminal application state: a drill session plus quit handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use sm_core::{Clock, Phase, RandomSource, SeededSource, Session, SystemClock};

/// What a key press did, for the caller's benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// The key was not bound in the current phase.
    Ignored,
    /// The input buffer changed.
    Edited,
    /// The start/reset control fired.
    Toggled(Phase),
    /// An answer was submitted.
    Submitted,
    /// The user asked to quit.
    Quit,
}

/// Main application state for the drill screen.
pub struct App<R = SeededSource, C = SystemClock> {
    /// The drill session being played.
    pub session: Session<R, C>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<R: RandomSource, C: Clock> App<R, C> {
    /// Wrap a session.
    pub fn new(session: Session<R, C>) -> Self {
        Self {
            session,
            should_quit: false,
        }
    }

    /// Route a key press to the session.
    ///
    /// Enter and Space submit while active and start a fresh session from
    /// `Waiting`. Once `Done` they do nothing, so the summary stays on screen
    /// until Esc, the start/reset control, is pressed.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::Ignored;
        }

        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return KeyAction::Quit;
        }

        let phase = self.session.phase();
        match key.code {
            KeyCode::Esc => KeyAction::Toggled(self.session.start_or_reset()),
            KeyCode::Enter | KeyCode::Char(' ') => match phase {
                Phase::Active => {
                    self.session.submit_input();
                    KeyAction::Submitted
                }
                Phase::Waiting => KeyAction::Toggled(self.session.start_or_reset()),
                Phase::CountingDown | Phase::Done => KeyAction::Ignored,
            },
            KeyCode::Backspace if phase == Phase::Active => {
                self.session.pop_input();
                KeyAction::Edited
            }
            KeyCode::Char('q') if phase != Phase::Active => {
                self.should_quit = true;
                KeyAction::Quit
            }
            KeyCode::Char(c) if phase == Phase::Active => {
                self.session.push_input(c);
                KeyAction::Edited
            }
            _ => KeyAction::Ignored,
        }
    }

    /// Apply countdown ticks that fell due.
    pub fn on_tick(&mut self) -> u32 {
        self.session.poll_ticks()
    }

    /// Label of the start/reset control.
    pub fn control_label(&self) -> &'static str {
        match self.session.phase() {
            Phase::Waiting | Phase::Done => "Start",
            Phase::CountingDown | Phase::Active => "Reset",
        }
    }
}
