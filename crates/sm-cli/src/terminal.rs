//! Terminal setup, teardown, and main event loop.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use sm_core::{Clock, RandomSource};

use crate::app::App;

/// Longest wait for input when no countdown tick is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Launch the drill screen.
pub fn run<R: RandomSource, C: Clock>(mut app: App<R, C>) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Main event loop. Waits for input no longer than the next countdown tick.
fn run_loop<R: RandomSource, C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<R, C>,
) -> Result<(), String> {
    loop {
        let snapshot = app.session.snapshot();
        let label = app.control_label();
        terminal
            .draw(|frame| crate::ui::draw(frame, &snapshot, label))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        let timeout = app
            .session
            .until_next_tick()
            .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));
        if event::poll(timeout).map_err(|e| format!("event error: {e}"))?
            && let Event::Key(key) = event::read().map_err(|e| format!("event error: {e}"))?
        {
            app.handle_key(key);
        }
        app.on_tick();
    }
}
