//! Rendering of the drill screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use sm_core::{Phase, Snapshot};

/// Draw the whole screen for a session snapshot.
pub fn draw(frame: &mut Frame, snapshot: &Snapshot, control_label: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from("SPEED MATH").style(Style::default().bold()))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let body = Paragraph::new(body_lines(snapshot, control_label))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(body, inner);

    let status = Paragraph::new(status_hint(snapshot.phase))
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, chunks[2]);
}

/// Context-sensitive status bar text.
pub fn status_hint(phase: Phase) -> &'static str {
    match phase {
        Phase::Waiting => " Enter/Space/Esc: start | q: quit",
        Phase::Done => " Esc: start again | q: quit",
        Phase::CountingDown => " Esc: reset | Ctrl+C: quit",
        Phase::Active => " Enter/Space: confirm | Backspace: erase | Esc: reset | Ctrl+C: quit",
    }
}

/// Text lines for the content area.
pub fn body_lines(snapshot: &Snapshot, control_label: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = vec![Line::from("")];

    match snapshot.phase {
        Phase::Waiting => {
            lines.push(Line::from(Span::styled(
                "Press start to get started!",
                Style::default().italic(),
            )));
        }
        Phase::CountingDown => {
            lines.push(Line::from(format!("Be ready in {} s", snapshot.countdown)));
        }
        Phase::Active => {
            let answered = snapshot.total - snapshot.remaining;
            lines.push(Line::from(Span::styled(
                format!("Expression {} of {}", answered + 1, snapshot.total),
                Style::default().underlined(),
            )));
            if let Some(expr) = &snapshot.current {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    expr.to_string(),
                    Style::default().fg(Color::Yellow).bold(),
                )));
            }
        }
        Phase::Done => {
            let missed = snapshot.mistakes.len();
            lines.push(Line::from(format!(
                "Missed {missed} out of {}",
                snapshot.total
            )));
            lines.push(Line::from(format!(
                "Total time {}",
                snapshot.elapsed_secs.unwrap_or(0.0)
            )));
            lines.push(Line::from(""));
            for attempt in &snapshot.mistakes {
                lines.push(Line::from(Span::styled(
                    attempt.to_string(),
                    Style::default().fg(Color::Red),
                )));
            }
        }
    }

    lines.push(Line::from(""));
    let input = if snapshot.input.is_empty() {
        Span::styled("Result", Style::default().fg(Color::DarkGray).italic())
    } else {
        Span::styled(snapshot.input.clone(), Style::default().fg(Color::White).bold())
    };
    lines.push(Line::from(vec![Span::raw("[ "), input, Span::raw(" ]")]));
    lines.push(Line::from(vec![
        Span::raw("Use "),
        Span::styled("space", Style::default().bold()),
        Span::raw(" or "),
        Span::styled("enter", Style::default().bold()),
        Span::raw(" to confirm!"),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {control_label} (Esc) "),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )));

    lines
}
