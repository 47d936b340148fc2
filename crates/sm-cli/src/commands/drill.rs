//! Line-oriented drill: answers are read from standard input.
//!
//! Each whitespace-separated token on a line is one submitted answer, the
//! same as confirming with Space in the full-screen drill. A blank line
//! submits an empty answer.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tracing::{info, warn};

use sm_core::{Clock, DrillConfig, Phase, RandomSource, Session, Summary};

/// Run a drill on stdin/stdout, sleeping through the countdown.
pub fn run(config: DrillConfig, json: bool) -> Result<(), String> {
    info!(total = config.total, seed = ?config.seed, json, "starting line drill");
    let session = Session::new(config).map_err(|e| format!("failed to start session: {e}"))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    drive(session, stdin.lock(), stdout.lock(), json, std::thread::sleep)?;
    Ok(())
}

/// Play one session against `input`, writing prompts and the summary to
/// `out`. `wait` is called to sleep until each countdown tick is due.
pub fn drive<R, C, I, O, W>(
    mut session: Session<R, C>,
    mut input: I,
    mut out: O,
    json: bool,
    mut wait: W,
) -> Result<Summary, String>
where
    R: RandomSource,
    C: Clock,
    I: BufRead,
    O: Write,
    W: FnMut(Duration),
{
    let total = session.config().total;
    if !json {
        writeln!(out, "  {} Speed Math", "Starting".bold()).map_err(io_err)?;
        writeln!(
            out,
            "  {total} expressions | answer with Enter, or several at once separated by spaces\n"
        )
        .map_err(io_err)?;
    }

    session.start();

    let mut shown = None;
    while session.phase() == Phase::CountingDown {
        let remaining = session.countdown();
        if !json && shown != Some(remaining) {
            writeln!(out, "Be ready in {remaining} s").map_err(io_err)?;
            out.flush().map_err(io_err)?;
            shown = Some(remaining);
        }
        match session.until_next_tick() {
            Some(pause) => {
                wait(pause);
                session.poll_ticks();
            }
            None => {
                session.tick();
            }
        }
    }

    let mut line = String::new();
    while session.phase() == Phase::Active {
        if !json && let Some(expr) = session.current() {
            let position = total - session.remaining() + 1;
            write!(out, "[{position}/{total}] {expr} = ").map_err(io_err)?;
            out.flush().map_err(io_err)?;
        }

        line.clear();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            let answered = session.evaluations();
            warn!(answered, total, "input closed mid-session");
            session.reset();
            return Err(format!(
                "input ended after {answered} of {total} answers; session abandoned"
            ));
        }

        let answers: Vec<&str> = line.split_whitespace().collect();
        if answers.is_empty() {
            session.submit("");
            continue;
        }
        for answer in answers {
            if session.submit(answer).is_none() {
                break;
            }
        }
    }

    let summary = session
        .summary()
        .ok_or_else(|| "session ended without a summary".to_string())?;

    if json {
        let report = summary.to_json().map_err(|e| e.to_string())?;
        writeln!(out, "{report}").map_err(io_err)?;
    } else {
        print_summary(&mut out, &summary).map_err(io_err)?;
    }

    Ok(summary)
}

fn print_summary<O: Write>(out: &mut O, summary: &Summary) -> io::Result<()> {
    let headline = format!("Missed {} out of {}", summary.missed(), summary.total);
    writeln!(out)?;
    if summary.missed() == 0 {
        writeln!(out, "  {}", headline.green().bold())?;
    } else {
        writeln!(out, "  {}", headline.yellow().bold())?;
    }
    writeln!(out, "  Total time {}", summary.elapsed_secs)?;

    if summary.mistakes.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Expression", "Answer", "Correct"]);
    for attempt in &summary.mistakes {
        table.add_row(vec![
            attempt.expression.to_string(),
            attempt.answer.to_string(),
            attempt.expression.result().to_string(),
        ]);
    }
    writeln!(out, "\n{table}")
}

fn io_err(e: io::Error) -> String {
    e.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::{ManualClock, ScriptedSource};

    fn session(total: u32, countdown: u32) -> (Session<ScriptedSource, ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        let config = DrillConfig::default()
            .with_total(total)
            .with_countdown(countdown);
        // Every expression is 2 + 3.
        let session =
            Session::with_sources(config, ScriptedSource::new([0.2, 0.3, 0.0]), clock.clone())
                .unwrap();
        (session, clock)
    }

    fn play(
        total: u32,
        countdown: u32,
        input: &str,
        json: bool,
    ) -> (Result<Summary, String>, String) {
        let (session, clock) = session(total, countdown);
        let mut out = Vec::new();
        let result = drive(session, input.as_bytes(), &mut out, json, |pause| {
            clock.advance_millis(pause.as_millis() as i64);
        });
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn counts_down_then_scores() {
        let (result, out) = play(3, 3, "5\nabc\n7\n", false);
        let summary = result.unwrap();
        assert_eq!(summary.missed(), 2);
        assert!(out.contains("Be ready in 3 s"));
        assert!(out.contains("Be ready in 2 s"));
        assert!(out.contains("Be ready in 1 s"));
        assert!(out.contains("[1/3] 2 + 3 = "));
        assert!(out.contains("[3/3] 2 + 3 = "));
        assert!(out.contains("Missed 2 out of 3"));
        assert!(out.contains("abc"));
        assert!(!out.contains("\"abc\""));
    }

    #[test]
    fn several_answers_per_line() {
        let (result, out) = play(3, 0, "5 5 5 5\n", false);
        assert_eq!(result.unwrap().missed(), 0);
        assert!(out.contains("Missed 0 out of 3"));
        assert!(!out.contains("Expression"));
    }

    #[test]
    fn blank_line_is_a_mistake() {
        let (result, _) = play(2, 0, "\n5\n", false);
        let summary = result.unwrap();
        assert_eq!(summary.missed(), 1);
        assert_eq!(summary.mistakes[0].answer, sm_core::Answer::Invalid(String::new()));
        assert!(summary.to_string().contains("!= (blank)"));
    }

    #[test]
    fn eof_abandons_session() {
        let (result, _) = play(3, 0, "5\n", false);
        let err = result.unwrap_err();
        assert!(err.contains("input ended after 1 of 3"));
    }

    #[test]
    fn json_output_only() {
        let (result, out) = play(2, 2, "5\n9\n", true);
        assert!(result.is_ok());
        assert!(!out.contains("Be ready"));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["mistakes"][0]["answer"], 9);
    }
}
