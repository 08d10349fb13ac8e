use std::io::{self, IsTerminal, Write};
use std::ops::ControlFlow;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, queue};

use crate::ops::reminder::{Countdown, countdown};
use crate::util::clock::Clock;
use crate::util::ticker::Ticker;

const TICK: Duration = Duration::from_secs(1);
const KEY_POLL: Duration = Duration::from_millis(100);

/// How a watch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEnd {
    /// The due date was reached
    Due,
    /// The user pressed q, Esc or Ctrl-C
    Dismissed,
}

/// Restores cooked mode when dropped
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<RawMode> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

pub fn countdown_line(label: &str, remaining: Countdown) -> String {
    format!("{}: {}", label, remaining)
}

/// Live countdown to `due` on stdout, redrawn every second.
///
/// Keys are read only when both stdin and stdout are terminals; otherwise
/// the countdown runs until the due date.
pub fn watch<C: Clock + 'static>(
    label: &str,
    due: DateTime<Utc>,
    clock: C,
) -> io::Result<WatchEnd> {
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let mut out = io::stdout();
    run(&mut out, label, due, clock, TICK, interactive)
}

fn run<W: Write, C: Clock + 'static>(
    out: &mut W,
    label: &str,
    due: DateTime<Utc>,
    clock: C,
    interval: Duration,
    interactive: bool,
) -> io::Result<WatchEnd> {
    let first = countdown(due, clock.now());
    draw(out, label, first)?;
    if first.is_due() {
        finish(out)?;
        return Ok(WatchEnd::Due);
    }

    let (tx, rx) = mpsc::channel::<Countdown>();
    let ticker = Ticker::start(interval, move || {
        let remaining = countdown(due, clock.now());
        if tx.send(remaining).is_err() || remaining.is_due() {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    tracing::debug!(%due, interactive, "countdown started");

    let raw = if interactive {
        Some(RawMode::enable()?)
    } else {
        None
    };

    let end = loop {
        match rx.recv_timeout(KEY_POLL) {
            Ok(remaining) => {
                draw(out, label, remaining)?;
                if remaining.is_due() {
                    break WatchEnd::Due;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break WatchEnd::Due,
        }
        if interactive && dismiss_requested()? {
            break WatchEnd::Dismissed;
        }
    };

    ticker.cancel();
    drop(raw);
    finish(out)?;
    tracing::debug!(?end, "countdown stopped");
    Ok(end)
}

fn draw<W: Write>(out: &mut W, label: &str, remaining: Countdown) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(countdown_line(label, remaining))
    )?;
    out.flush()
}

fn finish<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    out.flush()
}

fn dismiss_requested() -> io::Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
