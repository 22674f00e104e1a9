//! Arrow-key interactive selection
//!
//! Renders a small in-place panel on stderr and lets the user pick an
//! option with the arrow keys. Callers must only invoke this when stdin
//! is a terminal; non-interactive runs take defaults instead.

use std::io::{stderr, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, terminal, QueueableCommand};

use crate::errors::{AppError, Result};

/// Restores cooked mode even on early return
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()
            .map_err(|e| AppError::generic(format!("failed to enter raw mode: {}", e)))?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Let the user pick one of `options` (key, description) pairs.
///
/// Starts on `default_key` when present. Enter confirms; Esc or Ctrl-C
/// cancels.
///
/// # Errors
///
/// Returns `AppError::Cancelled` on Esc/Ctrl-C, or a generic error if
/// the terminal cannot be driven.
pub fn select_with_arrows(
    options: &[(&str, &str)],
    prompt: &str,
    default_key: &str,
) -> Result<String> {
    if options.is_empty() {
        return Err(AppError::generic("no options to select from"));
    }
    let mut selected = options
        .iter()
        .position(|(key, _)| *key == default_key)
        .unwrap_or(0);

    let guard = RawModeGuard::enable()?;
    let mut drawn: u16 = 0;

    let result = loop {
        if let Err(e) = draw_panel(options, prompt, selected, &mut drawn) {
            break Err(AppError::generic(format!("selection render failed: {}", e)));
        }
        let event = match event::read() {
            Ok(event) => event,
            Err(e) => break Err(AppError::generic(format!("keyboard read failed: {}", e))),
        };
        let Event::Key(key) = event else { continue };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Up => {
                selected = (selected + options.len() - 1) % options.len();
            }
            KeyCode::Down => {
                selected = (selected + 1) % options.len();
            }
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                selected = (selected + options.len() - 1) % options.len();
            }
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                selected = (selected + 1) % options.len();
            }
            KeyCode::Enter => break Ok(options[selected].0.to_string()),
            KeyCode::Esc => break Err(AppError::Cancelled),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                break Err(AppError::Cancelled);
            }
            _ => {}
        }
    };

    let _ = erase_panel(drawn);
    drop(guard);
    result
}

/// Repaint the panel over the previous one; raw mode needs \r\n
fn draw_panel(
    options: &[(&str, &str)],
    prompt: &str,
    selected: usize,
    drawn: &mut u16,
) -> std::io::Result<()> {
    let mut out = stderr();
    if *drawn > 0 {
        out.queue(cursor::MoveToColumn(0))?;
        out.queue(cursor::MoveUp(*drawn))?;
        out.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
    }

    let mut lines: Vec<String> = Vec::with_capacity(options.len() + 2);
    lines.push(prompt.bold().to_string());
    for (i, (key, description)) in options.iter().enumerate() {
        let marker = if i == selected { "▶" } else { " " };
        let described = format!("({})", description);
        lines.push(format!(
            "  {} {} {}",
            marker.cyan(),
            key.cyan(),
            described.as_str().dark_grey()
        ));
    }
    lines.push(
        "  Use ↑/↓ to navigate, Enter to select, Esc to cancel"
            .dark_grey()
            .to_string(),
    );

    for line in &lines {
        out.write_all(line.as_bytes())?;
        out.write_all(b"\r\n")?;
    }
    out.flush()?;
    *drawn = lines.len() as u16;
    Ok(())
}

fn erase_panel(drawn: u16) -> std::io::Result<()> {
    if drawn == 0 {
        return Ok(());
    }
    let mut out = stderr();
    out.queue(cursor::MoveToColumn(0))?;
    out.queue(cursor::MoveUp(drawn))?;
    out.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
    out.flush()
}
