//! In-place live rendering of the step tree
//!
//! Repaints the tracker's frame over the previous one using cursor
//! movement, giving a live-updating tree on stderr. The port contract
//! is no-throw: every I/O problem is swallowed here, a dropped frame is
//! preferable to a failed pipeline step.

use std::io::{stderr, Write};
use std::sync::{Arc, Mutex};

use crossterm::{cursor, terminal, QueueableCommand};

use crate::cli::tracker::RefreshPort;

/// Live frame painter; tracks how many lines the previous frame drew
#[derive(Debug, Default)]
pub struct LiveTree {
    drawn_lines: Mutex<u16>,
}

impl LiveTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the live frame so a final static render can be printed
    pub fn clear(&self) {
        let _ = self.repaint("");
    }

    fn repaint(&self, frame: &str) -> std::io::Result<()> {
        let mut drawn = self
            .drawn_lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut out = stderr();

        if *drawn > 0 {
            out.queue(cursor::MoveToColumn(0))?;
            out.queue(cursor::MoveUp(*drawn))?;
            out.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        }
        if !frame.is_empty() {
            out.write_all(frame.as_bytes())?;
            if !frame.ends_with('\n') {
                out.write_all(b"\n")?;
            }
        }
        out.flush()?;

        *drawn = frame.lines().count() as u16;
        Ok(())
    }
}

impl RefreshPort for LiveTree {
    fn refresh(&self, frame: &str) {
        let _ = self.repaint(frame);
    }
}

impl RefreshPort for Arc<LiveTree> {
    fn refresh(&self, frame: &str) {
        self.as_ref().refresh(frame);
    }
}
