// src/render.rs
//
// Console rendering of the medication history.
//
// Rendering is read-only: it consumes the history slice and never feeds
// anything back into the simulation. The line is rewritten in place with a
// leading carriage return so a running episode shows a single, growing line.

use std::io::{self, Write};

use crate::actions::Medication;

/// Prefix of every rendered line.
pub const RENDER_PREFIX: &str = "Meds Sequence are: ";

/// Format a history as `[low_insulin, metformin, ...]`.
pub fn format_medication_sequence(history: &[Medication]) -> String {
    let names: Vec<&str> = history.iter().map(|m| m.name()).collect();
    format!("[{}]", names.join(", "))
}

/// Writes the in-place medication line to any writer.
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Overwrite the current line with the given history and flush.
    pub fn render(&mut self, history: &[Medication]) -> io::Result<()> {
        write!(
            self.out,
            "\r{}{}",
            RENDER_PREFIX,
            format_medication_sequence(history)
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
