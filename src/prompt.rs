//! Interactive yes/no confirmation
//!
//! The line source is picked once at startup by [`LineReader::detect`]. On a
//! terminal the operator's typing is echoed by the terminal itself; when
//! answers are piped in, the confirmer echoes them so the transcript reads
//! the same either way.

use std::io::{self, BufRead, IsTerminal, Write};

/// Asks the operator a yes/no question
pub trait Confirm {
    /// Returns true only for an explicit `y`/`Y` answer
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Source of operator input lines
pub enum LineReader {
    /// Stdin attached to a terminal
    Terminal,
    /// Redirected input
    Piped(Box<dyn BufRead>),
}

impl LineReader {
    /// Choose the reader for this process
    pub fn detect() -> Self {
        if io::stdin().is_terminal() {
            LineReader::Terminal
        } else {
            tracing::debug!("stdin is not a terminal, reading piped answers");
            LineReader::Piped(Box::new(io::BufReader::new(io::stdin())))
        }
    }

    /// Read one line; `Ok(None)` on end of input
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = match self {
            LineReader::Terminal => io::stdin().lock().read_line(&mut line)?,
            LineReader::Piped(reader) => reader.read_line(&mut line)?,
        };
        Ok((read > 0).then_some(line))
    }

    /// Whether typed answers already appear on screen
    fn echoes_input(&self) -> bool {
        matches!(self, LineReader::Terminal)
    }
}

/// Returns true if the answer means yes
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Confirmer writing prompts to `writer` and reading answers from a [`LineReader`]
pub struct Confirmer<W: Write> {
    reader: LineReader,
    writer: W,
}

impl Confirmer<io::Stdout> {
    /// Confirmer on stdout with the detected line reader
    pub fn stdio() -> Self {
        Self::new(LineReader::detect(), io::stdout())
    }
}

impl<W: Write> Confirmer<W> {
    pub fn new(reader: LineReader, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<W: Write> Confirm for Confirmer<W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.writer, "{} [y/N] ", prompt)
            .and_then(|_| self.writer.flush())
            .is_err()
        {
            return false;
        }

        match self.reader.read_line() {
            Ok(Some(answer)) => {
                if !self.reader.echoes_input() {
                    let _ = writeln!(self.writer, "{}", answer.trim_end());
                }
                is_yes(&answer)
            }
            Ok(None) => {
                // Keep the next output off the prompt line
                let _ = writeln!(self.writer);
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read answer");
                let _ = writeln!(self.writer);
                false
            }
        }
    }
}
