//! Prompt sources.
//!
//! A source yields one line at a time: a prompt for the model or a
//! `#` directive for the session. `None` means the input is exhausted,
//! and every later call keeps returning `None`.

use std::collections::VecDeque;
use std::io::BufRead;

use tracing::warn;

/// Supplier of input lines for a session.
pub trait Source {
    /// Next line without its line terminator, or `None` at end of input.
    fn get(&mut self) -> Option<String>;
}

/// Reads lines from any buffered reader (stdin, a file, ...).
pub struct StreamSource<R: BufRead> {
    reader: R,
    finished: bool,
}

impl<R: BufRead> StreamSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            finished: false,
        }
    }
}

impl<R: BufRead> Source for StreamSource<R> {
    fn get(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
            Err(e) => {
                warn!("Stopping input after read error: {}", e);
                self.finished = true;
                None
            }
        }
    }
}

/// Fixed list of lines, handed out in order.
#[derive(Debug, Default, Clone)]
pub struct VecSource {
    lines: VecDeque<String>,
}

impl VecSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl Source for VecSource {
    fn get(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}
