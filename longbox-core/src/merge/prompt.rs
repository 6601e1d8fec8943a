//! Operator input for merge disambiguation
//!
//! The engine never reads the terminal directly; answers come through an
//! injected [`InputSource`] so the whole merge path runs under test without
//! a terminal attached.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// One answer to a disambiguation menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Zero-based index into the offered options
    Pick(usize),
    /// Free-text replacement value typed by the operator
    Manual(String),
    /// Leave the field untouched
    Skip,
}

/// Where disambiguation answers come from
pub trait InputSource {
    fn choose(&mut self, field: &str, options: &[String]) -> io::Result<Reply>;
}

/// States of one menu interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuState {
    Selecting,
    ManualEntry,
    Aborted,
}

/// Terminal-backed input source
pub struct ConsoleInput {
    /// Unparseable lines tolerated before the step is abandoned
    max_attempts: usize,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self { max_attempts: 3 }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for ConsoleInput {
    fn choose(&mut self, field: &str, options: &[String]) -> io::Result<Reply> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "Conflicting values for {field}:")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(out, "  {}) {option}", index + 1)?;
        }
        writeln!(out, "  0) skip    m) enter a value manually")?;

        let mut state = MenuState::Selecting;
        for _ in 0..self.max_attempts {
            match state {
                MenuState::Selecting => {
                    write!(out, "> ")?;
                    out.flush()?;
                    let mut line = String::new();
                    if io::stdin().lock().read_line(&mut line)? == 0 {
                        state = MenuState::Aborted;
                        continue;
                    }
                    let line = line.trim();
                    if line == "0" {
                        state = MenuState::Aborted;
                    } else if line.eq_ignore_ascii_case("m") {
                        state = MenuState::ManualEntry;
                    } else if let Ok(choice) = line.parse::<usize>() {
                        if (1..=options.len()).contains(&choice) {
                            return Ok(Reply::Pick(choice - 1));
                        }
                    }
                }
                MenuState::ManualEntry => {
                    write!(out, "value: ")?;
                    out.flush()?;
                    let mut line = String::new();
                    if io::stdin().lock().read_line(&mut line)? == 0 {
                        state = MenuState::Aborted;
                        continue;
                    }
                    return Ok(Reply::Manual(line.trim().to_string()));
                }
                MenuState::Aborted => return Ok(Reply::Skip),
            }
        }
        Ok(Reply::Skip)
    }
}

/// Scripted input source, used by tests; answers past the end of the script
/// skip the field
pub struct ScriptedInput {
    replies: VecDeque<Reply>,
}

impl ScriptedInput {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn choose(&mut self, _field: &str, _options: &[String]) -> io::Result<Reply> {
        Ok(self.replies.pop_front().unwrap_or(Reply::Skip))
    }
}
