//! Prompt and credential entry.
//!
//! Credentials are read with echo replaced by `*` when stdin is a
//! terminal, and as a plain line otherwise (piped input, tests).

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// What a key press means for a masked field.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// A character was added: echo one mask symbol.
    Echo,
    /// A character was removed: erase one mask symbol.
    Erase,
    Ignore,
    Submit,
    Cancel,
}

/// Accumulates a secret from key events.
#[derive(Default)]
pub struct SecretBuffer {
    value: String,
}

impl SecretBuffer {
    pub fn handle(&mut self, key: KeyEvent) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::Ignore;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => KeyAction::Submit,
            KeyCode::Esc => KeyAction::Cancel,
            KeyCode::Char('c') if ctrl => KeyAction::Cancel,
            KeyCode::Char('d') if ctrl && self.is_empty() => KeyAction::Cancel,
            KeyCode::Char('u') if ctrl => {
                // Erasing is reported one symbol at a time by the caller
                self.value.clear();
                KeyAction::Ignore
            }
            KeyCode::Char(_) if ctrl => KeyAction::Ignore,
            KeyCode::Char(c) => {
                self.value.push(c);
                KeyAction::Echo
            }
            KeyCode::Backspace => {
                if self.value.pop().is_some() {
                    KeyAction::Erase
                } else {
                    KeyAction::Ignore
                }
            }
            _ => KeyAction::Ignore,
        }
    }

    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn into_secret(self) -> String {
        self.value
    }
}

/// Restores cooked mode however the masked read ends.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Read a secret from the terminal with masked echo. `None` means cancelled.
pub fn read_masked(out: &mut impl Write) -> io::Result<Option<String>> {
    let result = {
        let _raw = RawModeGuard::enable()?;
        read_masked_raw(out)
    };
    writeln!(out)?;
    out.flush()?;
    result
}

fn read_masked_raw(out: &mut impl Write) -> io::Result<Option<String>> {
    let mut buffer = SecretBuffer::default();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        let shown = buffer.len();
        match buffer.handle(key) {
            KeyAction::Echo => write!(out, "*")?,
            KeyAction::Erase => write!(out, "\x08 \x08")?,
            KeyAction::Submit => return Ok(Some(buffer.into_secret())),
            KeyAction::Cancel => return Ok(None),
            KeyAction::Ignore => {
                for _ in buffer.len()..shown {
                    write!(out, "\x08 \x08")?;
                }
            }
        }
        out.flush()?;
    }
}

/// Read one line, without its line terminator. `None` on end of input.
pub fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}
