//! Terminal rendering of the conversation.

use std::io::{self, Write};

use crossterm::cursor::MoveToPreviousLine;
use crossterm::style::{ContentStyle, Stylize};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use duochat_ai::{ChatView, ProviderKind, Role, Turn};
use tracing::debug;

pub const PROMPT_PLACEHOLDER: &str = "What is up?";

/// Line-oriented chat output.
///
/// With `interactive` set, output is styled and the echoed prompt line is
/// replaced by the labelled user turn.
pub struct Console<W: Write + Send> {
    out: W,
    interactive: bool,
    echo_pending: bool,
    reply_open: bool,
    /// First write failure; output stops after it.
    failed: Option<io::Error>,
}

impl Console<io::Stdout> {
    pub fn stdout(interactive: bool) -> Self {
        Self::new(io::stdout(), interactive)
    }
}

impl<W: Write + Send> Console<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self {
            out,
            interactive,
            echo_pending: false,
            reply_open: false,
            failed: None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    /// The write failure that stopped output, if any.
    pub fn take_write_error(&mut self) -> Option<io::Error> {
        self.failed.take()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, write: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.failed.is_some() {
            return;
        }
        if let Err(e) = write(&mut self.out).and_then(|()| self.out.flush()) {
            debug!("Console write failed, suppressing further output: {e}");
            self.failed = Some(e);
        }
    }

    fn paint(&self, text: &str, style: ContentStyle) -> String {
        if self.interactive {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn banner(&mut self, title: &str, description: &str) {
        let title = self.paint(title, ContentStyle::new().bold());
        self.emit(|out| writeln!(out, "{title}\n{description}\n"));
    }

    pub fn info(&mut self, message: &str) {
        self.emit(|out| writeln!(out, "{message}"));
    }

    pub fn notice(&mut self, message: &str) {
        let message = self.paint(&format!("🗝️  {message}"), ContentStyle::new().yellow());
        self.emit(|out| writeln!(out, "{message}"));
    }

    pub fn error(&mut self, message: &str) {
        let label = self.paint("error:", ContentStyle::new().red().bold());
        self.emit(|out| writeln!(out, "{label} {message}"));
    }

    /// Show the input marker. The line the user types is echoed by the terminal.
    pub fn prompt(&mut self, provider: ProviderKind) {
        let marker = self.paint(&format!("[{}] > ", provider.id()), ContentStyle::new().dim());
        self.emit(|out| write!(out, "{marker}"));
        self.echo_pending = self.interactive;
    }

    /// Show a label for a credential read.
    pub fn ask(&mut self, label: &str) {
        self.emit(|out| write!(out, "{label}: "));
    }

    pub fn input_done(&mut self) {
        self.echo_pending = false;
    }

    /// Print a stored turn, as for a transcript replay.
    pub fn print_turn(&mut self, turn: &Turn) {
        let label = self.role_label(turn.role());
        self.emit(|out| writeln!(out, "{label} {}", turn.content()));
    }

    fn role_label(&self, role: Role) -> String {
        match role {
            Role::User => self.paint("user:", ContentStyle::new().cyan().bold()),
            Role::Assistant => self.paint("assistant:", ContentStyle::new().green().bold()),
        }
    }

    fn erase_echo(&mut self) {
        if self.echo_pending {
            self.echo_pending = false;
            self.emit(|out| queue!(out, MoveToPreviousLine(1), Clear(ClearType::CurrentLine)));
        }
    }
}

impl<W: Write + Send> ChatView for Console<W> {
    fn show_turn(&mut self, turn: &Turn) {
        self.erase_echo();
        self.print_turn(turn);
    }

    fn begin_reply(&mut self, _provider: ProviderKind) {
        let label = self.role_label(Role::Assistant);
        self.emit(|out| write!(out, "{label} "));
        self.reply_open = true;
    }

    fn show_fragment(&mut self, fragment: &str) {
        self.emit(|out| write!(out, "{fragment}"));
    }

    fn end_reply(&mut self) {
        if self.reply_open {
            self.reply_open = false;
            self.emit(|out| writeln!(out));
        }
    }

    fn credential_required(&mut self, provider: ProviderKind) {
        self.input_done();
        self.notice(provider.credential_hint());
        let command = match provider {
            ProviderKind::OpenAi => "/key",
            ProviderKind::Gemini => "/credentials",
        };
        self.info(&format!("Enter it with {command}."));
    }
}
