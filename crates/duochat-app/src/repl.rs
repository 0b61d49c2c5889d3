//! The chat loop: reads prompts and commands, drives the dispatcher.

use std::io::{self, BufRead, Write};

use duochat_ai::{
    ChatView, Credential, CredentialStore, Dispatcher, ProviderFactory, ProviderKind, Session,
};
use tokio::task::block_in_place;
use tracing::{debug, error};

use crate::console::{Console, PROMPT_PLACEHOLDER};
use crate::input;

const DESCRIPTION: &str = "This is a simple chatbot that allows you to choose between using \
OpenAI's GPT-3.5 or Google's Gemini model to generate responses. You need to provide the \
corresponding API key or credentials to use either service.";

const HELP: &str = "\
Commands:
  /provider [openai|gemini]  show or switch the provider
  /key                       enter the OpenAI API key
  /credentials               enter the Google service account key path
  /history                   print the conversation so far
  /status                    show the provider and which credentials are set
  /help                      show this help
  /quit, /exit               leave (Ctrl-D also works)
Start a message with // to send a literal leading slash.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Prompt(String),
    Provider(Option<String>),
    Key,
    Credentials,
    History,
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.starts_with("//") {
        return Command::Prompt(trimmed[1..].to_string());
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Prompt(line.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());
    match name {
        "provider" => Command::Provider(arg.map(str::to_string)),
        "key" => Command::Key,
        "credentials" => Command::Credentials,
        "history" => Command::History,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

/// One interactive chat session.
pub struct ChatApp<F: ProviderFactory, R: BufRead, W: Write + Send> {
    dispatcher: Dispatcher<F>,
    session: Session,
    credentials: CredentialStore,
    provider: ProviderKind,
    input: R,
    console: Console<W>,
}

impl<F: ProviderFactory, R: BufRead, W: Write + Send> ChatApp<F, R, W> {
    pub fn new(factory: F, provider: ProviderKind, input: R, console: Console<W>) -> Self {
        Self {
            dispatcher: Dispatcher::new(factory),
            session: Session::new(),
            credentials: CredentialStore::new(),
            provider,
            input,
            console,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    #[cfg(test)]
    pub fn into_console(self) -> Console<W> {
        self.console
    }

    /// Run until `/quit`, end of input, or a write to the console fails.
    pub async fn run(&mut self, title: &str) -> io::Result<()> {
        debug!(session = %self.session.id().short(), provider = self.provider.id(), "Chat session started");
        self.console.banner(title, DESCRIPTION);
        self.console
            .info(&format!("{PROMPT_PLACEHOLDER} Type a message, or /help for commands."));
        self.ask_credential(self.provider)?;
        if !self.credentials.has(self.provider) {
            self.console.credential_required(self.provider);
        }

        loop {
            if let Some(err) = self.console.take_write_error() {
                debug!(session = %self.session.id().short(), "Output closed, ending session");
                return Err(err);
            }
            self.console.prompt(self.provider);
            let Some(line) = self.read_line()? else {
                self.console.input_done();
                self.console.info("");
                break;
            };

            match parse_command(&line) {
                Command::Prompt(prompt) => {
                    self.submit(&prompt).await;
                    self.console.input_done();
                }
                command => {
                    self.console.input_done();
                    if !self.execute(command)? {
                        break;
                    }
                }
            }
        }
        debug!(session = %self.session.id().short(), turns = self.session.turn_count(), "Chat session ended");
        Ok(())
    }

    /// Send one prompt through the dispatcher. Faults are reported, not returned.
    pub async fn submit(&mut self, prompt: &str) {
        let selection = self.credentials.selection(self.provider);
        let result = self
            .dispatcher
            .submit(&mut self.session, &selection, prompt, &mut self.console)
            .await;
        if let Err(err) = result {
            error!(
                session = %self.session.id().short(),
                provider = self.provider.id(),
                error = %err,
                "Provider call failed"
            );
            self.console.error(&err.to_string());
        }
    }

    /// Run a command. Returns `false` when the session should end.
    pub fn execute(&mut self, command: Command) -> io::Result<bool> {
        match command {
            Command::Prompt(_) => {}
            Command::Provider(None) => {
                let choices: Vec<&str> = ProviderKind::ALL.iter().map(|p| p.id()).collect();
                self.console.info(&format!(
                    "Provider: {} (choices: {})",
                    self.provider.label(),
                    choices.join(", ")
                ));
            }
            Command::Provider(Some(name)) => match name.parse::<ProviderKind>() {
                Ok(kind) => self.switch_provider(kind)?,
                Err(err) => self.console.error(&err.to_string()),
            },
            Command::Key => self.ask_credential(ProviderKind::OpenAi)?,
            Command::Credentials => self.ask_credential(ProviderKind::Gemini)?,
            Command::History => {
                if self.session.transcript().is_empty() {
                    self.console.info("No messages yet.");
                }
                for turn in self.session.transcript() {
                    self.console.print_turn(turn);
                }
            }
            Command::Status => {
                self.console
                    .info(&format!("Provider: {}", self.provider.label()));
                for kind in ProviderKind::ALL {
                    let state = if self.credentials.has(kind) { "set" } else { "not set" };
                    self.console
                        .info(&format!("{}: {state}", kind.credential_name()));
                }
                self.console
                    .info(&format!("Messages: {}", self.session.turn_count()));
            }
            Command::Help => self.console.info(HELP),
            Command::Quit => return Ok(false),
            Command::Unknown(name) => self
                .console
                .error(&format!("unknown command '/{name}', try /help")),
        }
        Ok(true)
    }

    fn switch_provider(&mut self, kind: ProviderKind) -> io::Result<()> {
        self.provider = kind;
        debug!(session = %self.session.id().short(), provider = kind.id(), "Provider switched");
        self.console.info(&format!("Using {}.", kind.label()));
        if !self.credentials.has(kind) {
            self.ask_credential(kind)?;
            if !self.credentials.has(kind) {
                self.console.credential_required(kind);
            }
        }
        Ok(())
    }

    /// Read a credential for `kind`. An empty entry clears it.
    fn ask_credential(&mut self, kind: ProviderKind) -> io::Result<()> {
        self.console.ask(kind.credential_name());
        let Some(value) = self.read_secret()? else {
            self.console.info("Cancelled.");
            return Ok(());
        };
        let credential = Credential::new(value.trim());
        let present = credential.is_present();
        self.credentials.set(kind, credential);
        if present {
            debug!(provider = kind.id(), "Credential updated");
        }
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let reader = &mut self.input;
        block_in_place(|| input::read_line(reader))
    }

    fn read_secret(&mut self) -> io::Result<Option<String>> {
        if self.console.is_interactive() {
            let out = self.console.writer();
            block_in_place(|| input::read_masked(out))
        } else {
            self.read_line()
        }
    }
}

#[cfg(test)]
mod tests;
