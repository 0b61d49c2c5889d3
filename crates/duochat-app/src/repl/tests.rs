use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use duochat_ai::{AiError, ChatProvider, FragmentStream, Reply, Role, Turn};

use super::*;

/// Replies "echo: <last prompt>" as two fragments, or fails when told to.
struct EchoProvider {
    kind: ProviderKind,
    fail: bool,
}

#[async_trait]
impl ChatProvider for EchoProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn send(&self, transcript: &[Turn]) -> Result<Reply, AiError> {
        if self.fail {
            return Err(AiError::ApiError("HTTP 500: boom".into()));
        }
        let last = transcript.last().map(Turn::content).unwrap_or_default();
        Ok(Reply::Stream(FragmentStream::from_results(vec![
            Ok("echo: ".to_string()),
            Ok(last.to_string()),
        ])))
    }
}

#[derive(Default)]
struct EchoFactory {
    fail: bool,
    connects: Mutex<Vec<(ProviderKind, String)>>,
}

#[async_trait]
impl ProviderFactory for EchoFactory {
    async fn connect(
        &self,
        provider: ProviderKind,
        credential: &Credential,
    ) -> Result<Arc<dyn ChatProvider>, AiError> {
        self.connects
            .lock()
            .unwrap()
            .push((provider, credential.expose().to_string()));
        Ok(Arc::new(EchoProvider {
            kind: provider,
            fail: self.fail,
        }))
    }
}

type TestApp = ChatApp<EchoFactory, Cursor<String>, Vec<u8>>;

fn app(factory: EchoFactory, provider: ProviderKind, script: &str) -> TestApp {
    ChatApp::new(
        factory,
        provider,
        Cursor::new(script.to_string()),
        Console::new(Vec::new(), false),
    )
}

fn output(app: TestApp) -> String {
    String::from_utf8(app.into_console().into_inner()).unwrap()
}

#[test]
fn plain_text_is_a_prompt() {
    assert_eq!(parse_command("hello"), Command::Prompt("hello".into()));
    assert_eq!(parse_command("  spaced "), Command::Prompt("  spaced ".into()));
}

#[test]
fn double_slash_escapes_prompt() {
    assert_eq!(parse_command("//etc/hosts"), Command::Prompt("/etc/hosts".into()));
}

#[test]
fn commands_parse() {
    assert_eq!(parse_command("/key"), Command::Key);
    assert_eq!(parse_command("/credentials"), Command::Credentials);
    assert_eq!(parse_command("/history"), Command::History);
    assert_eq!(parse_command("/status"), Command::Status);
    assert_eq!(parse_command("/help"), Command::Help);
    assert_eq!(parse_command("/quit"), Command::Quit);
    assert_eq!(parse_command("/exit"), Command::Quit);
    assert_eq!(parse_command("/provider"), Command::Provider(None));
    assert_eq!(
        parse_command("/provider  gemini "),
        Command::Provider(Some("gemini".into()))
    );
    assert_eq!(parse_command("/nope"), Command::Unknown("nope".into()));
}

#[tokio::test(flavor = "multi_thread")]
async fn full_session_with_openai() {
    let mut app = app(
        EchoFactory::default(),
        ProviderKind::OpenAi,
        "sk-test\nhi\nhow are you\n/quit\n",
    );
    app.run("💬 Chatbot").await.unwrap();

    let turns = app.session().turns().to_vec();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0], Turn::user("hi"));
    assert_eq!(turns[1], Turn::assistant("echo: hi"));
    assert_eq!(turns[3].content(), "echo: how are you");

    let text = output(app);
    assert!(text.starts_with("💬 Chatbot\nThis is a simple chatbot"));
    assert!(text.contains("user: hi\nassistant: echo: hi\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_credential_shows_notice_and_skips_call() {
    let mut app = app(EchoFactory::default(), ProviderKind::OpenAi, "\nhi\n");
    app.run("title").await.unwrap();

    assert_eq!(app.session().turn_count(), 0);
    assert!(app.dispatcher.factory().connects.lock().unwrap().is_empty());
    let text = output(app);
    assert!(text.contains("Please add your OpenAI API key to continue."));
    assert!(text.contains("/key"));
}

#[tokio::test(flavor = "multi_thread")]
async fn fault_prints_error_and_keeps_transcript() {
    let factory = EchoFactory {
        fail: true,
        ..Default::default()
    };
    let mut app = app(factory, ProviderKind::OpenAi, "sk-test\nhi\n");
    app.run("title").await.unwrap();

    assert_eq!(app.session().turn_count(), 0);
    assert!(output(app).contains("error: "));
}

#[tokio::test(flavor = "multi_thread")]
async fn switching_provider_keeps_turns_and_asks_for_credential() {
    let mut app = app(
        EchoFactory::default(),
        ProviderKind::OpenAi,
        "sk-test\nhi\n/provider gemini\n/tmp/key.json\nagain\n",
    );
    app.run("title").await.unwrap();

    assert_eq!(app.provider(), ProviderKind::Gemini);
    let turns = app.session().turns().to_vec();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0], Turn::user("hi"));
    assert_eq!(turns[2].role(), Role::User);

    let connects = app.dispatcher.factory().connects.lock().unwrap().clone();
    assert_eq!(
        connects,
        vec![
            (ProviderKind::OpenAi, "sk-test".to_string()),
            (ProviderKind::Gemini, "/tmp/key.json".to_string()),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_provider_is_rejected() {
    let mut app = app(
        EchoFactory::default(),
        ProviderKind::OpenAi,
        "\n/provider claude\n",
    );
    app.run("title").await.unwrap();

    assert_eq!(app.provider(), ProviderKind::OpenAi);
    assert!(output(app).contains("error: unknown provider 'claude'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn status_and_history() {
    let mut app = app(
        EchoFactory::default(),
        ProviderKind::OpenAi,
        "sk-test\n/history\nhi\n/status\n/history\n",
    );
    app.run("title").await.unwrap();

    let text = output(app);
    assert!(text.contains("No messages yet."));
    assert!(text.contains("OpenAI API Key: set"));
    assert!(text.contains("Google Service Account Key Path: not set"));
    assert!(text.contains("Messages: 2"));
    assert_eq!(text.matches("assistant: echo: hi").count(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn key_command_replaces_credential() {
    let mut app = app(
        EchoFactory::default(),
        ProviderKind::OpenAi,
        "\n/key\nsk-new\nhi\n",
    );
    app.run("title").await.unwrap();

    assert_eq!(app.session().turn_count(), 2);
    let connects = app.dispatcher.factory().connects.lock().unwrap().clone();
    assert_eq!(connects, vec![(ProviderKind::OpenAi, "sk-new".to_string())]);
}

/// Accepts writes until `budget` bytes, then reports a closed pipe.
struct ClosedAfter {
    written: usize,
    budget: usize,
}

impl Write for ClosedAfter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written + buf.len() > self.budget {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
        }
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_output_ends_session_with_error() {
    let mut app = ChatApp::new(
        EchoFactory::default(),
        ProviderKind::OpenAi,
        Cursor::new("sk-test\nhi\nagain\nmore\n".to_string()),
        Console::new(ClosedAfter { written: 0, budget: 0 }, false),
    );

    let err = app.run("title").await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(app.dispatcher.factory().connects.lock().unwrap().is_empty());
}
