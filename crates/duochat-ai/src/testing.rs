//! Fakes and a local HTTP server shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::dispatcher::ProviderFactory;
use crate::selection::{Credential, ProviderKind};
use crate::streaming::FragmentStream;
use crate::view::ChatView;
use crate::{AiError, ChatProvider, Reply, Turn};

/// What a `FakeProvider` answers with.
#[derive(Clone)]
pub(crate) enum Script {
    /// Streamed fragments; `Err` entries become a mid-stream network fault.
    Fragments(Vec<Result<&'static str, &'static str>>),
    Text(&'static str),
    /// The call itself fails.
    Fault(&'static str),
}

pub(crate) struct FakeProvider {
    kind: ProviderKind,
    script: Script,
    seen: Mutex<Vec<Vec<Turn>>>,
}

impl FakeProvider {
    pub(crate) fn new(kind: ProviderKind, script: Script) -> Self {
        Self {
            kind,
            script,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn streaming(fragments: &[&'static str]) -> Self {
        Self::new(
            ProviderKind::OpenAi,
            Script::Fragments(fragments.iter().map(|f| Ok(*f)).collect()),
        )
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Transcripts received, one per call.
    pub(crate) fn seen(&self) -> Vec<Vec<Turn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn send(&self, transcript: &[Turn]) -> Result<Reply, AiError> {
        self.seen.lock().unwrap().push(transcript.to_vec());
        match &self.script {
            Script::Fragments(items) => {
                let results: Vec<Result<String, AiError>> = items
                    .iter()
                    .map(|item| match item {
                        Ok(text) => Ok(text.to_string()),
                        Err(msg) => Err(AiError::NetworkError(msg.to_string())),
                    })
                    .collect();
                Ok(Reply::Stream(FragmentStream::from_results(results)))
            }
            Script::Text(text) => Ok(Reply::Text(text.to_string())),
            Script::Fault(msg) => Err(AiError::ApiError(msg.to_string())),
        }
    }
}

/// Hands out one fake provider per kind and counts connections.
pub(crate) struct FakeFactory {
    pub(crate) openai: Arc<FakeProvider>,
    pub(crate) gemini: Arc<FakeProvider>,
    connects: AtomicUsize,
    credentials: Mutex<Vec<String>>,
    connect_error: Option<&'static str>,
}

impl FakeFactory {
    pub(crate) fn new(openai: Script, gemini: Script) -> Self {
        Self {
            openai: Arc::new(FakeProvider::new(ProviderKind::OpenAi, openai)),
            gemini: Arc::new(FakeProvider::new(ProviderKind::Gemini, gemini)),
            connects: AtomicUsize::new(0),
            credentials: Mutex::new(Vec::new()),
            connect_error: None,
        }
    }

    /// Every `connect` fails with `AiError::Credentials(message)`.
    pub(crate) fn with_connect_error(mut self, message: &'static str) -> Self {
        self.connect_error = Some(message);
        self
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderFactory for FakeFactory {
    async fn connect(
        &self,
        provider: ProviderKind,
        credential: &Credential,
    ) -> Result<Arc<dyn ChatProvider>, AiError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        if let Some(message) = self.connect_error {
            return Err(AiError::Credentials(message.to_string()));
        }
        let provider: Arc<dyn ChatProvider> = match provider {
            ProviderKind::OpenAi => self.openai.clone(),
            ProviderKind::Gemini => self.gemini.clone(),
        };
        Ok(provider)
    }
}

/// Records every call the engine makes on the display boundary.
#[derive(Debug, Default)]
pub(crate) struct RecordingView {
    pub(crate) turns: Vec<Turn>,
    pub(crate) fragments: Vec<String>,
    pub(crate) replies_begun: Vec<ProviderKind>,
    pub(crate) replies_ended: usize,
    pub(crate) credential_prompts: Vec<ProviderKind>,
}

impl ChatView for RecordingView {
    fn show_turn(&mut self, turn: &Turn) {
        self.turns.push(turn.clone());
    }

    fn begin_reply(&mut self, provider: ProviderKind) {
        self.replies_begun.push(provider);
    }

    fn show_fragment(&mut self, fragment: &str) {
        self.fragments.push(fragment.to_string());
    }

    fn end_reply(&mut self) {
        self.replies_ended += 1;
    }

    fn credential_required(&mut self, provider: ProviderKind) {
        self.credential_prompts.push(provider);
    }
}

/// One request as received by `TestServer`.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: String,
    pub(crate) path: String,
    headers: Vec<(String, String)>,
    pub(crate) body: String,
}

impl RecordedRequest {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A raw HTTP/1.1 response, written in pieces.
pub(crate) struct CannedResponse {
    head: String,
    chunks: Vec<String>,
}

impl CannedResponse {
    fn with_head(status: u16, extra_headers: &str, chunks: Vec<String>) -> Self {
        let reason = match status {
            200 => "OK",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            _ => "Status",
        };
        Self {
            head: format!("HTTP/1.1 {status} {reason}\r\n{extra_headers}Connection: close\r\n\r\n"),
            chunks,
        }
    }

    pub(crate) fn text(status: u16, body: &str) -> Self {
        Self::with_head(
            status,
            &format!(
                "Content-Type: text/plain\r\nContent-Length: {}\r\n",
                body.len()
            ),
            vec![body.to_string()],
        )
    }

    pub(crate) fn json(status: u16, body: serde_json::Value) -> Self {
        let body = body.to_string();
        Self::with_head(
            status,
            &format!(
                "Content-Type: application/json\r\nContent-Length: {}\r\n",
                body.len()
            ),
            vec![body],
        )
    }

    /// An event stream delimited by connection close, one TCP write per chunk.
    pub(crate) fn event_stream(chunks: &[&str]) -> Self {
        Self::with_head(
            200,
            "Content-Type: text/event-stream\r\n",
            chunks.iter().map(|c| c.to_string()).collect(),
        )
    }

    /// Announces a longer body than it sends, so the client sees the
    /// connection drop mid-body.
    pub(crate) fn truncated_stream(chunks: &[&str]) -> Self {
        Self::with_head(
            200,
            "Content-Type: text/event-stream\r\nContent-Length: 100000\r\n",
            chunks.iter().map(|c| c.to_string()).collect(),
        )
    }
}

/// Local HTTP listener answering one connection per canned response, in order.
pub(crate) struct TestServer {
    pub(crate) base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub(crate) async fn start(responses: Vec<CannedResponse>) -> Self {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                recorded.lock().unwrap().push(request);

                let _ = socket.write_all(response.head.as_bytes()).await;
                for chunk in &response.chunks {
                    let _ = socket.write_all(chunk.as_bytes()).await;
                    let _ = socket.flush().await;
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                }
                let _ = socket.shutdown().await;
            }
        });

        Self { base_url, requests }
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> RecordedRequest {
    use tokio::io::AsyncReadExt;

    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(key, _)| key == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + length {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (header_end + length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    RecordedRequest {
        method,
        path,
        headers,
        body,
    }
}
