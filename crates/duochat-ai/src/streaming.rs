//! Server-Sent Events (SSE) parsing and the fragment stream type.
//!
//! The OpenAI chat-completions API streams `data:` events over a long-lived
//! HTTP response. `SseReader` turns any async byte stream into discrete
//! events; `FragmentStream` is the finite, non-restartable sequence of text
//! fragments a provider hands back.

use std::fmt;

use bytes::Buf;
use futures_util::stream::{BoxStream, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, when the server names one.
    pub event: Option<String>,
    /// The event data; multi-line data is joined with `\n`.
    pub data: String,
}

/// Pulls SSE events one at a time from a buffered reader.
pub struct SseReader<R> {
    lines: Lines<R>,
    exhausted: bool,
}

impl<R: AsyncBufRead + Unpin> SseReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            exhausted: false,
        }
    }

    /// Read the next complete event. `Ok(None)` means end of input.
    pub async fn next_event(&mut self) -> Result<Option<SseEvent>, AiError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut current_event: Option<String> = None;
        let mut current_data = String::new();

        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| AiError::NetworkError(e.to_string()))?;

            let Some(line) = line else {
                // Flush a trailing event that was not terminated by a blank line
                self.exhausted = true;
                if current_data.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(SseEvent {
                    event: current_event,
                    data: current_data,
                }));
            };

            if line.is_empty() {
                if !current_data.is_empty() {
                    return Ok(Some(SseEvent {
                        event: current_event,
                        data: current_data,
                    }));
                }
                current_event = None;
                continue;
            }

            if let Some(event_type) = field_value(&line, "event") {
                current_event = Some(event_type.to_string());
            } else if let Some(data) = field_value(&line, "data") {
                if !current_data.is_empty() {
                    current_data.push('\n');
                }
                current_data.push_str(data);
            }
            // id:, retry: and `:` comments are ignored
        }
    }
}

/// Wrap a byte stream (e.g. `reqwest::Response::bytes_stream`) in an SSE reader.
pub fn sse_reader<S, B, E>(stream: S) -> SseReader<BufReader<StreamReader<S, B>>>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: Buf + Unpin,
    E: Into<std::io::Error>,
{
    SseReader::new(BufReader::new(StreamReader::new(stream)))
}

/// `name: value` or `name:value`; a single leading space is stripped.
fn field_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Incrementally delivered assistant text.
///
/// Yields fragments in order and then `None`. After a fault has been
/// yielded, or completion observed, the stream is finished for good.
pub struct FragmentStream {
    inner: Option<BoxStream<'static, Result<String, AiError>>>,
}

impl FragmentStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<String, AiError>> + Send + 'static,
    {
        Self {
            inner: Some(stream.boxed()),
        }
    }

    /// A stream over already-known results.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<String, AiError>>,
        I::IntoIter: Send + 'static,
    {
        Self::new(futures_util::stream::iter(results))
    }

    /// Next fragment, a fault, or `None` once finished.
    pub async fn next_fragment(&mut self) -> Option<Result<String, AiError>> {
        let inner = self.inner.as_mut()?;
        match inner.next().await {
            Some(Ok(fragment)) => Some(Ok(fragment)),
            Some(Err(e)) => {
                self.inner = None;
                Some(Err(e))
            }
            None => {
                self.inner = None;
                None
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_none()
    }
}

impl fmt::Debug for FragmentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentStream")
            .field("finished", &self.is_finished())
            .finish()
    }
}
