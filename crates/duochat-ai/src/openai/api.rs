//! ChatProvider implementation for OpenAiClient (streaming completions).

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::AsyncBufRead;
use tracing::debug;

use crate::selection::ProviderKind;
use crate::streaming::{sse_reader, FragmentStream, SseReader};
use crate::{http, AiError, ChatProvider, Reply, Turn};

use super::client::{OpenAiClient, StreamChunk};

#[async_trait]
impl ChatProvider for OpenAiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn send(&self, transcript: &[Turn]) -> Result<Reply, AiError> {
        let body = self.build_request_body(transcript);
        let url = self.completions_url();

        debug!(model = %self.model(), messages = transcript.len(), "OpenAI streaming request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .header("accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(http::send_error)?;

        let response = http::check_status(response).await?;

        let byte_stream = response
            .bytes_stream()
            .map(|result| result.map_err(std::io::Error::other));

        Ok(Reply::Stream(fragments_from_sse(sse_reader(byte_stream))))
    }
}

/// Lazily decode completion chunks into fragments until `[DONE]` or end of body.
pub(crate) fn fragments_from_sse<R>(reader: SseReader<R>) -> FragmentStream
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    FragmentStream::new(futures_util::stream::unfold(
        Some(reader),
        |state| async move {
            let mut reader = state?;
            loop {
                let event = match reader.next_event().await {
                    Ok(Some(event)) => event,
                    Ok(None) => return None,
                    Err(e) => return Some((Err(e), None)),
                };
                match OpenAiClient::parse_stream_chunk(&event.data) {
                    Ok(StreamChunk::Fragment(text)) => return Some((Ok(text), Some(reader))),
                    Ok(StreamChunk::Empty) => continue,
                    Ok(StreamChunk::Done) => return None,
                    Err(e) => return Some((Err(e), None)),
                }
            }
        },
    ))
}
