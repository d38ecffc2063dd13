//! Re-readable inbound request body.
//!
//! The body arrives as a one-shot stream. Verbose logging needs its bytes
//! before forwarding does, so logging materializes it into a buffer and the
//! forwarder reuses that buffer. Bodies nobody logged are streamed through.

use axum::body::{Body, Bytes, HttpBody};

/// Error reading the inbound body.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("failed to read request body: {0}")]
    Read(#[source] axum::Error),
    #[error("request body was lost by an earlier failed read")]
    Lost,
}

enum BodyState {
    Pending(Body),
    Buffered(Bytes),
    Lost,
}

/// Inbound body with an explicit materialize step.
pub struct RequestBody {
    state: BodyState,
    limit: usize,
}

impl RequestBody {
    /// Wrap a streaming body. At most `limit` bytes will be buffered.
    pub fn new(body: Body, limit: usize) -> Self {
        Self {
            state: BodyState::Pending(body),
            limit,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_buffered(&self) -> bool {
        matches!(self.state, BodyState::Buffered(_))
    }

    /// Read the whole body into memory, or return the buffer read earlier.
    ///
    /// A failed read leaves the body lost; subsequent calls return
    /// [`BodyError::Lost`] instead of a truncated buffer.
    pub async fn materialize(&mut self) -> Result<Bytes, BodyError> {
        let state = std::mem::replace(&mut self.state, BodyState::Lost);
        self.state = match state {
            BodyState::Pending(body) => match axum::body::to_bytes(body, self.limit).await {
                Ok(bytes) => BodyState::Buffered(bytes),
                Err(err) => return Err(BodyError::Read(err)),
            },
            other => other,
        };

        match &self.state {
            BodyState::Buffered(bytes) => Ok(bytes.clone()),
            _ => Err(BodyError::Lost),
        }
    }

    /// Consume the body for forwarding.
    ///
    /// A buffered body is sent as is. A body nobody read yet is streamed
    /// through without a size limit.
    pub fn into_upload(self) -> Result<Upload, BodyError> {
        match self.state {
            BodyState::Pending(body) if body.is_end_stream() => Ok(Upload::Buffered(Bytes::new())),
            BodyState::Pending(body) => Ok(Upload::Streaming(body)),
            BodyState::Buffered(bytes) => Ok(Upload::Buffered(bytes)),
            BodyState::Lost => Err(BodyError::Lost),
        }
    }
}

/// Body handed to the outbound request.
#[derive(Debug)]
pub enum Upload {
    Buffered(Bytes),
    Streaming(Body),
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            BodyState::Pending(_) => "pending",
            BodyState::Buffered(_) => "buffered",
            BodyState::Lost => "lost",
        };
        f.debug_struct("RequestBody")
            .field("state", &state)
            .field("limit", &self.limit)
            .finish()
    }
}
