//! Inventory HTTP response body type.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;

/// Response body for the local HTTP server.
///
/// Envelopes either carry a JSON string or nothing at all.
#[derive(Debug, Default)]
pub enum InventoryResponseBody {
    /// A fully buffered JSON payload.
    Buffered(Full<Bytes>),
    /// No body (health check, absent record).
    #[default]
    Empty,
}

impl InventoryResponseBody {
    /// Create a response body from raw bytes.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Buffered(Full::new(data.into()))
    }

    /// Create a body from an optional envelope body string.
    #[must_use]
    pub fn from_envelope(body: Option<String>) -> Self {
        body.map_or(Self::Empty, Self::from_bytes)
    }
}

impl http_body::Body for InventoryResponseBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Empty => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Empty => true,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Empty => http_body::SizeHint::with_exact(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body::Body as _;

    use super::*;

    #[test]
    fn test_should_report_exact_size_for_envelope_body() {
        let body = InventoryResponseBody::from_envelope(Some("\"ok\"".to_owned()));
        assert_eq!(body.size_hint().exact(), Some(4));
        assert!(!body.is_end_stream());
    }

    #[test]
    fn test_should_be_empty_without_envelope_body() {
        let body = InventoryResponseBody::from_envelope(None);
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
    }
}
