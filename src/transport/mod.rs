//! Outbound chat transport. The booking engine and schedulers never talk to
//! `reqwest` directly — every call goes through `ChatTransport`, so tests can
//! swap in `mock::MockTransport` instead of reaching the network.

pub mod http_client;
pub mod mock;

use async_trait::async_trait;

pub use http_client::HttpChatTransport;
pub use mock::MockTransport;

use crate::error::Result;

/// A single outbound chat message plus its optional inline keyboard, encoded
/// as opaque `(label, callback_data)` pairs so the transport layer stays
/// ignorant of the chat protocol's own button semantics.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub buttons: Vec<Vec<(String, String)>>,
}

impl OutboundMessage {
    pub fn plain(chat_id: i64, text: impl Into<String>) -> Self {
        Self { chat_id, text: text.into(), buttons: Vec::new() }
    }

    pub fn with_buttons(chat_id: i64, text: impl Into<String>, buttons: Vec<Vec<(String, String)>>) -> Self {
        Self { chat_id, text: text.into(), buttons }
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a message. Implementations must surface a blocked recipient as
    /// `Error::TransportUserBlocked` rather than `Error::TransportTransient`,
    /// since the two are handled differently by every caller (a block should
    /// flip the client to `blocked`; a transient failure should not).
    async fn send_message(&self, message: OutboundMessage) -> Result<()>;
}
