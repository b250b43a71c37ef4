use async_trait::async_trait;
use std::sync::Mutex;

use super::{ChatTransport, OutboundMessage};
use crate::error::{Error, Result};

/// Records every message it would have sent. `fail_next` lets a test inject
/// one transient or block failure without needing a real network stub.
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<OutboundMessage>>,
    fail_next: Mutex<Option<MockFailure>>,
}

#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    Blocked,
    Transient,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, failure: MockFailure) {
        *self.fail_next.lock().unwrap() = Some(failure);
    }

    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_message(&self, message: OutboundMessage) -> Result<()> {
        if let Some(failure) = self.fail_next.lock().unwrap().take() {
            return match failure {
                MockFailure::Blocked => Err(Error::TransportUserBlocked),
                MockFailure::Transient => Err(Error::TransportTransient("mock transient failure".into())),
            };
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_messages() {
        let transport = MockTransport::new();
        transport.send_message(OutboundMessage::plain(1, "hello")).await.unwrap();
        assert_eq!(transport.sent_messages().len(), 1);
    }

    #[tokio::test]
    async fn injected_block_failure_surfaces() {
        let transport = MockTransport::new();
        transport.fail_next(MockFailure::Blocked);
        let err = transport.send_message(OutboundMessage::plain(1, "hi")).await.unwrap_err();
        assert!(matches!(err, Error::TransportUserBlocked));
    }
}
