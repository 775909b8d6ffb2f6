//! `TrafficSource` fed from an in-process channel.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::ports::{InboundMessage, TrafficSource};

/// Sending half paired with a [`ChannelTrafficSource`].
#[derive(Debug, Clone)]
pub struct TrafficPublisher {
    channel: String,
    tx: mpsc::Sender<InboundMessage>,
}

impl TrafficPublisher {
    /// Publish a raw payload on the paired channel.
    ///
    /// Returns `false` once the source has been dropped.
    pub async fn publish(&self, payload: impl Into<Vec<u8>>) -> bool {
        self.send(InboundMessage::message(self.channel.clone(), payload))
            .await
    }

    /// Push an arbitrary frame, e.g. a subscribe confirmation.
    pub async fn send(&self, message: InboundMessage) -> bool {
        self.tx.send(message).await.is_ok()
    }
}

/// Subscription backed by a bounded `mpsc` channel.
///
/// The source ends once every publisher is dropped, the same way a Redis
/// subscription stream ends when its connection goes away.
#[derive(Debug)]
pub struct ChannelTrafficSource {
    channel: String,
    rx: mpsc::Receiver<InboundMessage>,
}

impl ChannelTrafficSource {
    /// Create a source for `channel` and its publisher.
    pub fn new(channel: impl Into<String>, capacity: usize) -> (TrafficPublisher, Self) {
        let channel = channel.into();
        let (tx, rx) = mpsc::channel(capacity);
        (
            TrafficPublisher {
                channel: channel.clone(),
                tx,
            },
            Self { channel, rx },
        )
    }
}

#[async_trait]
impl TrafficSource for ChannelTrafficSource {
    fn channel(&self) -> &str {
        &self.channel
    }

    async fn next_message(&mut self) -> Option<InboundMessage> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MessageKind;

    #[tokio::test]
    async fn test_publish_and_receive() {
        let (publisher, mut source) = ChannelTrafficSource::new("chaos:traffic", 4);
        assert!(publisher.publish("hello").await);

        let message = source.next_message().await.expect("message expected");
        assert_eq!(message.kind, MessageKind::Message);
        assert_eq!(message.channel, "chaos:traffic");
        assert_eq!(message.payload, b"hello");
    }

    #[tokio::test]
    async fn test_source_ends_when_publishers_drop() {
        let (publisher, mut source) = ChannelTrafficSource::new("chaos:traffic", 4);
        drop(publisher);
        assert!(source.next_message().await.is_none());
    }
}
