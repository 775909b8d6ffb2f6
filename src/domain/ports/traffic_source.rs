//! Port for the pub/sub subscription feeding the consumer.

use async_trait::async_trait;

/// Kind of frame delivered by a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// A published payload
    Message,
    /// Subscription confirmation
    Subscribe,
    /// Unsubscription confirmation
    Unsubscribe,
    /// Anything else the transport surfaces
    Other(String),
}

/// One frame received from the traffic channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Frame kind; only `Message` frames carry traffic
    pub kind: MessageKind,
    /// Channel the frame arrived on
    pub channel: String,
    /// Raw payload bytes
    pub payload: Vec<u8>,
}

impl InboundMessage {
    /// A published payload on `channel`.
    pub fn message(channel: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: MessageKind::Message,
            channel: channel.into(),
            payload: payload.into(),
        }
    }
}

/// Port for a live subscription to the traffic channel.
///
/// `next_message` is the consumer's only suspension point and waits
/// indefinitely. `None` means the subscription is gone for good.
#[async_trait]
pub trait TrafficSource: Send {
    /// Name of the subscribed channel.
    fn channel(&self) -> &str;

    /// Wait for the next frame.
    async fn next_message(&mut self) -> Option<InboundMessage>;
}
