//! `TrafficSource` over a Redis pub/sub connection.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use redis::aio::PubSub;

use crate::domain::ports::{InboundMessage, MessageKind, TrafficSource};

/// Live Redis subscription to the traffic channel.
///
/// The stream ends when the pub/sub connection drops; there is no
/// reconnect here, the process is expected to be restarted.
pub struct RedisTrafficSource {
    channel: String,
    messages: BoxStream<'static, redis::Msg>,
}

impl RedisTrafficSource {
    pub(super) fn new(channel: &str, pubsub: PubSub) -> Self {
        Self {
            channel: channel.to_string(),
            messages: pubsub.into_on_message().boxed(),
        }
    }
}

fn to_inbound(msg: &redis::Msg) -> InboundMessage {
    let kind = if msg.from_pattern() {
        MessageKind::Other("pmessage".to_string())
    } else {
        MessageKind::Message
    };

    InboundMessage {
        kind,
        channel: msg.get_channel_name().to_string(),
        payload: msg.get_payload_bytes().to_vec(),
    }
}

#[async_trait]
impl TrafficSource for RedisTrafficSource {
    fn channel(&self) -> &str {
        &self.channel
    }

    async fn next_message(&mut self) -> Option<InboundMessage> {
        self.messages.next().await.map(|msg| to_inbound(&msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::Value;

    fn frame(parts: &[&[u8]]) -> redis::Msg {
        let items = parts
            .iter()
            .map(|part| Value::BulkString(part.to_vec()))
            .collect();
        redis::Msg::from_owned_value(Value::Array(items)).unwrap()
    }

    #[test]
    fn test_message_frame_is_traffic() {
        let msg = frame(&[b"message", b"chaos:traffic", b"{\"status\": 200}"]);
        let inbound = to_inbound(&msg);

        assert_eq!(inbound.kind, MessageKind::Message);
        assert_eq!(inbound.channel, "chaos:traffic");
        assert_eq!(inbound.payload, b"{\"status\": 200}");
    }

    #[test]
    fn test_pattern_frame_is_not_traffic() {
        let msg = frame(&[b"pmessage", b"chaos:*", b"chaos:traffic", b"{}"]);
        let inbound = to_inbound(&msg);

        assert_eq!(inbound.kind, MessageKind::Other("pmessage".to_string()));
        assert_eq!(inbound.channel, "chaos:traffic");
        assert_eq!(inbound.payload, b"{}");
    }

    #[test]
    fn test_payload_bytes_pass_through_untouched() {
        let msg = frame(&[b"message", b"chaos:traffic", &[0xff, 0xfe]]);
        assert_eq!(to_inbound(&msg).payload, vec![0xff, 0xfe]);
    }
}
