//! Inbound message from a channel: delivered to the gateway for dialogue handling.

use crate::dialogue::InboundEvent;

/// A dialogue event tagged with the channel that should carry the reply.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: String,
    pub event: InboundEvent,
}
