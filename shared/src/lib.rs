mod ring_buffer;

pub use ring_buffer::RingBuffer;

use serde::{Deserialize, Serialize};

/// Tag carried by every sensor frame on the feed.
pub const TTN_DATA_TYPE: &str = "ttn_data";

/// Greeting sent to each WebSocket client right after the upgrade.
pub const WELCOME_TEXT: &str = "Welcome to the WebSocket server!";

/// Message broadcast to dashboard clients:
///   { "type": "ttn_data", "payload": { "transport": { "data": [...] } } }
///
/// `payload` is forwarded verbatim from the uplink's decoded payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    #[serde(rename = "type")]
    pub ty: String,
    pub payload: serde_json::Value,
}

impl FeedMessage {
    pub fn ttn_data(payload: serde_json::Value) -> Self {
        Self {
            ty: TTN_DATA_TYPE.to_string(),
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomeMsg {
    pub message: String,
}

impl Default for WelcomeMsg {
    fn default() -> Self {
        Self {
            message: WELCOME_TEXT.to_string(),
        }
    }
}
