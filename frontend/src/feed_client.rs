// frontend/src/feed_client.rs
//
// Native WebSocket feed client: connect, hand every text frame to a
// callback, reconnect after a pause when the socket drops.

use crate::config::ClientConfig;
use futures_util::StreamExt;
use thiserror::Error;
use tokio_tungstenite::tungstenite::{self, Message};

#[derive(Debug, Error)]
pub enum FeedClientError {
    #[error("connect failed: {0}")]
    Connect(#[source] tungstenite::Error),

    #[error("read error: {0}")]
    Read(#[source] tungstenite::Error),

    #[error("feed closed by server")]
    Closed,
}

/// One connection lifetime. Always ends in an error: the feed never
/// finishes on its own.
pub async fn connect_once<F>(config: &ClientConfig, on_text: &mut F) -> Result<(), FeedClientError>
where
    F: FnMut(&str),
{
    tracing::info!(url=%config.ws_url, "connecting to feed");
    let (ws_stream, _) = tokio_tungstenite::connect_async(config.ws_url.as_str())
        .await
        .map_err(FeedClientError::Connect)?;
    tracing::info!("WebSocket connected");

    let (_write, mut read) = ws_stream.split();

    while let Some(item) = read.next().await {
        match item.map_err(FeedClientError::Read)? {
            Message::Text(text) => on_text(text.as_str()),
            Message::Close(frame) => {
                tracing::debug!(?frame, "close frame received");
                break;
            }
            _ => {}
        }
    }

    tracing::info!("WebSocket disconnected");
    Err(FeedClientError::Closed)
}

/// Reconnect loop. Runs until the surrounding task is dropped.
pub async fn supervise<F>(config: &ClientConfig, mut on_text: F)
where
    F: FnMut(&str),
{
    loop {
        if let Err(err) = connect_once(config, &mut on_text).await {
            match err {
                FeedClientError::Closed => tracing::info!("feed closed, reconnecting"),
                other => tracing::warn!(error=%other, "feed connection failed"),
            }
        }
        tokio::time::sleep(config.reconnect).await;
    }
}
