//! Jukebox Demo
//!
//! Wires the full Cadenza stack against in-memory collaborators, then feeds
//! a short scripted session through the run loop: a ready signal, a few
//! playback commands, a throttle rejection, and a voice-policy denial.
//!
//! Replies and control intents land in the log instead of a real platform,
//! so the demo runs with no broker or REST credentials.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package jukebox
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use cadenza::core::{ApiResult, PublishResult};
use cadenza::prelude::*;
use serde_json::{Value, json};
use tracing::info;

// ============================================================================
// In-memory collaborators
// ============================================================================

/// REST stand-in that logs every reply.
struct LoggingApi;

#[async_trait]
impl ChatApi for LoggingApi {
    async fn create_message(&self, channel_id: &str, content: &str) -> ApiResult<()> {
        info!(channel = channel_id, "reply: {content}");
        Ok(())
    }
}

/// Broker publisher stand-in that logs every control intent.
struct LoggingBus;

#[async_trait]
impl ControlBus for LoggingBus {
    async fn publish(
        &self,
        topic: &str,
        payload: Value,
        options: PublishOptions,
    ) -> PublishResult<()> {
        info!(%topic, %payload, ?options, "control intent submitted");
        Ok(())
    }
}

/// Fixed voice-state table: the caller and the bot share a channel.
struct StaticVoice {
    states: HashMap<String, VoiceState>,
}

impl StaticVoice {
    fn new() -> Self {
        let mut states = HashMap::new();
        states.insert("user-1".to_string(), VoiceState::in_channel("voice-main"));
        states.insert("jukebox".to_string(), VoiceState::in_channel("voice-main"));
        Self { states }
    }
}

#[async_trait]
impl VoiceStates for StaticVoice {
    async fn get(&self, _guild_id: &str, user_id: &str) -> Option<VoiceState> {
        self.states.get(user_id).cloned()
    }
}

/// Consumer that replays a scripted set of deliveries, then closes.
struct ScriptedConsumer {
    deliveries: VecDeque<Delivery>,
}

#[async_trait]
impl BrokerConsumer for ScriptedConsumer {
    async fn connect(&mut self, url: &str) -> cadenza::runtime::BrokerResult<()> {
        info!(%url, "scripted consumer connected");
        Ok(())
    }

    async fn subscribe(&mut self, events: &[String]) -> cadenza::runtime::BrokerResult<()> {
        info!(?events, "scripted consumer subscribed");
        Ok(())
    }

    async fn recv(&mut self) -> Option<Delivery> {
        let next = self.deliveries.pop_front();
        if next.is_some() {
            // Give in-flight dispatch tasks a moment, purely for log
            // readability.
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        next
    }
}

// ============================================================================
// Demo event handler
// ============================================================================

/// Logs the gateway ready signal.
struct Ready;

#[async_trait]
impl Event for Ready {
    fn name(&self) -> &str {
        "READY"
    }

    async fn run(&self, payload: &Value) -> HandlerResult {
        info!(session = %payload["session_id"], "gateway ready");
        Ok(())
    }
}

// ============================================================================
// Main
// ============================================================================

fn chat(content: &str) -> Delivery {
    Delivery::new(
        "MESSAGE_CREATE",
        json!({
            "guild_id": "guild-1",
            "channel_id": "general",
            "author_id": "user-1",
            "content": content,
        }),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    cadenza::runtime::logging::LoggingBuilder::new()
        .with_level(tracing::Level::DEBUG)
        .init();

    let client = Client::builder(
        "jukebox",
        Arc::new(LoggingApi),
        Arc::new(LoggingBus),
        Arc::new(StaticVoice::new()),
    )
    .prefix("=")
    .commands(cadenza::commands::commands())
    .event(Arc::new(Ready))
    .build()?;

    let consumer = ScriptedConsumer {
        deliveries: VecDeque::from(vec![
            Delivery::new("READY", json!({"session_id": "demo-session"})),
            chat("=ping"),
            chat("=pause"),
            chat("=pause"),
            // Third pause inside the window: throttled.
            chat("=pause"),
            chat("=volume up"),
            // Plain chatter, silently ignored.
            chat("just vibing"),
            chat("=resume"),
        ]),
    };

    client
        .login(consumer, "localhost", &["MESSAGE_CREATE".to_string(), "READY".to_string()])
        .await?;

    // Let the last spawned dispatch tasks finish logging.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    info!("scripted session complete");
    Ok(())
}
