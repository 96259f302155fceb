//! In-memory collaborator doubles shared by the command tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cadenza_core::{
    ApiResult, ChatApi, CommandContext, ControlBus, InboundMessage, PublishOptions, PublishResult,
    VoiceState, VoiceStates,
};
use parking_lot::Mutex;
use serde_json::Value;

/// One captured publish call.
#[derive(Debug, Clone)]
pub(crate) struct Published {
    pub topic: String,
    pub payload: Value,
    pub options: PublishOptions,
}

/// Recording implementations of all three bridge ports.
#[derive(Default)]
pub(crate) struct TestPorts {
    replies: Arc<Mutex<Vec<(String, String)>>>,
    published: Arc<Mutex<Vec<Published>>>,
    voice: Arc<Mutex<HashMap<String, String>>>,
}

impl TestPorts {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Places `user_id` into `channel_id` in guild `g1`.
    pub(crate) fn place_user(&self, user_id: &str, channel_id: &str) {
        self.voice
            .lock()
            .insert(user_id.to_string(), channel_id.to_string());
    }

    /// Builds a [`CommandContext`] backed by these ports, with bot id `bot`.
    pub(crate) fn context(&self) -> CommandContext {
        CommandContext {
            api: Arc::new(RecordingApi {
                replies: Arc::clone(&self.replies),
            }),
            bus: Arc::new(RecordingBus {
                published: Arc::clone(&self.published),
            }),
            voice: Arc::new(MapVoice {
                voice: Arc::clone(&self.voice),
            }),
            bot_id: "bot".into(),
        }
    }

    /// Contents of every reply sent so far.
    pub(crate) fn replies(&self) -> Vec<String> {
        self.replies
            .lock()
            .iter()
            .map(|(_, content)| content.clone())
            .collect()
    }

    /// Every publish call so far.
    pub(crate) fn published(&self) -> Vec<Published> {
        self.published.lock().clone()
    }
}

struct RecordingApi {
    replies: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl ChatApi for RecordingApi {
    async fn create_message(&self, channel_id: &str, content: &str) -> ApiResult<()> {
        self.replies
            .lock()
            .push((channel_id.to_string(), content.to_string()));
        Ok(())
    }
}

struct RecordingBus {
    published: Arc<Mutex<Vec<Published>>>,
}

#[async_trait]
impl ControlBus for RecordingBus {
    async fn publish(
        &self,
        topic: &str,
        payload: Value,
        options: PublishOptions,
    ) -> PublishResult<()> {
        self.published.lock().push(Published {
            topic: topic.to_string(),
            payload,
            options,
        });
        Ok(())
    }
}

struct MapVoice {
    voice: Arc<Mutex<HashMap<String, String>>>,
}

#[async_trait]
impl VoiceStates for MapVoice {
    async fn get(&self, _guild_id: &str, user_id: &str) -> Option<VoiceState> {
        self.voice
            .lock()
            .get(user_id)
            .map(|channel| VoiceState::in_channel(channel.clone()))
    }
}

/// The message most command tests dispatch.
pub(crate) fn message() -> InboundMessage {
    InboundMessage::new("g1", "c1", "u1", "=pause")
}
