//! The executable command contract.
//!
//! A command is a named, alias-addressable unit of behavior invoked from
//! chat. The contract splits into two traits:
//!
//! - [`Command`]: a top-level command. May own subcommands and may carry a
//!   [`ThrottleGate`]; its provided [`execute`](Command::execute) wraps the
//!   abstract [`run`](Command::run) with the throttle check.
//! - [`SubCommand`]: a child-only unit owned by exactly one command, with no
//!   throttling of its own and a name-based back-reference to its parent.
//!
//! Failures raised inside `run` propagate to the dispatcher. The command
//! contract only short-circuits throttle rejections, which are a normal
//! outcome rather than an error.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::bridge::{BoxedChatApi, BoxedControlBus, BoxedVoiceStates};
use crate::error::HandlerResult;
use crate::message::InboundMessage;
use crate::throttle::{ThrottleDecision, ThrottleGate};

/// Capabilities handed to every command invocation.
///
/// Constructed once at startup and shared by reference. Commands never reach
/// for ambient globals; everything they may touch is in here.
#[derive(Clone)]
pub struct CommandContext {
    /// REST reply capability.
    pub api: BoxedChatApi,
    /// Publish path to the remote audio worker.
    pub bus: BoxedControlBus,
    /// Read-only voice-channel membership cache.
    pub voice: BoxedVoiceStates,
    /// The bot's own user id, used by voice-channel policy checks.
    pub bot_id: String,
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("bot_id", &self.bot_id)
            .finish()
    }
}

/// A top-level command.
///
/// Identity methods come with defaults so a minimal command only provides
/// `name` and `run`. Throttling is opt-in: a command that wants it owns a
/// [`ThrottleGate`] and returns it from [`throttle`](Self::throttle).
#[async_trait]
pub trait Command: Send + Sync {
    /// Unique command name; the primary dispatch token.
    fn name(&self) -> &str;

    /// Alternative dispatch tokens. Must be unique across the registry.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Human-readable description.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Group this command is listed under.
    fn group(&self) -> &str {
        "general"
    }

    /// Whether the default prefix-and-token handling applies to this
    /// command.
    fn default_handling(&self) -> bool {
        true
    }

    /// Regex triggers that can match this command outside the prefixed
    /// form. Metadata for now; the dispatcher resolves prefixed tokens
    /// only.
    fn patterns(&self) -> Option<&[Regex]> {
        None
    }

    /// The throttle gate guarding this command, if it is throttled.
    fn throttle(&self) -> Option<&ThrottleGate> {
        None
    }

    /// Subcommands owned by this command.
    fn sub_commands(&self) -> &[Arc<dyn SubCommand>] {
        &[]
    }

    /// The command body. Implementations reply and publish through `ctx`.
    async fn run(
        &self,
        ctx: &CommandContext,
        message: &InboundMessage,
        args: &str,
    ) -> HandlerResult;

    /// Runs the throttle check, then the command.
    ///
    /// A rejected check replies with the remaining window time, to one
    /// decimal, and returns without invoking [`run`](Self::run). Everything
    /// `run` returns, errors included, passes through untouched.
    async fn execute(
        &self,
        ctx: &CommandContext,
        message: &InboundMessage,
        args: &str,
    ) -> HandlerResult {
        if let Some(gate) = self.throttle()
            && let ThrottleDecision::Rejected { remaining } =
                gate.check_and_consume(&message.author_id)
        {
            debug!(command = self.name(), user = %message.author_id, "throttled");
            ctx.api
                .create_message(
                    &message.channel_id,
                    &format!(
                        "You may not use this command again for another {:.1} seconds.",
                        remaining.as_secs_f64()
                    ),
                )
                .await?;
            return Ok(());
        }

        self.run(ctx, message, args).await
    }
}

/// A child command, owned by exactly one [`Command`].
///
/// Subcommands carry no throttle gate. Their `parent` is a registry lookup
/// key, not an ownership edge; nothing ever traverses it to decide a
/// lifetime.
#[async_trait]
pub trait SubCommand: Send + Sync {
    /// Subcommand name; matched against the token after the parent's.
    fn name(&self) -> &str;

    /// Alternative tokens. Must be unique within the parent.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Human-readable description.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Name of the owning command.
    fn parent(&self) -> &str;

    /// The subcommand body.
    async fn run(
        &self,
        ctx: &CommandContext,
        message: &InboundMessage,
        args: &str,
    ) -> HandlerResult;
}

/// A shared command handle.
pub type BoxedCommand = Arc<dyn Command>;

/// A shared subcommand handle.
pub type BoxedSubCommand = Arc<dyn SubCommand>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{
        ApiResult, ChatApi, ControlBus, PublishOptions, PublishResult, VoiceStates,
    };
    use crate::message::VoiceState;
    use crate::throttle::ThrottlePolicy;
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingApi {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ChatApi for RecordingApi {
        async fn create_message(&self, channel_id: &str, content: &str) -> ApiResult<()> {
            self.sent
                .lock()
                .push((channel_id.to_string(), content.to_string()));
            Ok(())
        }
    }

    struct NullBus;

    #[async_trait]
    impl ControlBus for NullBus {
        async fn publish(
            &self,
            _topic: &str,
            _payload: Value,
            _options: PublishOptions,
        ) -> PublishResult<()> {
            Ok(())
        }
    }

    struct NoVoice;

    #[async_trait]
    impl VoiceStates for NoVoice {
        async fn get(&self, _guild_id: &str, _user_id: &str) -> Option<VoiceState> {
            None
        }
    }

    fn test_context(api: Arc<RecordingApi>) -> CommandContext {
        CommandContext {
            api,
            bus: Arc::new(NullBus),
            voice: Arc::new(NoVoice),
            bot_id: "bot".into(),
        }
    }

    struct CountingCommand {
        gate: Option<ThrottleGate>,
        runs: AtomicUsize,
    }

    impl CountingCommand {
        fn throttled(usages: u32, secs: u64) -> Self {
            Self {
                gate: Some(ThrottleGate::new(ThrottlePolicy::per_seconds(usages, secs))),
                runs: AtomicUsize::new(0),
            }
        }

        fn unthrottled() -> Self {
            Self {
                gate: None,
                runs: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Command for CountingCommand {
        fn name(&self) -> &str {
            "count"
        }

        fn throttle(&self) -> Option<&ThrottleGate> {
            self.gate.as_ref()
        }

        async fn run(
            &self,
            _ctx: &CommandContext,
            _message: &InboundMessage,
            _args: &str,
        ) -> HandlerResult {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn message() -> InboundMessage {
        InboundMessage::new("g1", "c1", "u1", "=count")
    }

    #[tokio::test]
    async fn unthrottled_command_always_runs() {
        let api = Arc::new(RecordingApi::default());
        let ctx = test_context(Arc::clone(&api));
        let command = CountingCommand::unthrottled();

        for _ in 0..5 {
            command.execute(&ctx, &message(), "").await.unwrap();
        }

        assert_eq!(command.runs.load(Ordering::SeqCst), 5);
        assert!(api.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn rejection_replies_and_skips_run() {
        let api = Arc::new(RecordingApi::default());
        let ctx = test_context(Arc::clone(&api));
        let command = CountingCommand::throttled(1, 3);

        command.execute(&ctx, &message(), "").await.unwrap();
        command.execute(&ctx, &message(), "").await.unwrap();

        assert_eq!(command.runs.load(Ordering::SeqCst), 1);

        let sent = api.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "c1");
        assert!(
            sent[0]
                .1
                .starts_with("You may not use this command again for another"),
            "unexpected reply: {}",
            sent[0].1
        );
        assert!(sent[0].1.ends_with("seconds."));
    }

    #[tokio::test]
    async fn rejection_message_has_one_decimal() {
        let api = Arc::new(RecordingApi::default());
        let ctx = test_context(Arc::clone(&api));
        let command = CountingCommand::throttled(1, 3);

        command.execute(&ctx, &message(), "").await.unwrap();
        command.execute(&ctx, &message(), "").await.unwrap();

        let sent = api.sent.lock();
        let reply = &sent[0].1;
        // "... another {remaining:.1} seconds." with a fresh window, so the
        // countdown reads 3.0 or a hair under.
        let number = reply
            .strip_prefix("You may not use this command again for another ")
            .and_then(|rest| rest.strip_suffix(" seconds."))
            .expect("reply should match the countdown template");
        let value: f64 = number.parse().expect("countdown should be numeric");
        assert!(number.contains('.') && number.split('.').nth(1).unwrap().len() == 1);
        assert!(value > 0.0 && value <= 3.0);
    }

    #[test]
    fn rejected_remaining_formats_to_one_decimal() {
        let remaining = Duration::from_millis(2040);
        let formatted = format!("{:.1}", remaining.as_secs_f64());
        assert_eq!(formatted, "2.0");
    }
}
