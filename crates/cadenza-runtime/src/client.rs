//! Client assembly and the inbound run loop.
//!
//! The [`Client`] owns the loaded [`Registry`], the [`Dispatcher`], and the
//! run loop that drains the broker consumer. Deliveries are routed by
//! signal name: the configured message event is deserialized into an
//! [`InboundMessage`] and dispatched as a chat message; everything else is
//! dispatched as a bus signal. Each inbound item becomes its own task, so a
//! slow command never holds up the loop.

use std::sync::Arc;
use std::time::Duration;

use cadenza_core::{
    BoxedChatApi, BoxedCommand, BoxedControlBus, BoxedEvent, BoxedVoiceStates, CommandContext,
    Dispatcher, ErrorSignal, InboundMessage, Registry, error_channel,
};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::broker::{BrokerConsumer, Delivery};
use crate::config::CadenzaConfig;
use crate::error::ClientResult;

/// Builder for a [`Client`].
pub struct ClientBuilder {
    id: String,
    prefix: String,
    message_event: String,
    sweep_interval: Duration,
    api: BoxedChatApi,
    bus: BoxedControlBus,
    voice: BoxedVoiceStates,
    commands: Vec<BoxedCommand>,
    events: Vec<BoxedEvent>,
}

impl ClientBuilder {
    /// Creates a builder with default prefix and routing settings.
    ///
    /// The three bridge ports are required up front; everything else has a
    /// default.
    pub fn new(
        id: impl Into<String>,
        api: BoxedChatApi,
        bus: BoxedControlBus,
        voice: BoxedVoiceStates,
    ) -> Self {
        Self {
            id: id.into(),
            prefix: "=".to_string(),
            message_event: "MESSAGE_CREATE".to_string(),
            sweep_interval: Duration::from_secs(60),
            api,
            bus,
            voice,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Applies client, routing, and throttle settings from a loaded
    /// configuration.
    pub fn with_config(mut self, config: &CadenzaConfig) -> Self {
        self.id = config.client.id.clone();
        self.prefix = config.client.prefix.clone();
        self.message_event = config.client.message_event.clone();
        self.sweep_interval = Duration::from_secs(config.throttle.sweep_interval_secs);
        self
    }

    /// Sets the command prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the broker event name that carries chat messages.
    pub fn message_event(mut self, event: impl Into<String>) -> Self {
        self.message_event = event.into();
        self
    }

    /// Sets the throttle sweep interval.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Queues a command for registration.
    pub fn command(mut self, command: BoxedCommand) -> Self {
        self.commands.push(command);
        self
    }

    /// Queues a batch of commands for registration.
    pub fn commands(mut self, commands: impl IntoIterator<Item = BoxedCommand>) -> Self {
        self.commands.extend(commands);
        self
    }

    /// Queues an event handler for registration.
    pub fn event(mut self, event: BoxedEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Loads the registry and assembles the client.
    ///
    /// A naming collision among the queued commands or events aborts the
    /// build; this is the startup-fatal path of the error taxonomy.
    pub fn build(self) -> ClientResult<Client> {
        let mut registry = Registry::new();
        for command in self.commands {
            registry.register(command)?;
        }
        for event in self.events {
            registry.register_event(event)?;
        }

        info!(
            commands = registry.command_count(),
            events = registry.event_count(),
            "registry loaded"
        );

        let registry = Arc::new(registry);
        let (errors, error_rx) = error_channel();
        let ctx = CommandContext {
            api: self.api,
            bus: self.bus,
            voice: self.voice,
            bot_id: self.id,
        };

        Ok(Client {
            dispatcher: Arc::new(Dispatcher::new(
                Arc::clone(&registry),
                ctx,
                self.prefix,
                errors,
            )),
            registry,
            message_event: self.message_event,
            sweep_interval: self.sweep_interval,
            shutdown: CancellationToken::new(),
            error_rx: Mutex::new(Some(error_rx)),
        })
    }
}

/// The assembled bot client.
pub struct Client {
    dispatcher: Arc<Dispatcher>,
    registry: Arc<Registry>,
    message_event: String,
    sweep_interval: Duration,
    shutdown: CancellationToken,
    error_rx: Mutex<Option<mpsc::UnboundedReceiver<ErrorSignal>>>,
}

impl Client {
    /// Starts a builder over the required bridge ports.
    pub fn builder(
        id: impl Into<String>,
        api: BoxedChatApi,
        bus: BoxedControlBus,
        voice: BoxedVoiceStates,
    ) -> ClientBuilder {
        ClientBuilder::new(id, api, bus, voice)
    }

    /// The loaded registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The dispatcher, for embedders that feed it directly.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// A token that observers can use to watch for shutdown.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Requests a graceful stop of the run loop.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Cancels the run loop when the process receives ctrl-c.
    pub fn shutdown_on_ctrl_c(&self) {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, shutting down");
                shutdown.cancel();
            }
        });
    }

    /// Takes the process-wide error signal receiver.
    ///
    /// Call before [`login`](Self::login) to handle handler failures
    /// yourself. If the receiver is still here when the loop starts, the
    /// client drains it into `tracing::error!`.
    pub fn take_error_signals(&self) -> Option<mpsc::UnboundedReceiver<ErrorSignal>> {
        self.error_rx.lock().take()
    }

    /// Connects, subscribes, and runs the dispatch loop until shutdown or
    /// until the consumer reports a closed connection.
    pub async fn login<C: BrokerConsumer>(
        &self,
        mut consumer: C,
        url: &str,
        events: &[String],
    ) -> ClientResult<()> {
        consumer.connect(url).await?;
        consumer.subscribe(events).await?;
        info!(%url, subscriptions = events.len(), "logged in to gateway broker");

        if let Some(mut rx) = self.take_error_signals() {
            tokio::spawn(async move {
                while let Some(signal) = rx.recv().await {
                    error!(
                        source = signal.source(),
                        error = %signal.error(),
                        "handler failure"
                    );
                }
            });
        }

        self.spawn_throttle_sweeper();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                delivery = consumer.recv() => {
                    let Some(delivery) = delivery else {
                        warn!("broker consumer closed, stopping run loop");
                        break;
                    };
                    self.route(delivery);
                }
            }
        }

        Ok(())
    }

    /// Spawns the periodic sweep that reclaims expired throttle windows.
    fn spawn_throttle_sweeper(&self) {
        let registry = Arc::clone(&self.registry);
        let shutdown = self.shutdown.clone();
        let interval = self.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately and sweeps nothing.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => registry.sweep_throttles(),
                }
            }
        });
    }

    /// Routes one delivery into the dispatcher as its own task.
    fn route(&self, delivery: Delivery) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let Delivery { event, payload } = delivery;

        if event == self.message_event {
            match serde_json::from_value::<InboundMessage>(payload) {
                Ok(message) => {
                    tokio::spawn(async move {
                        dispatcher.handle_message(message).await;
                    });
                }
                Err(parse_error) => {
                    warn!(%parse_error, "skipping undeserializable chat message payload");
                }
            }
        } else {
            tokio::spawn(async move {
                dispatcher.handle_signal(&event, payload).await;
            });
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("message_event", &self.message_event)
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cadenza_core::{
        ApiResult, ChatApi, Command, ControlBus, Event, HandlerResult, PublishOptions,
        PublishResult, VoiceState, VoiceStates,
    };
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullApi;

    #[async_trait]
    impl ChatApi for NullApi {
        async fn create_message(&self, _channel_id: &str, _content: &str) -> ApiResult<()> {
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

    struct CountingCommand {
        runs: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Command for CountingCommand {
        fn name(&self) -> &str {
            "count"
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

    struct CountingEvent {
        runs: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Event for CountingEvent {
        fn name(&self) -> &str {
            "READY"
        }

        async fn run(&self, _payload: &Value) -> HandlerResult {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Scripted consumer that yields queued deliveries then closes.
    struct ScriptedConsumer {
        deliveries: VecDeque<Delivery>,
    }

    #[async_trait]
    impl BrokerConsumer for ScriptedConsumer {
        async fn connect(&mut self, _url: &str) -> crate::broker::BrokerResult<()> {
            Ok(())
        }

        async fn subscribe(&mut self, _events: &[String]) -> crate::broker::BrokerResult<()> {
            Ok(())
        }

        async fn recv(&mut self) -> Option<Delivery> {
            self.deliveries.pop_front()
        }
    }

    fn client(
        command_runs: &Arc<AtomicUsize>,
        event_runs: &Arc<AtomicUsize>,
    ) -> Client {
        Client::builder("bot", Arc::new(NullApi), Arc::new(NullBus), Arc::new(NoVoice))
            .command(Arc::new(CountingCommand {
                runs: Arc::clone(command_runs),
            }))
            .event(Arc::new(CountingEvent {
                runs: Arc::clone(event_runs),
            }))
            .build()
            .unwrap()
    }

    async fn wait_for(counter: &Arc<AtomicUsize>, expected: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while counter.load(Ordering::SeqCst) < expected {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("dispatch tasks should complete");
    }

    #[tokio::test]
    async fn message_deliveries_reach_the_command() {
        let command_runs = Arc::new(AtomicUsize::new(0));
        let event_runs = Arc::new(AtomicUsize::new(0));
        let client = client(&command_runs, &event_runs);

        let consumer = ScriptedConsumer {
            deliveries: VecDeque::from(vec![
                Delivery::new(
                    "MESSAGE_CREATE",
                    json!({
                        "guild_id": "g1",
                        "channel_id": "c1",
                        "author_id": "u1",
                        "content": "=count"
                    }),
                ),
                Delivery::new("READY", json!({"session": "s1"})),
            ]),
        };

        client
            .login(consumer, "localhost", &["MESSAGE_CREATE".to_string()])
            .await
            .unwrap();

        wait_for(&command_runs, 1).await;
        wait_for(&event_runs, 1).await;
    }

    #[tokio::test]
    async fn undeserializable_message_payload_is_skipped() {
        let command_runs = Arc::new(AtomicUsize::new(0));
        let event_runs = Arc::new(AtomicUsize::new(0));
        let client = client(&command_runs, &event_runs);

        let consumer = ScriptedConsumer {
            deliveries: VecDeque::from(vec![
                Delivery::new("MESSAGE_CREATE", json!({"not": "a message"})),
                Delivery::new(
                    "MESSAGE_CREATE",
                    json!({
                        "guild_id": "g1",
                        "channel_id": "c1",
                        "author_id": "u1",
                        "content": "=count"
                    }),
                ),
            ]),
        };

        client
            .login(consumer, "localhost", &["MESSAGE_CREATE".to_string()])
            .await
            .unwrap();

        // The loop survived the broken payload and processed the next one.
        wait_for(&command_runs, 1).await;
    }

    #[tokio::test]
    async fn duplicate_commands_fail_the_build() {
        let runs = Arc::new(AtomicUsize::new(0));
        let result = Client::builder("bot", Arc::new(NullApi), Arc::new(NullBus), Arc::new(NoVoice))
            .command(Arc::new(CountingCommand {
                runs: Arc::clone(&runs),
            }))
            .command(Arc::new(CountingCommand {
                runs: Arc::clone(&runs),
            }))
            .build();

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn shutdown_ends_a_blocked_loop() {
        struct PendingConsumer;

        #[async_trait]
        impl BrokerConsumer for PendingConsumer {
            async fn connect(&mut self, _url: &str) -> crate::broker::BrokerResult<()> {
                Ok(())
            }

            async fn subscribe(&mut self, _events: &[String]) -> crate::broker::BrokerResult<()> {
                Ok(())
            }

            async fn recv(&mut self) -> Option<Delivery> {
                // Never yields; simulates a quiet broker.
                std::future::pending().await
            }
        }

        let command_runs = Arc::new(AtomicUsize::new(0));
        let event_runs = Arc::new(AtomicUsize::new(0));
        let client = Arc::new(client(&command_runs, &event_runs));

        let handle = {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .login(PendingConsumer, "localhost", &[])
                    .await
            })
        };

        client.shutdown();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("login should return after shutdown")
            .unwrap()
            .unwrap();
    }
}
