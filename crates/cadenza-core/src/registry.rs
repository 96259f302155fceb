//! Name and alias index over commands and events.
//!
//! The registry is populated once at startup and read-only afterwards, so
//! it is shared as a plain `Arc<Registry>` with no interior locking. There
//! is no removal operation; nothing needs one during normal operation.
//!
//! Commands and events live in separate namespaces. An event may share a
//! name with a command without conflict, but within the command namespace
//! names and aliases draw from one pool: an alias colliding with another
//! command's name is just as fatal as two commands sharing a name.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::command::BoxedCommand;
use crate::error::{RegistryError, RegistryResult};
use crate::event::BoxedEvent;

/// The command and event index.
#[derive(Default)]
pub struct Registry {
    commands: HashMap<String, BoxedCommand>,
    /// Alias token to owning command name.
    aliases: HashMap<String, String>,
    events: HashMap<String, BoxedEvent>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under its name and every alias.
    ///
    /// A collision with anything previously registered aborts the load and
    /// leaves the registry unchanged. Subcommand tokens are validated here
    /// too, so a broken command set fails at startup rather than at first
    /// dispatch.
    pub fn register(&mut self, command: BoxedCommand) -> RegistryResult<()> {
        let name = command.name().to_string();
        if self.commands.contains_key(&name) || self.aliases.contains_key(&name) {
            return Err(RegistryError::DuplicateCommand { name });
        }

        // Validate every alias before touching the indexes.
        let mut pending: HashSet<&str> = HashSet::new();
        for alias in command.aliases() {
            if *alias == name
                || self.commands.contains_key(*alias)
                || self.aliases.contains_key(*alias)
                || !pending.insert(*alias)
            {
                return Err(RegistryError::DuplicateAlias {
                    name,
                    alias: alias.to_string(),
                });
            }
        }

        check_sub_command_tokens(&command)?;

        for alias in command.aliases() {
            self.aliases.insert(alias.to_string(), name.clone());
        }
        debug!(command = %name, group = command.group(), "registered command");
        self.commands.insert(name, command);
        Ok(())
    }

    /// Registers an event handler under its signal name.
    pub fn register_event(&mut self, event: BoxedEvent) -> RegistryResult<()> {
        let name = event.name().to_string();
        if self.events.contains_key(&name) {
            return Err(RegistryError::DuplicateEvent { name });
        }
        debug!(event = %name, enabled = event.enabled(), "registered event");
        self.events.insert(name, event);
        Ok(())
    }

    /// Resolves a dispatch token: exact name match first, then alias.
    ///
    /// Matching is case-sensitive. Chat commands are literal prefixed
    /// tokens; the dispatcher does not fold case before resolving.
    pub fn resolve(&self, token: &str) -> Option<&BoxedCommand> {
        self.commands.get(token).or_else(|| {
            self.aliases
                .get(token)
                .and_then(|name| self.commands.get(name))
        })
    }

    /// Resolves a bus signal name. Events are not alias-addressable.
    pub fn resolve_event(&self, name: &str) -> Option<&BoxedEvent> {
        self.events.get(name)
    }

    /// Iterates over all registered commands.
    pub fn commands(&self) -> impl Iterator<Item = &BoxedCommand> {
        self.commands.values()
    }

    /// Number of registered commands.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Number of registered events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Sweeps expired throttle windows across every registered command.
    ///
    /// Cheap when nothing is throttled; the runtime calls this on an
    /// interval.
    pub fn sweep_throttles(&self) {
        for command in self.commands.values() {
            if let Some(gate) = command.throttle() {
                gate.purge_expired();
            }
        }
    }
}

/// Rejects duplicate names or aliases among a command's subcommands.
fn check_sub_command_tokens(command: &BoxedCommand) -> RegistryResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for sub in command.sub_commands() {
        if !seen.insert(sub.name()) {
            return Err(RegistryError::DuplicateSubCommand {
                parent: command.name().to_string(),
                token: sub.name().to_string(),
            });
        }
        for alias in sub.aliases() {
            if !seen.insert(*alias) {
                return Err(RegistryError::DuplicateSubCommand {
                    parent: command.name().to_string(),
                    token: alias.to_string(),
                });
            }
        }
    }
    Ok(())
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.commands.len())
            .field("aliases", &self.aliases.len())
            .field("events", &self.events.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandContext, SubCommand};
    use crate::error::HandlerResult;
    use crate::event::Event;
    use crate::message::InboundMessage;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    struct StubCommand {
        name: &'static str,
        aliases: Vec<&'static str>,
        subs: Vec<Arc<dyn SubCommand>>,
    }

    impl StubCommand {
        fn new(name: &'static str, aliases: &[&'static str]) -> Arc<Self> {
            Arc::new(Self {
                name,
                aliases: aliases.to_vec(),
                subs: Vec::new(),
            })
        }
    }

    #[async_trait]
    impl Command for StubCommand {
        fn name(&self) -> &str {
            self.name
        }

        fn aliases(&self) -> &[&str] {
            &self.aliases
        }

        fn sub_commands(&self) -> &[Arc<dyn SubCommand>] {
            &self.subs
        }

        async fn run(
            &self,
            _ctx: &CommandContext,
            _message: &InboundMessage,
            _args: &str,
        ) -> HandlerResult {
            Ok(())
        }
    }

    struct StubSub {
        name: &'static str,
    }

    #[async_trait]
    impl SubCommand for StubSub {
        fn name(&self) -> &str {
            self.name
        }

        fn parent(&self) -> &str {
            "parent"
        }

        async fn run(
            &self,
            _ctx: &CommandContext,
            _message: &InboundMessage,
            _args: &str,
        ) -> HandlerResult {
            Ok(())
        }
    }

    struct StubEvent {
        name: &'static str,
    }

    #[async_trait]
    impl Event for StubEvent {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self, _payload: &Value) -> HandlerResult {
            Ok(())
        }
    }

    #[test]
    fn resolves_by_name_and_alias() {
        let mut registry = Registry::new();
        registry
            .register(StubCommand::new("pause", &["stop", "hold"]))
            .unwrap();

        assert!(registry.resolve("pause").is_some());
        assert!(registry.resolve("stop").is_some());
        assert!(registry.resolve("hold").is_some());
        assert!(registry.resolve("Pause").is_none(), "matching is case-sensitive");
        assert!(registry.resolve("resume").is_none());
    }

    #[test]
    fn disjoint_commands_register_cleanly() {
        let mut registry = Registry::new();
        registry.register(StubCommand::new("pause", &["p"])).unwrap();
        registry.register(StubCommand::new("resume", &["r"])).unwrap();
        assert_eq!(registry.command_count(), 2);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = Registry::new();
        registry.register(StubCommand::new("pause", &[])).unwrap();

        let err = registry
            .register(StubCommand::new("pause", &[]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCommand { .. }));
    }

    #[test]
    fn overlapping_alias_is_rejected() {
        let mut registry = Registry::new();
        registry.register(StubCommand::new("pause", &["p"])).unwrap();

        let err = registry
            .register(StubCommand::new("play", &["p"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateAlias { .. }));
        // The failed registration left nothing behind.
        assert!(registry.resolve("play").is_none());
    }

    #[test]
    fn alias_colliding_with_existing_name_is_rejected() {
        let mut registry = Registry::new();
        registry.register(StubCommand::new("pause", &[])).unwrap();

        let err = registry
            .register(StubCommand::new("resume", &["pause"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateAlias { .. }));
    }

    #[test]
    fn duplicate_sub_command_token_is_rejected() {
        let mut registry = Registry::new();
        let command = Arc::new(StubCommand {
            name: "volume",
            aliases: Vec::new(),
            subs: vec![
                Arc::new(StubSub { name: "up" }),
                Arc::new(StubSub { name: "up" }),
            ],
        });

        let err = registry.register(command).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateSubCommand { .. }));
    }

    #[test]
    fn event_namespace_is_separate() {
        let mut registry = Registry::new();
        registry.register(StubCommand::new("pause", &[])).unwrap();
        registry
            .register_event(Arc::new(StubEvent { name: "pause" }))
            .unwrap();

        assert!(registry.resolve("pause").is_some());
        assert!(registry.resolve_event("pause").is_some());

        let err = registry
            .register_event(Arc::new(StubEvent { name: "pause" }))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateEvent { .. }));
    }

    #[test]
    fn events_are_not_alias_addressable() {
        let mut registry = Registry::new();
        registry
            .register_event(Arc::new(StubEvent { name: "READY" }))
            .unwrap();

        assert!(registry.resolve_event("READY").is_some());
        assert!(registry.resolve_event("ready").is_none());
        assert!(registry.resolve("READY").is_none());
    }
}
