//! Inbound routing: raw input to executable handler.
//!
//! The dispatcher is the single entry point for both kinds of inbound
//! traffic. A chat message moves through three logical states: received,
//! resolved or unresolved, completed. Unresolvable input is a silent no-op,
//! not an error; most chat is not commands. The only way a failure leaves
//! the dispatcher is the process-wide error signal.
//!
//! Each inbound item is handled as its own task by the runtime, so two
//! dispatches may interleave arbitrarily. Within one dispatch the order is
//! fixed: throttle check, then reply or run.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::command::{BoxedCommand, BoxedSubCommand, CommandContext};
use crate::message::InboundMessage;
use crate::registry::Registry;
use crate::signal::{ErrorSignal, ErrorSink};

/// Routes inbound messages and bus signals to registered handlers.
pub struct Dispatcher {
    registry: Arc<Registry>,
    ctx: CommandContext,
    prefix: String,
    errors: ErrorSink,
}

impl Dispatcher {
    /// Creates a dispatcher over a loaded registry.
    pub fn new(
        registry: Arc<Registry>,
        ctx: CommandContext,
        prefix: impl Into<String>,
        errors: ErrorSink,
    ) -> Self {
        Self {
            registry,
            ctx,
            prefix: prefix.into(),
            errors,
        }
    }

    /// The registry this dispatcher resolves against.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The configured command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Handles one inbound chat message end to end.
    ///
    /// Tokenization is deliberately simple and explicit: the prefix is a
    /// literal strip from the front of the content, the command token runs
    /// to the first whitespace, and the remainder with leading whitespace
    /// trimmed becomes the argument string. Token matching is
    /// case-sensitive.
    pub async fn handle_message(&self, message: InboundMessage) {
        let Some(stripped) = message.content.strip_prefix(&self.prefix) else {
            return;
        };

        let (token, args) = split_token(stripped.trim_start());
        if token.is_empty() {
            return;
        }

        let Some(command) = self.registry.resolve(token) else {
            trace!(%token, "unresolved input");
            return;
        };

        debug!(command = command.name(), author = %message.author_id, "dispatching");

        let outcome = match resolve_sub_command(command, args) {
            // Subcommand invocation goes straight to the subcommand's run,
            // bypassing the parent's throttle gate.
            Some((sub, sub_args)) => sub.run(&self.ctx, &message, sub_args).await,
            None => command.execute(&self.ctx, &message, args).await,
        };

        if let Err(error) = outcome {
            debug!(command = command.name(), %error, "command failed");
            self.errors.emit(ErrorSignal::Command {
                command: command.name().to_string(),
                message,
                error,
            });
        }
    }

    /// Routes one bus signal to its event handler, if one is registered.
    pub async fn handle_signal(&self, name: &str, payload: Value) {
        match self.registry.resolve_event(name) {
            Some(event) => event.dispatch(payload, &self.errors).await,
            None => trace!(signal = name, "no handler registered"),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("prefix", &self.prefix)
            .field("registry", &self.registry)
            .finish()
    }
}

/// Splits input into its leading token and the trimmed remainder.
fn split_token(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (input, ""),
    }
}

/// Matches the leading token of `args` against the command's subcommands.
fn resolve_sub_command<'a>(
    command: &'a BoxedCommand,
    args: &'a str,
) -> Option<(&'a BoxedSubCommand, &'a str)> {
    if args.is_empty() || command.sub_commands().is_empty() {
        return None;
    }

    let (token, rest) = split_token(args);
    command
        .sub_commands()
        .iter()
        .find(|sub| sub.name() == token || sub.aliases().contains(&token))
        .map(|sub| (sub, rest))
}
