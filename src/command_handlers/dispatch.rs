use crate::command::Command;
use crate::error::{DispatchError, Result};
use crate::event::{CliEvent, DispatchedArgv};
use crate::registry::ModuleRegistry;
use std::sync::Arc;
use tracing::debug;

/// Per-invocation states, logged as dispatch progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    EventBuilt,
    Scanning,
    Matched,
    Invoking,
    Done,
    Unmatched,
    Reported,
}

/// What a successful dispatch ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub module: String,
    pub command: String,
    pub consumed: usize,
}

/// One row of the command listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub module: String,
    pub name: String,
    pub summary: String,
}

struct Candidate {
    module: String,
    command: Arc<dyn Command>,
    len: usize,
}

/// Routes raw argv to the command with the longest matching name.
#[derive(Debug)]
pub struct Dispatcher {
    registry: ModuleRegistry,
}

impl Dispatcher {
    pub fn new(registry: ModuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn dispatch<I, S>(&self, tokens: I) -> Result<DispatchOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        trace_state(DispatchState::Idle);
        let mut argv = DispatchedArgv::new(tokens);
        trace_state(DispatchState::EventBuilt);

        let Some(best) = self.find_match(&argv)? else {
            trace_state(DispatchState::Unmatched);
            let err = DispatchError::UnknownCommand {
                argv: argv.argv().to_vec(),
            };
            trace_state(DispatchState::Reported);
            return Err(err);
        };
        trace_state(DispatchState::Matched);

        argv.set_consumed_prefix_len(best.len);
        let event = CliEvent::from(argv);
        let name = best.command.name().to_string();
        tracing::info!(module = %best.module, command = %name, "invoking command");
        trace_state(DispatchState::Invoking);
        best.command.invoke(&event)?;
        trace_state(DispatchState::Done);

        Ok(DispatchOutcome {
            module: best.module,
            command: name,
            consumed: best.len,
        })
    }

    fn find_match(&self, argv: &DispatchedArgv) -> Result<Option<Candidate>> {
        trace_state(DispatchState::Scanning);
        // Modules get a read-only view; the cursor is only set once a winner is known.
        let event = CliEvent::Dispatched(argv.clone());
        let tokens = argv.argv();
        let mut best: Option<Candidate> = None;

        for module in self.registry.iter() {
            for command in module.listeners_for_event(&event)? {
                let name = command.name_tokens();
                if !is_prefix(&name, tokens) {
                    continue;
                }
                let len = name.len();
                debug!(
                    module = module.name(),
                    command = command.name(),
                    len,
                    "candidate matches"
                );
                if best.as_ref().map_or(true, |b| len > b.len) {
                    best = Some(Candidate {
                        module: module.name().to_string(),
                        command,
                        len,
                    });
                }
            }
        }
        Ok(best)
    }

    /// Every command offered by every module, in registration order.
    pub fn describe(&self) -> Result<Vec<CommandInfo>> {
        let mut rows = Vec::new();
        for module in self.registry.iter() {
            for command in module.listeners_for_event(&CliEvent::Describe)? {
                rows.push(CommandInfo {
                    module: module.name().to_string(),
                    name: command.name().to_string(),
                    summary: command.summary().to_string(),
                });
            }
        }
        Ok(rows)
    }
}

/// An empty name never matches.
fn is_prefix(name: &[&str], argv: &[String]) -> bool {
    !name.is_empty() && name.len() <= argv.len() && name.iter().zip(argv).all(|(n, a)| *n == a)
}

fn trace_state(state: DispatchState) {
    debug!(?state, "dispatch");
}
