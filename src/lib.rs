//! Dispatch core of a modular command-line tool.
//!
//! Feature modules contribute [`Command`](command::Command)s; the
//! [`Dispatcher`](command_handlers::dispatch::Dispatcher) wraps raw argv in a
//! [`CliEvent`](event::CliEvent), asks every registered
//! [`Module`](module::Module) for listeners, and invokes the command whose
//! name is the longest prefix of the input.

pub mod changelog;
pub mod cli;
pub mod command;
pub mod command_handlers;
pub mod config;
pub mod container;
pub mod env;
pub mod error;
pub mod event;
pub mod module;
pub mod modules;
pub mod process;
pub mod registry;

pub use command::Command;
pub use command_handlers::dispatch::{DispatchOutcome, Dispatcher};
pub use error::DispatchError;
pub use event::{CliEvent, DispatchedArgv, EventKind};
pub use module::{ContainerModule, Module};
pub use registry::ModuleRegistry;
