//! Feature modules shipped with the binary and their wiring.
//!
//! Wiring happens once at startup: services and command factories go into the
//! container, then each enabled module gets a resolver scoped to its own
//! command ids and is registered in fixed order.

pub mod git;
pub mod release;

use crate::command_handlers::dispatch::Dispatcher;
use crate::config::AppConfig;
use crate::container::{Container, ContainerBuilder};
use crate::env::SharedEnvironment;
use crate::error::Result;
use crate::module::ContainerModule;
use crate::process::SharedRunner;
use crate::registry::ModuleRegistry;
use std::sync::Arc;

struct ModuleSpec {
    name: &'static str,
    command_ids: &'static [&'static str],
    register: fn(ContainerBuilder) -> ContainerBuilder,
}

/// Registration order; also the equal-length tie-break order.
const BUILTIN: &[ModuleSpec] = &[
    ModuleSpec {
        name: git::MODULE,
        command_ids: git::COMMAND_IDS,
        register: git::register,
    },
    ModuleSpec {
        name: release::MODULE,
        command_ids: release::COMMAND_IDS,
        register: release::register,
    },
];

pub fn container(cfg: AppConfig, env: SharedEnvironment, runner: SharedRunner) -> Arc<Container> {
    let builder = Container::builder()
        .service(cfg)
        .service(env)
        .service(runner);
    BUILTIN
        .iter()
        .fold(builder, |b, spec| (spec.register)(b))
        .build()
}

pub fn registry(container: &Arc<Container>, cfg: &AppConfig) -> Result<ModuleRegistry> {
    for name in &cfg.modules.disabled {
        if !BUILTIN.iter().any(|m| m.name == name) {
            tracing::warn!(module = %name, "disabled module is not a known module");
        }
    }
    let mut builder = ModuleRegistry::builder();
    for spec in BUILTIN {
        if !cfg.modules.is_enabled(spec.name) {
            tracing::debug!(module = spec.name, "module disabled by config");
            continue;
        }
        let resolver = container.scope(spec.name, spec.command_ids.iter().copied());
        builder = builder.register(ContainerModule::new(spec.name, resolver));
    }
    builder.build()
}

/// Full startup wiring: container, registry, dispatcher.
pub fn dispatcher(
    cfg: AppConfig,
    env: SharedEnvironment,
    runner: SharedRunner,
) -> Result<Dispatcher> {
    let container = container(cfg.clone(), env, runner);
    let registry = registry(&container, &cfg)?;
    Ok(Dispatcher::new(registry))
}
