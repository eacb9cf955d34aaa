//! Process-scoped dependency container.
//!
//! Populated once at startup through [`ContainerBuilder`]; at dispatch time it
//! is only read. Commands are registered as factories under a service id and
//! built on first resolution, then memoized. Modules never see the container
//! itself, only a [`ScopedResolver`] limited to the ids they own.

use crate::command::Command;
use once_cell::sync::OnceCell;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub type CommandFactory =
    Box<dyn Fn(&Container) -> anyhow::Result<Arc<dyn Command>> + Send + Sync>;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("no command registered under '{0}'")]
    UnknownService(String),

    #[error("'{id}' is outside the resolver scope of module '{scope}'")]
    OutOfScope { id: String, scope: String },

    #[error("missing dependency {0}")]
    MissingDependency(&'static str),

    #[error("failed to construct '{id}'")]
    Construction {
        id: String,
        #[source]
        source: anyhow::Error,
    },
}

struct CommandEntry {
    factory: CommandFactory,
    instance: OnceCell<Arc<dyn Command>>,
}

pub struct Container {
    services: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    commands: HashMap<String, CommandEntry>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("Container")
            .field("services", &self.services.len())
            .field("commands", &ids)
            .finish()
    }
}

impl Container {
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::default()
    }

    /// Typed lookup of a plain service (configuration, environment, runner...).
    pub fn service<T: Any + Send + Sync + Clone>(&self) -> Result<T, ContainerError> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .cloned()
            .ok_or(ContainerError::MissingDependency(type_name::<T>()))
    }

    /// Resolve a command by id, constructing it on first use.
    pub fn resolve_command(&self, id: &str) -> Result<Arc<dyn Command>, ContainerError> {
        let entry = self
            .commands
            .get(id)
            .ok_or_else(|| ContainerError::UnknownService(id.to_string()))?;
        entry
            .instance
            .get_or_try_init(|| {
                tracing::debug!(service = id, "constructing command");
                (entry.factory)(self)
            })
            .cloned()
            .map_err(|source| ContainerError::Construction {
                id: id.to_string(),
                source,
            })
    }

    #[cfg(test)]
    pub(crate) fn has_command(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    /// Narrow resolver for a module: only `ids` can be resolved through it.
    pub fn scope<I, S>(self: &Arc<Self>, module: &str, ids: I) -> ScopedResolver
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScopedResolver {
            container: Arc::clone(self),
            module: module.to_string(),
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Default)]
pub struct ContainerBuilder {
    services: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    commands: HashMap<String, CommandEntry>,
}

impl ContainerBuilder {
    /// Register a service value; a later registration of the same type replaces it.
    pub fn service<T: Any + Send + Sync + Clone>(mut self, value: T) -> Self {
        self.services.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    pub fn command<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Container) -> anyhow::Result<Arc<dyn Command>> + Send + Sync + 'static,
    {
        let id = id.into();
        if self.commands.contains_key(&id) {
            tracing::warn!(service = %id, "command factory registered twice, keeping the last one");
        }
        self.commands.insert(
            id,
            CommandEntry {
                factory: Box::new(factory),
                instance: OnceCell::new(),
            },
        );
        self
    }

    pub fn build(self) -> Arc<Container> {
        Arc::new(Container {
            services: self.services,
            commands: self.commands,
        })
    }
}

/// Resolver handed to a module, restricted to the command ids it owns.
#[derive(Clone)]
pub struct ScopedResolver {
    container: Arc<Container>,
    module: String,
    ids: Vec<String>,
}

impl fmt::Debug for ScopedResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedResolver")
            .field("module", &self.module)
            .field("ids", &self.ids)
            .finish()
    }
}

impl ScopedResolver {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn resolve(&self, id: &str) -> Result<Arc<dyn Command>, ContainerError> {
        if !self.ids.iter().any(|owned| owned == id) {
            return Err(ContainerError::OutOfScope {
                id: id.to_string(),
                scope: self.module.clone(),
            });
        }
        self.container.resolve_command(id)
    }

    /// Every owned command, in the order the ids were scoped.
    pub fn resolve_all(&self) -> Result<Vec<Arc<dyn Command>>, ContainerError> {
        self.ids.iter().map(|id| self.resolve(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CliEvent;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Named(&'static str);

    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn invoke(&self, _event: &CliEvent) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Clone)]
    struct Greeting(String);

    #[test]
    fn commands_are_built_lazily_and_once() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let container = Container::builder()
            .command("hello", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(Named("hello")) as Arc<dyn Command>)
            })
            .build();
        assert_eq!(built.load(Ordering::SeqCst), 0);

        let first = container.resolve_command("hello").unwrap();
        let second = container.resolve_command("hello").unwrap();
        assert_eq!(first.name(), "hello");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn factories_can_pull_services() {
        let container = Container::builder()
            .service(Greeting("hi".into()))
            .command("greet", |c| {
                let g = c.service::<Greeting>()?;
                assert_eq!(g.0, "hi");
                Ok(Arc::new(Named("greet")) as Arc<dyn Command>)
            })
            .build();
        assert!(container.resolve_command("greet").is_ok());
    }

    #[test]
    fn missing_dependency_becomes_construction_error() {
        let container = Container::builder()
            .command("greet", |c| {
                c.service::<Greeting>()?;
                Ok(Arc::new(Named("greet")) as Arc<dyn Command>)
            })
            .build();
        let err = match container.resolve_command("greet") {
            Err(e) => e,
            Ok(_) => panic!("construction should fail without Greeting"),
        };
        assert!(matches!(err, ContainerError::Construction { ref id, .. } if id == "greet"));
        assert_eq!(err.to_string(), "failed to construct 'greet'");
        let cause = std::error::Error::source(&err).expect("cause attached");
        assert!(cause.to_string().contains("Greeting"));
    }

    #[test]
    fn unknown_service() {
        let container = Container::builder().build();
        assert!(matches!(
            container.resolve_command("nope"),
            Err(ContainerError::UnknownService(_))
        ));
    }

    #[test]
    fn scope_limits_resolution() {
        let container = Container::builder()
            .command("a", |_| Ok(Arc::new(Named("a")) as Arc<dyn Command>))
            .command("b", |_| Ok(Arc::new(Named("b")) as Arc<dyn Command>))
            .build();
        let scoped = container.scope("only-a", ["a"]);
        assert!(scoped.resolve("a").is_ok());
        assert!(matches!(
            scoped.resolve("b"),
            Err(ContainerError::OutOfScope { .. })
        ));
        let all = scoped.resolve_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name(), "a");
    }
}
