use crate::error::{DispatchError, Result};
use crate::module::Module;

/// Ordered, immutable set of modules. Order is registration order and decides
/// which command wins an equal-length name tie.
pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleRegistry {
    pub fn builder() -> ModuleRegistryBuilder {
        ModuleRegistryBuilder::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Module> {
        self.modules.iter().map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.iter().map(|m| m.name()).collect()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.module_names()).finish()
    }
}

#[derive(Default)]
pub struct ModuleRegistryBuilder {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleRegistryBuilder {
    pub fn register<M: Module + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn build(self) -> Result<ModuleRegistry> {
        for (i, m) in self.modules.iter().enumerate() {
            if self.modules[..i].iter().any(|prev| prev.name() == m.name()) {
                return Err(DispatchError::DuplicateModule(m.name().to_string()));
            }
        }
        tracing::debug!(
            modules = ?self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            "module registry built"
        );
        Ok(ModuleRegistry {
            modules: self.modules,
        })
    }
}
