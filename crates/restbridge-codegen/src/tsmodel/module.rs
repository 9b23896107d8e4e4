use std::path::PathBuf;

use super::class::{TsClass, TsEnum};
use super::types::TypeRef;

/// Identity and placement of a target module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    /// Module name; declarations import it under this name. For external
    /// modules the name is the import path.
    pub name: String,

    /// Output directory, relative to the output root. Empty for external
    /// modules.
    pub path: PathBuf,

    /// Library-provided module: imported by name, no local file emitted.
    pub external: bool,
}

impl ModuleSpec {
    /// Create an internal module written under `path`.
    pub fn internal(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            external: false,
        }
    }

    /// Create an external library module.
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: PathBuf::new(),
            external: true,
        }
    }
}

/// A declaration owned by a module.
#[derive(Debug, Clone)]
pub enum TsDecl {
    Class(TsClass),
    Enum(TsEnum),
}

impl TsDecl {
    /// Declared name.
    pub fn name(&self) -> &str {
        match self {
            TsDecl::Class(c) => &c.name,
            TsDecl::Enum(e) => &e.name,
        }
    }
}

/// A target module and the declarations it owns.
#[derive(Debug, Clone)]
pub struct TsModule {
    /// Identity and placement.
    pub spec: ModuleSpec,

    /// Declarations in conversion order.
    pub decls: Vec<TsDecl>,
}

impl TsModule {
    /// Create an empty module.
    pub fn new(spec: ModuleSpec) -> Self {
        Self {
            spec,
            decls: Vec::new(),
        }
    }
}

/// The whole target model for one generation run.
///
/// Built once, rendered, discarded. Module order is first-touch order, so
/// identical input yields identical output.
#[derive(Debug, Clone, Default)]
pub struct TypeModel {
    modules: Vec<TsModule>,
}

impl TypeModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or create the module for `spec` and return it mutably.
    pub fn module_mut(&mut self, spec: &ModuleSpec) -> &mut TsModule {
        if let Some(idx) = self.modules.iter().position(|m| m.spec.name == spec.name) {
            return &mut self.modules[idx];
        }
        self.modules.push(TsModule::new(spec.clone()));
        let last = self.modules.len() - 1;
        &mut self.modules[last]
    }

    /// Register a module without adding declarations (e.g. a hand-written
    /// module generated code imports from).
    pub fn register_module(&mut self, spec: ModuleSpec) {
        self.module_mut(&spec);
    }

    /// All modules, in first-touch order.
    pub fn modules(&self) -> &[TsModule] {
        &self.modules
    }

    /// Placement of a module, by name.
    pub fn module_spec(&self, name: &str) -> Option<&ModuleSpec> {
        self.modules
            .iter()
            .find(|m| m.spec.name == name)
            .map(|m| &m.spec)
    }

    /// Find a declaration by reference.
    pub fn find_decl(&self, r: &TypeRef) -> Option<&TsDecl> {
        self.modules
            .iter()
            .find(|m| m.spec.name == r.module)?
            .decls
            .iter()
            .find(|d| d.name() == r.name)
    }
}
