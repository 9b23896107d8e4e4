//! The generation run facade.
//!
//! Wires filters, name mappers, the type mapper, the converter, the
//! implementation generator and the renderer into a single deterministic
//! pass: conversion and rendering complete in memory before any file is
//! written, so configuration errors abort without partial output.

use std::collections::HashMap;
use std::path::Path;

use restbridge_core::config::{Config, MissingTypePolicy};
use restbridge_core::descriptor::{BackendClass, BackendRegistry};
use restbridge_core::filter::ClassFilter;
use restbridge_core::names::NameMapper;
use restbridge_core::{BridgeError, Result};

use crate::convert::ModelConverter;
use crate::generator::{AngularGenerator, ImplementationGenerator};
use crate::mapper::TypeMapper;
use crate::render::{RenderedModule, Renderer};
use crate::tsmodel::{ModuleSpec, TsDecl, TsType, TypeModel};

/// Counts reported after a generation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationSummary {
    /// Rendered modules.
    pub modules: usize,
    /// Classes across all rendered modules.
    pub classes: usize,
    /// Enums across all rendered modules.
    pub enums: usize,
}

/// A configured generation run.
pub struct ClientGenerator {
    model_filter: ClassFilter,
    rest_filter: ClassFilter,
    model_names: NameMapper,
    rest_names: NameMapper,
    mapper: TypeMapper,
    missing: MissingTypePolicy,
    generator: Box<dyn ImplementationGenerator>,
    extra_modules: Vec<ModuleSpec>,
}

impl std::fmt::Debug for ClientGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientGenerator")
            .field("model_filter", &self.model_filter)
            .field("rest_filter", &self.rest_filter)
            .field("model_names", &self.model_names)
            .field("rest_names", &self.rest_names)
            .field("mapper", &self.mapper)
            .field("missing", &self.missing)
            .field("extra_modules", &self.extra_modules)
            .finish_non_exhaustive()
    }
}

impl ClientGenerator {
    /// Create a run around a concrete implementation generator. All
    /// classes are accepted and names pass through until configured
    /// otherwise.
    pub fn new(generator: Box<dyn ImplementationGenerator>) -> Self {
        Self {
            model_filter: ClassFilter::All,
            rest_filter: ClassFilter::All,
            model_names: NameMapper::Identity,
            rest_names: NameMapper::Identity,
            mapper: TypeMapper::new(),
            missing: MissingTypePolicy::default(),
            generator,
            extra_modules: Vec::new(),
        }
    }

    /// Build a run from a parsed configuration, using the Angular/RxJS
    /// generator. Returns the run and the package-to-module assignment.
    pub fn from_config(config: &Config) -> Result<(Self, HashMap<String, ModuleSpec>)> {
        let mut angular = AngularGenerator::new();
        if let Some(module_name) = &config.generator.url_service_module {
            let path = config
                .generator
                .url_service_path
                .clone()
                .unwrap_or_default();
            angular = angular.with_url_service(ModuleSpec::internal(module_name.clone(), path));
        }
        let url_service_module = angular.url_service_module().cloned();

        let mut run = Self::new(Box::new(angular))
            .with_model_filter(config.filters.model.build()?)
            .with_rest_filter(config.filters.rest.build()?)
            .with_model_names(config.names.model.clone())
            .with_rest_names(config.names.rest.clone())
            .with_missing_policy(config.types.missing);

        for (qualified, target) in &config.types.overrides {
            let ty = TsType::parse_primitive(target).ok_or_else(|| {
                BridgeError::Config(format!(
                    "unknown target primitive `{}` for override `{}`",
                    target, qualified
                ))
            })?;
            run.mapper.insert_override(qualified.clone(), ty);
        }
        if let Some(spec) = url_service_module {
            run = run.with_module(spec);
        }

        let modules = config
            .modules
            .iter()
            .map(|entry| {
                let spec = if entry.external {
                    ModuleSpec::external(entry.name.clone())
                } else {
                    ModuleSpec::internal(entry.name.clone(), entry.path.clone())
                };
                (entry.package.clone(), spec)
            })
            .collect();

        Ok((run, modules))
    }

    /// Set the model-class condition.
    pub fn with_model_filter(mut self, filter: ClassFilter) -> Self {
        self.model_filter = filter;
        self
    }

    /// Set the REST-class condition.
    pub fn with_rest_filter(mut self, filter: ClassFilter) -> Self {
        self.rest_filter = filter;
        self
    }

    /// Set the model-class name mapping.
    pub fn with_model_names(mut self, names: NameMapper) -> Self {
        self.model_names = names;
        self
    }

    /// Set the REST-class name mapping.
    pub fn with_rest_names(mut self, names: NameMapper) -> Self {
        self.rest_names = names;
        self
    }

    /// Add a custom type mapping.
    pub fn with_type_override(mut self, qualified: impl Into<String>, ty: TsType) -> Self {
        self.mapper.insert_override(qualified, ty);
        self
    }

    /// Set the missing-type policy.
    pub fn with_missing_policy(mut self, missing: MissingTypePolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Register an extra module (e.g. a hand-written module generated code
    /// imports from).
    pub fn with_module(mut self, spec: ModuleSpec) -> Self {
        self.extra_modules.push(spec);
        self
    }

    /// Convert the accepted classes into a target model.
    pub fn build_model(
        &self,
        registry: &BackendRegistry,
        modules: &HashMap<String, ModuleSpec>,
    ) -> Result<TypeModel> {
        let model_classes: Vec<&BackendClass> = registry
            .classes()
            .iter()
            .filter(|c| !c.is_rest() && self.model_filter.matches(c, registry))
            .collect();
        let rest_classes: Vec<&BackendClass> = registry
            .classes()
            .iter()
            .filter(|c| c.is_rest() && self.rest_filter.matches(c, registry))
            .collect();

        tracing::debug!(
            model_classes = model_classes.len(),
            rest_classes = rest_classes.len(),
            "converting backend classes"
        );

        let converter = ModelConverter::new(
            registry,
            modules,
            &self.mapper,
            self.generator.as_ref(),
            &self.model_names,
            &self.rest_names,
            self.missing,
        );
        let mut model = converter.convert(&model_classes, &rest_classes)?;

        for spec in &self.extra_modules {
            model.register_module(spec.clone());
        }

        Ok(model)
    }

    /// Convert and render, entirely in memory.
    pub fn render(
        &self,
        registry: &BackendRegistry,
        modules: &HashMap<String, ModuleSpec>,
    ) -> Result<Vec<RenderedModule>> {
        let model = self.build_model(registry, modules)?;
        Renderer::new(self.generator.as_ref()).render_model(&model)
    }

    /// Convert, render and write one file per rendered module under
    /// `out_dir`. Nothing is written unless the whole model renders.
    pub fn generate_to_dir(
        &self,
        registry: &BackendRegistry,
        modules: &HashMap<String, ModuleSpec>,
        out_dir: &Path,
    ) -> Result<GenerationSummary> {
        let model = self.build_model(registry, modules)?;
        let rendered = Renderer::new(self.generator.as_ref()).render_model(&model)?;

        let mut summary = GenerationSummary {
            modules: rendered.len(),
            ..Default::default()
        };
        for module in model.modules() {
            for decl in &module.decls {
                match decl {
                    TsDecl::Class(_) => summary.classes += 1,
                    TsDecl::Enum(_) => summary.enums += 1,
                }
            }
        }

        for unit in &rendered {
            let dir = out_dir.join(&unit.path);
            std::fs::create_dir_all(&dir)?;
            let file = dir.join(unit.file_name());
            std::fs::write(&file, &unit.content)?;
            tracing::debug!(file = ?file, "wrote module");
        }

        Ok(summary)
    }
}
