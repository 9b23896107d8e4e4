//! Model conversion: backend class graph to target type model.

use std::collections::{HashMap, HashSet};

use restbridge_core::config::MissingTypePolicy;
use restbridge_core::descriptor::{BackendClass, BackendEnum, BackendRegistry, BackendType};
use restbridge_core::names::NameMapper;
use restbridge_core::{BridgeError, Result};

use crate::generator::ImplementationGenerator;
use crate::mapper::TypeMapper;
use crate::tsmodel::{
    ModuleSpec, TsClass, TsDecl, TsEnum, TsField, TsMethod, TsParameter, TsType, TypeModel,
    TypeRef,
};

/// Entry category of a converted class, chosen by the caller's filters.
/// Drives name mapping only; REST behavior follows the endpoint flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Model,
    Rest,
}

/// Walks the filtered backend class graph and populates the target model.
///
/// Every accepted class produces exactly one declaration, assigned to the
/// module designated for its package. Referenced types are converted
/// recursively, forming a closure over the reachable graph; conversions are
/// memoized by qualified name so repeated references yield the same
/// `(module, name)`.
pub struct ModelConverter<'a> {
    registry: &'a BackendRegistry,
    modules: &'a HashMap<String, ModuleSpec>,
    mapper: &'a TypeMapper,
    generator: &'a dyn ImplementationGenerator,
    model_names: &'a NameMapper,
    rest_names: &'a NameMapper,
    missing: MissingTypePolicy,
    converted: HashMap<String, TypeRef>,
    produced: HashSet<TypeRef>,
    model: TypeModel,
}

impl<'a> ModelConverter<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: &'a BackendRegistry,
        modules: &'a HashMap<String, ModuleSpec>,
        mapper: &'a TypeMapper,
        generator: &'a dyn ImplementationGenerator,
        model_names: &'a NameMapper,
        rest_names: &'a NameMapper,
        missing: MissingTypePolicy,
    ) -> Self {
        Self {
            registry,
            modules,
            mapper,
            generator,
            model_names,
            rest_names,
            missing,
            converted: HashMap::new(),
            produced: HashSet::new(),
            model: TypeModel::new(),
        }
    }

    /// Convert the filtered classes and everything they reach, consuming
    /// the converter and yielding the finished model.
    pub fn convert(
        mut self,
        model_classes: &[&'a BackendClass],
        rest_classes: &[&'a BackendClass],
    ) -> Result<TypeModel> {
        for class in model_classes {
            self.convert_class(class, Category::Model)?;
        }
        for class in rest_classes {
            self.convert_class(class, Category::Rest)?;
        }
        Ok(self.model)
    }

    /// Module assignment for a package; missing assignments fail the run.
    fn module_for(&self, package: &str) -> Result<&ModuleSpec> {
        self.modules
            .get(package)
            .ok_or_else(|| BridgeError::UnmappedPackage(package.to_string()))
    }

    fn name_for(&self, class: &BackendClass, category: Category) -> String {
        match category {
            Category::Model => self.model_names.map(&class.name),
            Category::Rest => self.rest_names.map(&class.name),
        }
    }

    fn convert_class(&mut self, class: &'a BackendClass, category: Category) -> Result<TypeRef> {
        let qualified = class.qualified_name();
        if let Some(existing) = self.converted.get(&qualified) {
            return Ok(existing.clone());
        }

        let spec = self.module_for(&class.package)?.clone();
        let name = self.name_for(class, category);
        let type_ref = TypeRef::new(spec.name.clone(), name.clone());
        if !self.produced.insert(type_ref.clone()) {
            return Err(BridgeError::Config(format!(
                "type name clash: `{}` maps to already-produced `{}.{}`",
                qualified, type_ref.module, type_ref.name
            )));
        }
        // Memoize before recursing so reference cycles terminate.
        self.converted.insert(qualified, type_ref.clone());

        let mut ts_class = TsClass::new(name, spec.name.clone());
        ts_class.rest = class.is_rest();
        ts_class.endpoint = class.endpoint.clone();

        if let Some(super_qualified) = &class.superclass {
            if let TsType::Ref(super_ref) = self.resolve_object(super_qualified)? {
                ts_class.add_scoped_usage(super_ref.clone());
                ts_class.superclass = Some(super_ref);
            }
            // A missing superclass degrades to `any` under the permissive
            // policy; nothing to extend in that case.
        }

        for field in &class.fields {
            let ty = self.resolve_type(&field.ty)?;
            ts_class.register_type(&ty);
            let mut ts_field = TsField::new(field.name.clone(), ty);
            ts_field.optional = field.optional;
            ts_field.nullable = field.nullable || field.ty.is_nullable();
            ts_class.fields.push(ts_field);
        }

        for injected in self.generator.implementation_specific_fields(&ts_class) {
            ts_class.register_type(&injected.ty);
            ts_class.fields.push(injected);
        }

        if ts_class.rest {
            let mut ctor = TsMethod::constructor();
            ctor.params = self
                .generator
                .implementation_specific_parameters(&ts_class, &ctor);
            for param in &ctor.params {
                ts_class.register_type(&param.ty);
            }
            ts_class.methods.push(ctor);
        }

        for method in &class.methods {
            let raw_return = self.resolve_type(&method.return_type)?;

            let mut ts_method = TsMethod::new(method.name.clone());
            ts_method.endpoint = method.endpoint.clone();
            for param in &method.params {
                let ty = self.resolve_type(&param.ty)?;
                ts_class.register_type(&ty);
                let mut ts_param = TsParameter::new(param.name.clone(), ty);
                ts_param.optional = param.optional;
                ts_param.nullable = param.nullable || param.ty.is_nullable();
                ts_param.binding = param.binding.clone();
                ts_method.params.push(ts_param);
            }

            let extra = self
                .generator
                .implementation_specific_parameters(&ts_class, &ts_method);
            for param in &extra {
                ts_class.register_type(&param.ty);
            }
            ts_method.params.extend(extra);

            ts_method.return_type =
                self.generator
                    .map_return_type(&ts_class, &ts_method, raw_return);
            ts_class.register_type(&ts_method.return_type);

            for decorator in self.generator.method_decorators(&ts_class, &ts_method) {
                ts_class.add_scoped_usage(decorator.func.clone());
                ts_method.decorators.push(decorator);
            }

            ts_class.methods.push(ts_method);
        }

        for decorator in self.generator.class_decorators(&ts_class) {
            ts_class.add_scoped_usage(decorator.func.clone());
            ts_class.decorators.push(decorator);
        }
        for usage in self.generator.complex_type_usages(&ts_class) {
            ts_class.add_scoped_usage(usage);
        }

        self.model
            .module_mut(&spec)
            .decls
            .push(TsDecl::Class(ts_class));

        Ok(type_ref)
    }

    fn convert_enum(&mut self, enum_def: &'a BackendEnum) -> Result<TypeRef> {
        let qualified = enum_def.qualified_name();
        if let Some(existing) = self.converted.get(&qualified) {
            return Ok(existing.clone());
        }

        let spec = self.module_for(&enum_def.package)?.clone();
        let name = self.model_names.map(&enum_def.name);
        let type_ref = TypeRef::new(spec.name.clone(), name.clone());
        if !self.produced.insert(type_ref.clone()) {
            return Err(BridgeError::Config(format!(
                "type name clash: `{}` maps to already-produced `{}.{}`",
                qualified, type_ref.module, type_ref.name
            )));
        }
        self.converted.insert(qualified, type_ref.clone());

        let mut ts_enum = TsEnum::new(name, spec.name.clone());
        ts_enum.values = enum_def.values.clone();
        self.model
            .module_mut(&spec)
            .decls
            .push(TsDecl::Enum(ts_enum));

        Ok(type_ref)
    }

    /// Resolve a backend type to a target expression: primitive mapping
    /// first (overrides take precedence), then structural recursion, then
    /// complex-class conversion.
    fn resolve_type(&mut self, ty: &BackendType) -> Result<TsType> {
        if let Some(mapped) = self.mapper.map(ty) {
            return Ok(mapped);
        }
        match ty {
            BackendType::List(inner) => {
                Ok(TsType::Array(Box::new(self.resolve_type(inner)?)))
            }
            BackendType::Optional(inner) => self.resolve_type(inner),
            BackendType::Object(qualified) => {
                let qualified = qualified.clone();
                self.resolve_object(&qualified)
            }
            // The mapper covers every primitive variant.
            other => Ok(self.mapper.map(other).unwrap_or(TsType::Any)),
        }
    }

    /// Resolve a referenced object type: a converted class or enum, or the
    /// missing-type policy.
    fn resolve_object(&mut self, qualified: &str) -> Result<TsType> {
        if let Some(existing) = self.converted.get(qualified) {
            return Ok(TsType::Ref(existing.clone()));
        }
        let registry = self.registry;
        if let Some(class) = registry.get_class(qualified) {
            let category = if class.is_rest() {
                Category::Rest
            } else {
                Category::Model
            };
            return Ok(TsType::Ref(self.convert_class(class, category)?));
        }
        if let Some(enum_def) = registry.get_enum(qualified) {
            return Ok(TsType::Ref(self.convert_enum(enum_def)?));
        }
        match self.missing {
            MissingTypePolicy::Any => {
                tracing::warn!(
                    type_name = qualified,
                    "no type mapping or class definition; emitting `any`"
                );
                Ok(TsType::Any)
            }
            MissingTypePolicy::Fail => Err(BridgeError::MappingGap(qualified.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{AngularGenerator, EmptyImplementationGenerator};
    use restbridge_core::descriptor::{
        BackendField, BackendMethod, BackendParam, EndpointMapping, HttpVerb, ParamBinding,
    };

    fn modules() -> HashMap<String, ModuleSpec> {
        let mut map = HashMap::new();
        map.insert(
            "com.shop.model".to_string(),
            ModuleSpec::internal("model", "app/sdk/model"),
        );
        map.insert(
            "com.shop.enums".to_string(),
            ModuleSpec::internal("model-enums", "app/sdk/enums"),
        );
        map.insert(
            "com.shop.ctrl".to_string(),
            ModuleSpec::internal("services", "app/sdk/services"),
        );
        map
    }

    fn order_registry() -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        registry
            .register_class(
                BackendClass::new("com.shop.model", "OrderDTO")
                    .with_field(BackendField::new("id", BackendType::Long))
                    .with_field(BackendField::new(
                        "status",
                        BackendType::Object("com.shop.enums.OrderStatus".to_string()),
                    )),
            )
            .unwrap();
        registry
            .register_enum(
                BackendEnum::new("com.shop.enums", "OrderStatus")
                    .with_value("NEW")
                    .with_value("SHIPPED"),
            )
            .unwrap();
        registry
            .register_class(
                BackendClass::new("com.shop.ctrl", "OrderCtrl")
                    .with_endpoint(EndpointMapping::base_path("/orders"))
                    .with_method(
                        BackendMethod::new("getOrder")
                            .returns(BackendType::Object("com.shop.model.OrderDTO".to_string()))
                            .with_endpoint(EndpointMapping::new(HttpVerb::Get, "/{id}"))
                            .with_param(
                                BackendParam::new("id", BackendType::Long)
                                    .with_binding(ParamBinding::Path { name: None }),
                            ),
                    ),
            )
            .unwrap();
        registry
    }

    fn convert_with(
        registry: &BackendRegistry,
        modules: &HashMap<String, ModuleSpec>,
        mapper: &TypeMapper,
        generator: &dyn ImplementationGenerator,
        missing: MissingTypePolicy,
    ) -> Result<TypeModel> {
        let identity = NameMapper::Identity;
        let model_classes: Vec<&BackendClass> = registry
            .classes()
            .iter()
            .filter(|c| !c.is_rest())
            .collect();
        let rest_classes: Vec<&BackendClass> =
            registry.classes().iter().filter(|c| c.is_rest()).collect();
        ModelConverter::new(
            registry, modules, mapper, generator, &identity, &identity, missing,
        )
        .convert(&model_classes, &rest_classes)
    }

    #[test]
    fn test_uniqueness_under_multiple_references() {
        let mut registry = order_registry();
        // A second controller referencing the same DTO.
        registry
            .register_class(
                BackendClass::new("com.shop.ctrl", "ReportCtrl")
                    .with_endpoint(EndpointMapping::base_path("/reports"))
                    .with_method(
                        BackendMethod::new("lastOrder")
                            .returns(BackendType::Object("com.shop.model.OrderDTO".to_string()))
                            .with_endpoint(EndpointMapping::new(HttpVerb::Get, "/last")),
                    ),
            )
            .unwrap();

        let modules = modules();
        let mapper = TypeMapper::new();
        let generator = AngularGenerator::new();
        let model = convert_with(
            &registry,
            &modules,
            &mapper,
            &generator,
            MissingTypePolicy::Any,
        )
        .unwrap();

        let order_decls: usize = model
            .modules()
            .iter()
            .flat_map(|m| m.decls.iter())
            .filter(|d| d.name() == "OrderDTO")
            .count();
        assert_eq!(order_decls, 1);
    }

    #[test]
    fn test_unmapped_package_fails_fast() {
        let mut registry = BackendRegistry::new();
        registry
            .register_class(BackendClass::new("com.shop.unmapped", "StrayDTO"))
            .unwrap();

        let modules = modules();
        let mapper = TypeMapper::new();
        let generator = EmptyImplementationGenerator;
        let err = convert_with(
            &registry,
            &modules,
            &mapper,
            &generator,
            MissingTypePolicy::Any,
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::UnmappedPackage(p) if p == "com.shop.unmapped"));
    }

    #[test]
    fn test_missing_type_policies() {
        let mut registry = BackendRegistry::new();
        registry
            .register_class(
                BackendClass::new("com.shop.model", "OrderDTO").with_field(BackendField::new(
                    "opaque",
                    BackendType::Object("org.vendor.Opaque".to_string()),
                )),
            )
            .unwrap();

        let modules = modules();
        let mapper = TypeMapper::new();
        let generator = EmptyImplementationGenerator;

        let model = convert_with(
            &registry,
            &modules,
            &mapper,
            &generator,
            MissingTypePolicy::Any,
        )
        .unwrap();
        let decl = model
            .find_decl(&TypeRef::new("model", "OrderDTO"))
            .unwrap();
        match decl {
            TsDecl::Class(c) => assert_eq!(c.fields[0].ty, TsType::Any),
            TsDecl::Enum(_) => panic!("expected class"),
        }

        let err = convert_with(
            &registry,
            &modules,
            &mapper,
            &generator,
            MissingTypePolicy::Fail,
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::MappingGap(name) if name == "org.vendor.Opaque"));
    }

    #[test]
    fn test_override_beats_conversion() {
        let registry = order_registry();
        let modules = modules();
        let mapper =
            TypeMapper::new().with_override("com.shop.enums.OrderStatus", TsType::String);
        let generator = EmptyImplementationGenerator;
        let model = convert_with(
            &registry,
            &modules,
            &mapper,
            &generator,
            MissingTypePolicy::Fail,
        )
        .unwrap();

        // The enum is mapped away, never converted.
        assert!(model
            .find_decl(&TypeRef::new("model-enums", "OrderStatus"))
            .is_none());
        match model.find_decl(&TypeRef::new("model", "OrderDTO")).unwrap() {
            TsDecl::Class(c) => assert_eq!(c.fields[1].ty, TsType::String),
            TsDecl::Enum(_) => panic!("expected class"),
        }
    }

    #[test]
    fn test_rest_class_decoration() {
        let registry = order_registry();
        let modules = modules();
        let mapper = TypeMapper::new();
        let generator = AngularGenerator::new();
        let model = convert_with(
            &registry,
            &modules,
            &mapper,
            &generator,
            MissingTypePolicy::Fail,
        )
        .unwrap();

        let ctrl = match model
            .find_decl(&TypeRef::new("services", "OrderCtrl"))
            .unwrap()
        {
            TsDecl::Class(c) => c,
            TsDecl::Enum(_) => panic!("expected class"),
        };
        assert!(ctrl.rest);
        assert_eq!(ctrl.fields.len(), 1);
        assert_eq!(ctrl.fields[0].name, "httpService");
        assert!(ctrl.methods[0].constructor);
        assert_eq!(ctrl.methods[0].params.len(), 1);

        let get_order = &ctrl.methods[1];
        assert_eq!(get_order.return_type.to_typescript(), "Observable<OrderDTO>");
        assert_eq!(ctrl.decorators[0].to_typescript(), "@Injectable()");
        assert!(ctrl
            .scoped_usages
            .contains(&TypeRef::new("rxjs/Subject", "Subject")));
        assert!(ctrl
            .scoped_usages
            .contains(&TypeRef::new("model", "OrderDTO")));
    }

    #[test]
    fn test_superclass_conversion() {
        let mut registry = BackendRegistry::new();
        registry
            .register_class(
                BackendClass::new("com.shop.model", "BaseDTO")
                    .with_field(BackendField::new("id", BackendType::Long)),
            )
            .unwrap();
        registry
            .register_class(
                BackendClass::new("com.shop.model", "OrderDTO").extends("com.shop.model.BaseDTO"),
            )
            .unwrap();

        let modules = modules();
        let mapper = TypeMapper::new();
        let generator = EmptyImplementationGenerator;
        let model = convert_with(
            &registry,
            &modules,
            &mapper,
            &generator,
            MissingTypePolicy::Fail,
        )
        .unwrap();

        match model.find_decl(&TypeRef::new("model", "OrderDTO")).unwrap() {
            TsDecl::Class(c) => {
                assert_eq!(c.superclass, Some(TypeRef::new("model", "BaseDTO")));
                assert!(c.scoped_usages.contains(&TypeRef::new("model", "BaseDTO")));
            }
            TsDecl::Enum(_) => panic!("expected class"),
        }
    }

    #[test]
    fn test_memoized_conversion_is_deterministic() {
        let registry = order_registry();
        let modules = modules();
        let mapper = TypeMapper::new();
        let generator = AngularGenerator::new();

        let first = convert_with(
            &registry,
            &modules,
            &mapper,
            &generator,
            MissingTypePolicy::Fail,
        )
        .unwrap();
        let second = convert_with(
            &registry,
            &modules,
            &mapper,
            &generator,
            MissingTypePolicy::Fail,
        )
        .unwrap();

        let names = |model: &TypeModel| -> Vec<(String, Vec<String>)> {
            model
                .modules()
                .iter()
                .map(|m| {
                    (
                        m.spec.name.clone(),
                        m.decls.iter().map(|d| d.name().to_string()).collect(),
                    )
                })
                .collect()
        };
        assert_eq!(names(&first), names(&second));
    }
}
