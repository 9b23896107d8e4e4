use std::collections::BTreeSet;

use restbridge_core::descriptor::{EndpointMapping, ParamBinding};

use super::types::{TsType, TypeRef};

/// Declaration shape of a complex type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexKind {
    Class,
    Interface,
}

/// A class or interface in the target model.
#[derive(Debug, Clone)]
pub struct TsClass {
    /// Declared name.
    pub name: String,

    /// Owning module name. A type belongs to exactly one module.
    pub module: String,

    /// Class vs interface.
    pub kind: ComplexKind,

    /// Supertype, if any.
    pub superclass: Option<TypeRef>,

    /// Ordered field list; constructor parameter lists follow this order.
    pub fields: Vec<TsField>,

    /// Ordered method list.
    pub methods: Vec<TsMethod>,

    /// Attached decorators.
    pub decorators: Vec<TsDecorator>,

    /// Import requirements: every type referenced anywhere in this class.
    pub scoped_usages: BTreeSet<TypeRef>,

    /// Explicit REST classification, decided once at conversion time.
    pub rest: bool,

    /// Class-level endpoint mapping (base path), present on REST classes.
    pub endpoint: Option<EndpointMapping>,
}

impl TsClass {
    /// Create an empty class declaration.
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            kind: ComplexKind::Class,
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
            decorators: Vec::new(),
            scoped_usages: BTreeSet::new(),
            rest: false,
            endpoint: None,
        }
    }

    /// Reference to this declaration.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.module.clone(), self.name.clone())
    }

    /// Record an import requirement.
    pub fn add_scoped_usage(&mut self, r: TypeRef) {
        self.scoped_usages.insert(r);
    }

    /// Record the import requirements of a type expression.
    pub fn register_type(&mut self, ty: &TsType) {
        let mut refs = Vec::new();
        ty.collect_refs(&mut refs);
        for r in refs {
            self.add_scoped_usage(r);
        }
    }
}

/// A field of a complex type.
#[derive(Debug, Clone, PartialEq)]
pub struct TsField {
    /// Field name.
    pub name: String,

    /// Declared type.
    pub ty: TsType,

    /// Rendered with a `?` marker.
    pub optional: bool,

    /// Rendered as `T | null`.
    pub nullable: bool,
}

impl TsField {
    /// Create a required, non-nullable field.
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            nullable: false,
        }
    }
}

/// A method of a complex type.
#[derive(Debug, Clone)]
pub struct TsMethod {
    /// Method name.
    pub name: String,

    /// Declared return type, after any generator wrapping.
    pub return_type: TsType,

    /// Ordered parameter list.
    pub params: Vec<TsParameter>,

    /// Constructor flag; constructors render without a name or return type.
    pub constructor: bool,

    /// REST mapping metadata; absent on constructors and plain methods.
    pub endpoint: Option<EndpointMapping>,

    /// Attached decorators.
    pub decorators: Vec<TsDecorator>,
}

impl TsMethod {
    /// Create a plain method with a void return type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: TsType::Void,
            params: Vec::new(),
            constructor: false,
            endpoint: None,
            decorators: Vec::new(),
        }
    }

    /// Create a constructor.
    pub fn constructor() -> Self {
        Self {
            name: "constructor".to_string(),
            return_type: TsType::Void,
            params: Vec::new(),
            constructor: true,
            endpoint: None,
            decorators: Vec::new(),
        }
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TsParameter {
    /// Parameter name.
    pub name: String,

    /// Declared type.
    pub ty: TsType,

    /// Rendered with a `?` marker.
    pub optional: bool,

    /// Absent values permitted; guards query-parameter serialization.
    pub nullable: bool,

    /// HTTP binding carried over from the backend descriptor.
    pub binding: Option<ParamBinding>,
}

impl TsParameter {
    /// Create a required, unbound parameter.
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            nullable: false,
            binding: None,
        }
    }
}

/// A decorator attached to a class or method.
///
/// The decorated function contributes an import requirement like any other
/// scoped type usage.
#[derive(Debug, Clone, PartialEq)]
pub struct TsDecorator {
    /// The decorator function.
    pub func: TypeRef,
}

impl TsDecorator {
    /// Create a decorator.
    pub fn new(func: TypeRef) -> Self {
        Self { func }
    }

    /// Generate the TypeScript source form.
    pub fn to_typescript(&self) -> String {
        format!("@{}()", self.func.name)
    }
}

/// An enum in the target model, rendered as a string enum.
#[derive(Debug, Clone, PartialEq)]
pub struct TsEnum {
    /// Declared name.
    pub name: String,

    /// Owning module name.
    pub module: String,

    /// Ordered variant names; each variant is its own wire value.
    pub values: Vec<String>,
}

impl TsEnum {
    /// Create an enum declaration.
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            values: Vec::new(),
        }
    }

    /// Reference to this declaration.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.module.clone(), self.name.clone())
    }
}
