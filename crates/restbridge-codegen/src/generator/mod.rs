//! The implementation-generator capability contract.
//!
//! Everything framework-specific (transport client names, reactive wrapper
//! types, decorator names, method-body text) lives behind this trait. The
//! converter and renderer consume it polymorphically, so one target model
//! can be lowered for different client frameworks by swapping the concrete
//! generator.

mod angular;

pub use angular::AngularGenerator;

use std::io::Write;

use restbridge_core::Result;

use crate::tsmodel::{TsClass, TsDecorator, TsField, TsMethod, TsParameter, TsType, TypeRef};

/// Capability contract a client framework implements.
pub trait ImplementationGenerator {
    /// Wrap a method's declared return type (e.g. in an async wrapper) when
    /// the owning class is a REST class; identity otherwise.
    fn map_return_type(&self, _class: &TsClass, _method: &TsMethod, ty: TsType) -> TsType {
        ty
    }

    /// Extra fields injected into REST classes (e.g. the transport client);
    /// empty otherwise. Ordering is preserved.
    fn implementation_specific_fields(&self, _class: &TsClass) -> Vec<TsField> {
        Vec::new()
    }

    /// Extra parameters for a method: constructor parameters mirroring the
    /// injected fields, or an explicit empty override where the framework
    /// demands one.
    fn implementation_specific_parameters(
        &self,
        _class: &TsClass,
        _method: &TsMethod,
    ) -> Vec<TsParameter> {
        Vec::new()
    }

    /// Decorators attached to the class.
    fn class_decorators(&self, _class: &TsClass) -> Vec<TsDecorator> {
        Vec::new()
    }

    /// Decorators attached to a method.
    fn method_decorators(&self, _class: &TsClass, _method: &TsMethod) -> Vec<TsDecorator> {
        Vec::new()
    }

    /// Import requirements implied by generated bodies: types that never
    /// appear as a field or parameter type but are referenced by the
    /// emitted code.
    fn complex_type_usages(&self, _class: &TsClass) -> Vec<TypeRef> {
        Vec::new()
    }

    /// Render the executable body of a method into `out`.
    ///
    /// Three method shapes are handled: constructors (assign injected
    /// fields from matching parameters), REST endpoint methods, and plain
    /// passthrough methods (no body emitted). A REST-class method that fits
    /// none of these is a configuration error.
    fn write_method(&self, out: &mut dyn Write, class: &TsClass, method: &TsMethod) -> Result<()>;
}

/// Generator that emits declarations only, with empty bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyImplementationGenerator;

impl ImplementationGenerator for EmptyImplementationGenerator {
    fn write_method(
        &self,
        _out: &mut dyn Write,
        _class: &TsClass,
        _method: &TsMethod,
    ) -> Result<()> {
        Ok(())
    }
}
