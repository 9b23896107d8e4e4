//! The target type model: in-memory representation of the to-be-generated
//! client code's modules, classes, fields, methods and type expressions.

mod class;
mod module;
mod types;

pub use class::{
    ComplexKind, TsClass, TsDecorator, TsEnum, TsField, TsMethod, TsParameter,
};
pub use module::{ModuleSpec, TsDecl, TsModule, TypeModel};
pub use types::{TsType, TypeRef};
