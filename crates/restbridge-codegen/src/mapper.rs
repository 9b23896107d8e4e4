//! Primitive type mapping.

use std::collections::HashMap;

use restbridge_core::descriptor::BackendType;

use crate::tsmodel::TsType;

/// Maps backend types onto target primitive type expressions.
///
/// A built-in default table is merged with caller-supplied overrides keyed
/// by qualified backend name; overrides take precedence. `None` means "not
/// a primitive, ask the model converter": the caller then converts the
/// referenced class or applies the missing-type policy.
///
/// Pure: no side effects, identical results on repeated calls.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    overrides: HashMap<String, TsType>,
}

impl TypeMapper {
    /// Create a mapper with the default table only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override for a qualified backend name.
    pub fn insert_override(&mut self, qualified: impl Into<String>, ty: TsType) {
        self.overrides.insert(qualified.into(), ty);
    }

    /// Builder form of [`insert_override`](Self::insert_override).
    pub fn with_override(mut self, qualified: impl Into<String>, ty: TsType) -> Self {
        self.insert_override(qualified, ty);
        self
    }

    /// Map a backend type to a target primitive expression.
    pub fn map(&self, ty: &BackendType) -> Option<TsType> {
        match ty {
            BackendType::Bool => Some(TsType::Boolean),
            BackendType::Int
            | BackendType::Long
            | BackendType::Float
            | BackendType::Double
            | BackendType::Decimal => Some(TsType::Number),
            BackendType::String | BackendType::Uuid => Some(TsType::String),
            BackendType::Date | BackendType::DateTime => Some(TsType::Date),
            BackendType::Void => Some(TsType::Void),
            BackendType::Json => Some(TsType::Any),
            BackendType::List(inner) => {
                self.map(inner).map(|t| TsType::Array(Box::new(t)))
            }
            BackendType::Optional(inner) => self.map(inner),
            BackendType::Object(qualified) => self.overrides.get(qualified).cloned(),
        }
    }
}
