use serde::{Deserialize, Serialize};

use super::endpoint::{BackendMethod, EndpointMapping};
use super::types::BackendType;

/// Descriptor for a backend data or controller class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendClass {
    /// Package the class is declared in.
    pub package: String,

    /// Simple class name.
    pub name: String,

    /// Qualified name of the superclass, if any.
    #[serde(default)]
    pub superclass: Option<String>,

    /// Annotation names present on the class, predicate-testable.
    #[serde(default)]
    pub annotations: Vec<String>,

    /// Ordered field list.
    #[serde(default)]
    pub fields: Vec<BackendField>,

    /// Ordered method list.
    #[serde(default)]
    pub methods: Vec<BackendMethod>,

    /// Class-level endpoint mapping. Present if and only if the class is a
    /// REST class.
    #[serde(default)]
    pub endpoint: Option<EndpointMapping>,
}

impl BackendClass {
    /// Create a class with no members.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            superclass: None,
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            endpoint: None,
        }
    }

    /// Qualified name, `package.Name`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }

    /// A class is a REST class iff it carries a class-level endpoint mapping.
    pub fn is_rest(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Check for an annotation by name.
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    /// Add a field.
    pub fn with_field(mut self, field: BackendField) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a method.
    pub fn with_method(mut self, method: BackendMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Attach the class-level endpoint mapping.
    pub fn with_endpoint(mut self, endpoint: EndpointMapping) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Set the superclass by qualified name.
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, name: impl Into<String>) -> Self {
        self.annotations.push(name.into());
        self
    }
}

/// Field descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendField {
    /// Field name, used verbatim in the generated client.
    pub name: String,

    /// Field type.
    #[serde(rename = "type")]
    pub ty: BackendType,

    /// Whether the field may be omitted during serialization.
    #[serde(default)]
    pub optional: bool,

    /// Whether an absent value is permitted.
    #[serde(default)]
    pub nullable: bool,
}

impl BackendField {
    /// Create a required field.
    pub fn new(name: impl Into<String>, ty: BackendType) -> Self {
        let nullable = ty.is_nullable();
        Self {
            name: name.into(),
            ty,
            optional: false,
            nullable,
        }
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the field nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Enum descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEnum {
    /// Package the enum is declared in.
    pub package: String,

    /// Simple enum name.
    pub name: String,

    /// Ordered variant names, serialized as their own wire values.
    pub values: Vec<String>,
}

impl BackendEnum {
    /// Create an enum.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Qualified name, `package.Name`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }

    /// Add a variant.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::HttpVerb;

    #[test]
    fn test_qualified_name() {
        let class = BackendClass::new("com.shop.model", "OrderDTO");
        assert_eq!(class.qualified_name(), "com.shop.model.OrderDTO");
    }

    #[test]
    fn test_rest_classification() {
        let plain = BackendClass::new("com.shop.model", "OrderDTO");
        assert!(!plain.is_rest());

        let rest = BackendClass::new("com.shop.ctrl", "OrderCtrl")
            .with_endpoint(EndpointMapping::base_path("/orders"));
        assert!(rest.is_rest());
        assert_eq!(rest.endpoint.as_ref().unwrap().path(), "/orders");
    }

    #[test]
    fn test_field_nullability_from_type() {
        let field = BackendField::new(
            "note",
            BackendType::Optional(Box::new(BackendType::String)),
        );
        assert!(field.nullable);
        assert!(!BackendField::new("id", BackendType::Long).nullable);
    }

    #[test]
    fn test_descriptor_json() {
        let json = r#"{
            "package": "com.shop.ctrl",
            "name": "OrderCtrl",
            "annotations": ["RestController"],
            "endpoint": {"paths": ["/orders"]},
            "methods": [
                {
                    "name": "getOrder",
                    "return_type": "com.shop.model.OrderDTO",
                    "endpoint": {"methods": ["GET"], "paths": ["/{id}"]},
                    "params": [
                        {"name": "id", "type": "long", "binding": {"path": {}}}
                    ]
                }
            ]
        }"#;

        let class: BackendClass = serde_json::from_str(json).unwrap();
        assert!(class.is_rest());
        assert!(class.has_annotation("RestController"));
        let method = &class.methods[0];
        assert_eq!(method.endpoint.as_ref().unwrap().verb(), Some(HttpVerb::Get));
        assert_eq!(
            method.return_type,
            BackendType::Object("com.shop.model.OrderDTO".to_string())
        );
    }
}
