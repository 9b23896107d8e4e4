//! Endpoint metadata: HTTP verbs, mappings and parameter bindings.
//!
//! These value objects replace reflective annotation lookups: the converter
//! and the implementation generators read verbs, path templates, media types
//! and binding kinds from here and nowhere else.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::BackendType;

/// HTTP verbs understood by endpoint mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpVerb {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Head => "HEAD",
            HttpVerb::Options => "OPTIONS",
        }
    }

    /// Check if this verb carries an entity to the server.
    pub fn is_mutation(&self) -> bool {
        matches!(self, HttpVerb::Put | HttpVerb::Post)
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// REST mapping metadata attached to a class or a method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointMapping {
    /// HTTP verbs; the first one drives generation.
    #[serde(default)]
    pub methods: Vec<HttpVerb>,

    /// Path templates; the first declared path wins.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Consumed media types.
    #[serde(default)]
    pub consumes: Vec<String>,

    /// Produced media types.
    #[serde(default)]
    pub produces: Vec<String>,
}

impl EndpointMapping {
    /// Create a mapping with one verb and one path template.
    pub fn new(verb: HttpVerb, path: impl Into<String>) -> Self {
        Self {
            methods: vec![verb],
            paths: vec![path.into()],
            consumes: Vec::new(),
            produces: Vec::new(),
        }
    }

    /// Create a path-only mapping (class-level base path).
    pub fn base_path(path: impl Into<String>) -> Self {
        Self {
            paths: vec![path.into()],
            ..Self::default()
        }
    }

    /// Set the consumed media type.
    pub fn with_consumes(mut self, media: impl Into<String>) -> Self {
        self.consumes.push(media.into());
        self
    }

    /// Set the produced media type.
    pub fn with_produces(mut self, media: impl Into<String>) -> Self {
        self.produces.push(media.into());
        self
    }

    /// First declared path, empty when none is given.
    pub fn path(&self) -> &str {
        self.paths.first().map(String::as_str).unwrap_or("")
    }

    /// The verb driving generation, if any.
    pub fn verb(&self) -> Option<HttpVerb> {
        self.methods.first().copied()
    }
}

/// How a method parameter is bound into the HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamBinding {
    /// Sent as the request body.
    Body,
    /// Spliced into a `{name}` path placeholder.
    Path {
        /// Placeholder name; defaults to the parameter name.
        #[serde(default)]
        name: Option<String>,
    },
    /// Appended as a query parameter.
    Query {
        /// Query key; defaults to the parameter name.
        #[serde(default)]
        name: Option<String>,
    },
}

/// Method parameter descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendParam {
    /// Parameter name.
    pub name: String,

    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: BackendType,

    /// Whether the parameter may be omitted by callers.
    #[serde(default)]
    pub optional: bool,

    /// Whether an absent value is permitted.
    #[serde(default)]
    pub nullable: bool,

    /// Binding into the HTTP exchange; unbound when absent.
    #[serde(default)]
    pub binding: Option<ParamBinding>,
}

impl BackendParam {
    /// Create an unbound parameter.
    pub fn new(name: impl Into<String>, ty: BackendType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            nullable: false,
            binding: None,
        }
    }

    /// Attach a binding.
    pub fn with_binding(mut self, binding: ParamBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Mark the parameter optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the parameter nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Method descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendMethod {
    /// Method name, used verbatim in the generated client.
    pub name: String,

    /// Ordered parameter list.
    #[serde(default)]
    pub params: Vec<BackendParam>,

    /// Declared return type.
    #[serde(rename = "return_type", default = "default_return_type")]
    pub return_type: BackendType,

    /// Method-level endpoint mapping; absent on plain methods.
    #[serde(default)]
    pub endpoint: Option<EndpointMapping>,
}

fn default_return_type() -> BackendType {
    BackendType::Void
}

impl BackendMethod {
    /// Create a method with a void return type and no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: BackendType::Void,
            endpoint: None,
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, param: BackendParam) -> Self {
        self.params.push(param);
        self
    }

    /// Set the return type.
    pub fn returns(mut self, ty: BackendType) -> Self {
        self.return_type = ty;
        self
    }

    /// Attach the endpoint mapping.
    pub fn with_endpoint(mut self, endpoint: EndpointMapping) -> Self {
        self.endpoint = Some(endpoint);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_strings() {
        assert_eq!(HttpVerb::Put.as_str(), "PUT");
        assert_eq!(HttpVerb::Get.to_string(), "GET");
    }

    #[test]
    fn test_mutation_verbs() {
        assert!(HttpVerb::Put.is_mutation());
        assert!(HttpVerb::Post.is_mutation());
        assert!(!HttpVerb::Get.is_mutation());
        assert!(!HttpVerb::Delete.is_mutation());
    }

    #[test]
    fn test_first_path_wins() {
        let mapping = EndpointMapping {
            paths: vec!["/orders".to_string(), "/legacy-orders".to_string()],
            ..Default::default()
        };
        assert_eq!(mapping.path(), "/orders");
        assert_eq!(EndpointMapping::default().path(), "");
    }

    #[test]
    fn test_binding_serde() {
        let body: ParamBinding = serde_json::from_str("\"body\"").unwrap();
        assert_eq!(body, ParamBinding::Body);

        let path: ParamBinding = serde_json::from_str(r#"{"path": {"name": "id"}}"#).unwrap();
        assert_eq!(
            path,
            ParamBinding::Path {
                name: Some("id".to_string())
            }
        );

        let query: ParamBinding = serde_json::from_str(r#"{"query": {}}"#).unwrap();
        assert_eq!(query, ParamBinding::Query { name: None });
    }

    #[test]
    fn test_method_deserialization_defaults() {
        let method: BackendMethod = serde_json::from_str(r#"{"name": "ping"}"#).unwrap();
        assert_eq!(method.return_type, BackendType::Void);
        assert!(method.params.is_empty());
        assert!(method.endpoint.is_none());
    }
}
