use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Backend type information carried by descriptor documents.
///
/// The textual form used in descriptors is lowercase: `"string"`, `"long"`,
/// `"list<int>"`, `"optional<date>"`. Anything that is not a known primitive
/// or wrapper is an [`Object`](BackendType::Object) reference by qualified
/// name (`"com.shop.model.OrderDTO"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BackendType {
    /// Boolean
    Bool,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Arbitrary-precision decimal
    Decimal,
    /// Character string
    String,
    /// UUID, transported as a string
    Uuid,
    /// Calendar date
    Date,
    /// Date with time of day
    DateTime,
    /// No value (procedure return type)
    Void,
    /// Schemaless structured data
    Json,
    /// Homogeneous collection
    List(Box<BackendType>),
    /// Absent-permitting wrapper
    Optional(Box<BackendType>),
    /// Reference to a declared backend class or enum, by qualified name.
    Object(String),
}

impl BackendType {
    /// Parse the descriptor string form.
    pub fn from_type_string(type_str: &str) -> Self {
        let s = type_str.trim();
        match s {
            "bool" | "boolean" => BackendType::Bool,
            "int" | "i32" => BackendType::Int,
            "long" | "i64" => BackendType::Long,
            "float" | "f32" => BackendType::Float,
            "double" | "f64" => BackendType::Double,
            "decimal" => BackendType::Decimal,
            "string" => BackendType::String,
            "uuid" => BackendType::Uuid,
            "date" => BackendType::Date,
            "datetime" | "timestamp" => BackendType::DateTime,
            "void" => BackendType::Void,
            "json" => BackendType::Json,
            s if s.starts_with("list<") && s.ends_with('>') => {
                let inner = &s[5..s.len() - 1];
                BackendType::List(Box::new(BackendType::from_type_string(inner)))
            }
            s if s.starts_with("optional<") && s.ends_with('>') => {
                let inner = &s[9..s.len() - 1];
                BackendType::Optional(Box::new(BackendType::from_type_string(inner)))
            }
            s => BackendType::Object(s.to_string()),
        }
    }

    /// Check if this type permits an absent value.
    pub fn is_nullable(&self) -> bool {
        matches!(self, BackendType::Optional(_))
    }

    /// Qualified name of the referenced object type, if any.
    pub fn object_name(&self) -> Option<&str> {
        match self {
            BackendType::Object(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendType::Bool => write!(f, "bool"),
            BackendType::Int => write!(f, "int"),
            BackendType::Long => write!(f, "long"),
            BackendType::Float => write!(f, "float"),
            BackendType::Double => write!(f, "double"),
            BackendType::Decimal => write!(f, "decimal"),
            BackendType::String => write!(f, "string"),
            BackendType::Uuid => write!(f, "uuid"),
            BackendType::Date => write!(f, "date"),
            BackendType::DateTime => write!(f, "datetime"),
            BackendType::Void => write!(f, "void"),
            BackendType::Json => write!(f, "json"),
            BackendType::List(inner) => write!(f, "list<{}>", inner),
            BackendType::Optional(inner) => write!(f, "optional<{}>", inner),
            BackendType::Object(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for BackendType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BackendType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(BackendType::from_type_string(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        assert_eq!(BackendType::from_type_string("string"), BackendType::String);
        assert_eq!(BackendType::from_type_string("long"), BackendType::Long);
        assert_eq!(BackendType::from_type_string("bool"), BackendType::Bool);
        assert_eq!(
            BackendType::from_type_string("datetime"),
            BackendType::DateTime
        );
    }

    #[test]
    fn test_parse_wrappers() {
        assert_eq!(
            BackendType::from_type_string("list<int>"),
            BackendType::List(Box::new(BackendType::Int))
        );
        assert_eq!(
            BackendType::from_type_string("optional<string>"),
            BackendType::Optional(Box::new(BackendType::String))
        );
        assert_eq!(
            BackendType::from_type_string("list<optional<uuid>>"),
            BackendType::List(Box::new(BackendType::Optional(Box::new(
                BackendType::Uuid
            ))))
        );
    }

    #[test]
    fn test_parse_object() {
        assert_eq!(
            BackendType::from_type_string("com.shop.model.OrderDTO"),
            BackendType::Object("com.shop.model.OrderDTO".to_string())
        );
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["string", "list<long>", "optional<date>", "com.x.Y"] {
            assert_eq!(BackendType::from_type_string(s).to_string(), s);
        }
    }

    #[test]
    fn test_nullable() {
        assert!(BackendType::from_type_string("optional<string>").is_nullable());
        assert!(!BackendType::from_type_string("string").is_nullable());
    }

    #[test]
    fn test_serde_string_form() {
        let ty: BackendType = serde_json::from_str("\"list<int>\"").unwrap();
        assert_eq!(ty, BackendType::List(Box::new(BackendType::Int)));
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"list<int>\"");
    }
}
