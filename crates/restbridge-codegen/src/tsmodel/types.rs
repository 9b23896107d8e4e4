/// Reference to a declared type: `(module, name)`.
///
/// Also covers functions-as-types such as decorator factories imported from
/// library modules; import computation does not distinguish callables from
/// classes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeRef {
    /// Owning module name. For external modules this doubles as the import
    /// path.
    pub module: String,

    /// Declared type name.
    pub name: String,
}

impl TypeRef {
    /// Create a reference.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

/// TypeScript type expressions.
///
/// Primitives are unit variants, so "is this field exactly the `number`
/// type" is a plain `==` comparison and the mapper trivially returns the
/// same value on every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TsType {
    Any,
    Void,
    Number,
    Boolean,
    String,
    Date,
    /// Homogeneous array, `T[]`.
    Array(Box<TsType>),
    /// Reference to a declared type.
    Ref(TypeRef),
    /// Generic type applied to arguments, `Base<A, B>`. Structurally
    /// derived, never separately declared.
    Parameterized { base: TypeRef, args: Vec<TsType> },
}

impl TsType {
    /// Shorthand for a declared-type reference.
    pub fn reference(module: impl Into<String>, name: impl Into<String>) -> Self {
        TsType::Ref(TypeRef::new(module, name))
    }

    /// Parse a primitive name as written in type-override configuration.
    pub fn parse_primitive(name: &str) -> Option<Self> {
        match name {
            "any" => Some(TsType::Any),
            "void" => Some(TsType::Void),
            "number" => Some(TsType::Number),
            "boolean" => Some(TsType::Boolean),
            "string" => Some(TsType::String),
            "date" | "Date" => Some(TsType::Date),
            _ => None,
        }
    }

    /// Generate the TypeScript source form.
    pub fn to_typescript(&self) -> String {
        match self {
            TsType::Any => "any".to_string(),
            TsType::Void => "void".to_string(),
            TsType::Number => "number".to_string(),
            TsType::Boolean => "boolean".to_string(),
            TsType::String => "string".to_string(),
            TsType::Date => "Date".to_string(),
            TsType::Array(inner) => format!("{}[]", inner.to_typescript()),
            TsType::Ref(r) => r.name.clone(),
            TsType::Parameterized { base, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_typescript()).collect();
                format!("{}<{}>", base.name, args.join(", "))
            }
        }
    }

    /// Collect every declared-type reference inside this expression.
    pub fn collect_refs(&self, out: &mut Vec<TypeRef>) {
        match self {
            TsType::Array(inner) => inner.collect_refs(out),
            TsType::Ref(r) => out.push(r.clone()),
            TsType::Parameterized { base, args } => {
                out.push(base.clone());
                for arg in args {
                    arg.collect_refs(out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_rendering() {
        assert_eq!(TsType::Number.to_typescript(), "number");
        assert_eq!(TsType::Date.to_typescript(), "Date");
        assert_eq!(
            TsType::Array(Box::new(TsType::String)).to_typescript(),
            "string[]"
        );
    }

    #[test]
    fn test_reference_rendering() {
        let order = TsType::reference("model", "Order");
        assert_eq!(order.to_typescript(), "Order");

        let observable = TsType::Parameterized {
            base: TypeRef::new("rxjs/Observable", "Observable"),
            args: vec![order],
        };
        assert_eq!(observable.to_typescript(), "Observable<Order>");
    }

    #[test]
    fn test_primitive_identity_is_stable() {
        // Repeated construction compares equal; generators rely on this.
        assert_eq!(TsType::Number, TsType::Number);
        assert_ne!(TsType::Number, TsType::String);
    }

    #[test]
    fn test_parse_primitive() {
        assert_eq!(TsType::parse_primitive("number"), Some(TsType::Number));
        assert_eq!(TsType::parse_primitive("date"), Some(TsType::Date));
        assert_eq!(TsType::parse_primitive("Order"), None);
    }

    #[test]
    fn test_collect_refs() {
        let ty = TsType::Parameterized {
            base: TypeRef::new("rxjs/Observable", "Observable"),
            args: vec![TsType::Array(Box::new(TsType::reference("model", "Order")))],
        };
        let mut refs = Vec::new();
        ty.collect_refs(&mut refs);
        assert_eq!(
            refs,
            vec![
                TypeRef::new("rxjs/Observable", "Observable"),
                TypeRef::new("model", "Order"),
            ]
        );
    }
}
