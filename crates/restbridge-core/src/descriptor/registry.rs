use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{BridgeError, Result};

use super::class::{BackendClass, BackendEnum};

/// Registry of all backend classes and enums visible to a generation run.
///
/// Insertion order is preserved so repeated runs over the same descriptors
/// produce identical output.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    classes: Vec<BackendClass>,
    enums: Vec<BackendEnum>,
    class_index: HashMap<String, usize>,
    enum_index: HashMap<String, usize>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. Duplicate qualified names are a descriptor error.
    pub fn register_class(&mut self, class: BackendClass) -> Result<()> {
        let qualified = class.qualified_name();
        if self.class_index.contains_key(&qualified) {
            return Err(BridgeError::Descriptor(format!(
                "duplicate class `{}`",
                qualified
            )));
        }
        self.class_index.insert(qualified, self.classes.len());
        self.classes.push(class);
        Ok(())
    }

    /// Register an enum. Duplicate qualified names are a descriptor error.
    pub fn register_enum(&mut self, enum_def: BackendEnum) -> Result<()> {
        let qualified = enum_def.qualified_name();
        if self.enum_index.contains_key(&qualified) {
            return Err(BridgeError::Descriptor(format!(
                "duplicate enum `{}`",
                qualified
            )));
        }
        self.enum_index.insert(qualified, self.enums.len());
        self.enums.push(enum_def);
        Ok(())
    }

    /// Look up a class by qualified name.
    pub fn get_class(&self, qualified: &str) -> Option<&BackendClass> {
        self.class_index.get(qualified).map(|&i| &self.classes[i])
    }

    /// Look up an enum by qualified name.
    pub fn get_enum(&self, qualified: &str) -> Option<&BackendEnum> {
        self.enum_index.get(qualified).map(|&i| &self.enums[i])
    }

    /// All registered classes, in registration order.
    pub fn classes(&self) -> &[BackendClass] {
        &self.classes
    }

    /// All registered enums, in registration order.
    pub fn enums(&self) -> &[BackendEnum] {
        &self.enums
    }

    /// Check whether `class` transitively extends the named type.
    pub fn extends(&self, class: &BackendClass, ancestor_qualified: &str) -> bool {
        let mut current = class.superclass.as_deref();
        while let Some(qualified) = current {
            if qualified == ancestor_qualified {
                return true;
            }
            current = self
                .get_class(qualified)
                .and_then(|c| c.superclass.as_deref());
        }
        false
    }

    /// Merge a parsed descriptor document into the registry.
    pub fn merge(&mut self, doc: DescriptorDoc) -> Result<()> {
        for class in doc.classes {
            self.register_class(class)?;
        }
        for enum_def in doc.enums {
            self.register_enum(enum_def)?;
        }
        Ok(())
    }

    /// Load every `*.json` descriptor file under a directory.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(BridgeError::Descriptor(format!(
                "descriptor directory `{}` does not exist",
                dir.display()
            )));
        }

        let mut registry = Self::new();

        let mut files: Vec<_> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        // Directory iteration order is platform-dependent.
        files.sort();

        for path in files {
            let content = std::fs::read_to_string(&path)?;
            let doc = parse_descriptor(&content)
                .map_err(|e| BridgeError::Descriptor(format!("{}: {}", path.display(), e)))?;
            tracing::debug!(file = ?path, "Loaded descriptor document");
            registry.merge(doc)?;
        }

        Ok(registry)
    }
}

/// One descriptor document.
#[derive(Debug, Default, Deserialize)]
pub struct DescriptorDoc {
    /// Backend classes declared by this document.
    #[serde(default)]
    pub classes: Vec<BackendClass>,

    /// Backend enums declared by this document.
    #[serde(default)]
    pub enums: Vec<BackendEnum>,
}

/// Parse a descriptor document from JSON text.
pub fn parse_descriptor(content: &str) -> Result<DescriptorDoc> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> &'static str {
        r#"{
            "classes": [
                {"package": "com.shop.model", "name": "OrderDTO",
                 "fields": [{"name": "id", "type": "long"}]},
                {"package": "com.shop.model", "name": "ProductDTO"}
            ],
            "enums": [
                {"package": "com.shop.enums", "name": "OrderStatus",
                 "values": ["NEW", "SHIPPED"]}
            ]
        }"#
    }

    #[test]
    fn test_merge_and_lookup() {
        let mut registry = BackendRegistry::new();
        registry.merge(parse_descriptor(sample_doc()).unwrap()).unwrap();

        assert_eq!(registry.classes().len(), 2);
        assert!(registry.get_class("com.shop.model.OrderDTO").is_some());
        assert!(registry.get_enum("com.shop.enums.OrderStatus").is_some());
        assert!(registry.get_class("com.shop.model.Missing").is_none());
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut registry = BackendRegistry::new();
        registry
            .register_class(BackendClass::new("com.shop.model", "OrderDTO"))
            .unwrap();
        let err = registry
            .register_class(BackendClass::new("com.shop.model", "OrderDTO"))
            .unwrap_err();
        assert!(matches!(err, BridgeError::Descriptor(_)));
    }

    #[test]
    fn test_extends_chain() {
        let mut registry = BackendRegistry::new();
        registry
            .register_class(BackendClass::new("com.shop.core", "BaseDTO"))
            .unwrap();
        registry
            .register_class(
                BackendClass::new("com.shop.model", "OrderDTO").extends("com.shop.core.BaseDTO"),
            )
            .unwrap();
        registry
            .register_class(
                BackendClass::new("com.shop.model", "SpecialOrderDTO")
                    .extends("com.shop.model.OrderDTO"),
            )
            .unwrap();

        let special = registry.get_class("com.shop.model.SpecialOrderDTO").unwrap();
        assert!(registry.extends(special, "com.shop.core.BaseDTO"));
        assert!(registry.extends(special, "com.shop.model.OrderDTO"));
        assert!(!registry.extends(special, "com.shop.core.Other"));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.json"), sample_doc()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = BackendRegistry::load_dir(dir.path()).unwrap();
        assert_eq!(registry.classes().len(), 2);
        assert_eq!(registry.enums().len(), 1);
    }
}
