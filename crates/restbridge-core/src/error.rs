use thiserror::Error;

/// Core error type for restbridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Descriptor error: {0}")]
    Descriptor(String),

    #[error("No module assigned to package `{0}`")]
    UnmappedPackage(String),

    #[error("No type mapping or class definition for `{0}`")]
    MappingGap(String),

    #[error("Method `{0}` is neither a constructor nor a REST endpoint")]
    UnclassifiableMethod(String),

    #[error("Rendering inconsistency: {0}")]
    Rendering(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::Descriptor(e.to_string())
    }
}

/// Result type alias using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;
