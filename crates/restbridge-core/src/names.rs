use serde::{Deserialize, Serialize};

/// Class-name rewriting applied when naming produced target types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMapper {
    /// Keep the backend name unchanged.
    #[default]
    Identity,
    /// Replace every occurrence of `from` with `to`. Stripping a suffix is
    /// a substitution with an empty `to`.
    Substitute { from: String, to: String },
}

impl NameMapper {
    /// Create a substitution mapper.
    pub fn substitute(from: impl Into<String>, to: impl Into<String>) -> Self {
        NameMapper::Substitute {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Apply the mapping to a class name.
    pub fn map(&self, name: &str) -> String {
        match self {
            NameMapper::Identity => name.to_string(),
            NameMapper::Substitute { from, to } => name.replace(from.as_str(), to),
        }
    }
}
