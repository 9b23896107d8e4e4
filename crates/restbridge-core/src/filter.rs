//! Class selection predicates.
//!
//! Filters decide which backend classes participate in a generation run and
//! in which category (model vs REST). They are plain predicate trees over
//! the descriptor model: name substring, regex, annotation presence and
//! supertype tests, composable with and/or/not.

use regex::Regex;

use crate::descriptor::{BackendClass, BackendRegistry};
use crate::error::{BridgeError, Result};

/// Predicate tree selecting backend classes.
#[derive(Debug, Clone)]
pub enum ClassFilter {
    /// Accept every class.
    All,
    /// Accept classes carrying the named annotation.
    HasAnnotation(String),
    /// Accept classes whose simple name contains the substring.
    NameContains(String),
    /// Accept classes whose simple name matches the pattern.
    NameRegex(Regex),
    /// Accept classes that transitively extend the qualified type name.
    Extends(String),
    /// Accept classes matching every child filter.
    And(Vec<ClassFilter>),
    /// Accept classes matching any child filter.
    Or(Vec<ClassFilter>),
    /// Invert the child filter.
    Not(Box<ClassFilter>),
}

impl ClassFilter {
    /// Build a regex name filter, rejecting invalid patterns early.
    pub fn name_regex(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| BridgeError::Config(format!("invalid filter regex: {}", e)))?;
        Ok(ClassFilter::NameRegex(regex))
    }

    /// Evaluate the predicate against a class.
    ///
    /// The registry is consulted for supertype walks only.
    pub fn matches(&self, class: &BackendClass, registry: &BackendRegistry) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::HasAnnotation(name) => class.has_annotation(name),
            ClassFilter::NameContains(substr) => class.name.contains(substr.as_str()),
            ClassFilter::NameRegex(regex) => regex.is_match(&class.name),
            ClassFilter::Extends(ancestor) => registry.extends(class, ancestor),
            ClassFilter::And(children) => {
                children.iter().all(|f| f.matches(class, registry))
            }
            ClassFilter::Or(children) => children.iter().any(|f| f.matches(class, registry)),
            ClassFilter::Not(child) => !child.matches(class, registry),
        }
    }
}
