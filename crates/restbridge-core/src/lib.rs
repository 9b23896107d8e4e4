//! Core types for restbridge: backend descriptor model, class selection,
//! naming, and configuration.
//!
//! The generation engine never inspects a live backend. It consumes
//! declarative descriptor documents describing classes, fields, endpoints
//! and parameter bindings, which a reflective or schema-based front end
//! produces ahead of time.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod filter;
pub mod names;

pub use config::{Config, MissingTypePolicy, ModuleEntry};
pub use descriptor::{
    BackendClass, BackendEnum, BackendField, BackendMethod, BackendParam, BackendRegistry,
    BackendType, EndpointMapping, HttpVerb, ParamBinding,
};
pub use error::{BridgeError, Result};
pub use filter::ClassFilter;
pub use names::NameMapper;
