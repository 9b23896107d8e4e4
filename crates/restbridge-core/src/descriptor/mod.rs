//! Backend descriptor model.
//!
//! Value objects describing the backend classes a generation run consumes:
//! data-transfer classes, REST controllers, their fields, methods and the
//! endpoint metadata (HTTP verbs, path templates, media types, parameter
//! bindings) attached to them.

mod class;
mod endpoint;
mod registry;
mod types;

pub use class::{BackendClass, BackendEnum, BackendField};
pub use endpoint::{BackendMethod, BackendParam, EndpointMapping, HttpVerb, ParamBinding};
pub use registry::{parse_descriptor, BackendRegistry, DescriptorDoc};
pub use types::BackendType;
