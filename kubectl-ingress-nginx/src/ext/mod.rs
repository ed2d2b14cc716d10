//! Extensions to `k8s_openapi` types.
//!
//! The traits here add the lookups the plugin performs on pods and services,
//! so the command code reads in terms of the domain rather than of nested
//! optional fields.

mod pod;
mod service;

pub use self::{pod::PodExt, service::ServiceExt};
