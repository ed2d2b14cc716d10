//! Command-line support shared by the ingress-nginx kubectl plugin.
//!
//! At the moment this is the logging configuration: the plugin writes its
//! primary output (tables, URLs, certificates) to stdout, so diagnostics are
//! routed elsewhere by [`config::LogConfig`].

pub mod config;
