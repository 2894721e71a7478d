//! Whitelisted command model
//!
//! The catalog of approved commands and the builder that turns a catalog
//! entry plus parameters into a concrete command string.

pub mod builder;
pub mod catalog;
pub mod defaults;
pub mod definition;

// Re-exports
pub use builder::{build_command, Parameters};
pub use catalog::Catalog;
pub use defaults::default_commands;
pub use definition::{Category, CommandDefinition, ParamSpec};
