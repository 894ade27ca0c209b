//! plugscan registry
//!
//! Core types for the plugin registry: plugin specifications, entry points,
//! the grouped entry point dictionary and the [`PluginCollector`] capability
//! that turns any source of specifications into that dictionary.
//!
//! The registry mirrors the Python packaging entry point convention: each
//! group maps to a list of `name=module:attr` strings.

pub mod collector;
pub mod entry_point;
pub mod errors;
pub mod parser;
pub mod types;
pub mod writer;

pub use collector::PluginCollector;
pub use entry_point::{spec_to_entry_point, to_entry_point_dict, EntryPoint, EntryPointDict};
pub use errors::RegistryError;
pub use parser::parse_entry_points_txt;
pub use types::{FactoryKind, FactoryRef, PluginSpec};
pub use writer::{render, write_to_path, RegistryFormat};
