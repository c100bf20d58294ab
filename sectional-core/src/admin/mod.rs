//! Administrative surfaces
//!
//! [`editor::SchemaEditor`] is the surface for defining sections and their
//! field lists; [`manager::InstanceManager`] is the surface for working
//! with the records of one chosen section.

pub mod editor;
pub mod manager;

pub use editor::SchemaEditor;
pub use manager::{EntryRow, EntryRowState, InstanceManager};
