//! Sectional: a dynamic content-schema engine
//!
//! Administrators define *sections*, small content types described by an
//! ordered list of typed fields, at runtime. Data entries are stored as
//! free-form JSON objects validated and coerced against their section's
//! schema on the way in. A generic form renderer and a REST surface are
//! derived from the schema, so adding a new content type never requires
//! a code change.
//!
//! The same engine can be mounted several times under different URL
//! prefixes, each with its own independent store.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use sectional_core::config::SectionalConfig;
//! use sectional_core::http::{build_router, HttpServer, Namespace};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = SectionalConfig::load()?;
//! config.validate()?;
//!
//! let namespaces: Vec<_> =
//!     config.engine.namespaces.iter().map(|p| Arc::new(Namespace::new(p))).collect();
//! let router = build_router(namespaces, config.auth.clone());
//!
//! HttpServer::new(router, config.server.max_body_size)
//!     .serve(config.server.socket_addr()?)
//!     .await
//! # }
//! ```

pub mod admin;
pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod logging;
pub mod model;
pub mod store;

pub use catalog::{FieldType, Widget};
pub use error::{EngineError, Result};
pub use model::{Field, Section, SectionDataEntry, SectionKind};
pub use store::{new_stores, EntryStore, SchemaStore};
