//! xmldb-loader - Load XML exports into a MongoDB collection.
//!
//! Each direct child of the XML root becomes one document. Conversion keeps
//! attributes as `@name` fields, groups repeated child tags into lists and
//! records the source tag in `_type`.
//!
//! # Example
//!
//! ```
//! use xmldb_loader::{assemble_documents, collection_name_from_path, Element};
//!
//! let root = Element::parse(r#"<draws><draw n="1">4 8 15</draw><draw n="2"/></draws>"#).unwrap();
//! let docs = assemble_documents(&root);
//! assert_eq!(docs.len(), 2);
//! assert_eq!(docs[0].type_name(), Some("draw"));
//!
//! assert_eq!(collection_name_from_path("draw-results 2024.xml"), "draw_results_2024");
//! ```
//!
//! # Architecture
//!
//! - [`xml`]: XML loading into an owned element tree
//! - [`convert`]: element to value conversion and document assembly
//! - [`types`]: converted values, fields and documents
//! - [`json`]: JSON snapshot output
//! - [`store`]: document store trait and MongoDB client
//! - [`loader`]: load service and progress observer
//! - [`config`]: defaults, connection settings and name helpers
//! - [`error`]: error types and Result alias
//! - [`cli`]: command-line interface

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod json;
pub mod loader;
pub mod store;
pub mod types;
pub mod xml;

// Re-export main functions
pub use convert::{assemble_documents, convert, documents, whole_document};
pub use loader::{run, run_with_store};

// Re-export commonly used items
pub use config::{collection_name_from_path, LoaderConfig};
pub use error::{LoaderError, Result};
pub use types::{ConvertedValue, Document, Field, Record};
pub use xml::Element;
