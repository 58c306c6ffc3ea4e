//! Loader service that ties all components together.
//!
//! load XML → assemble documents → optional JSON snapshot → insert.

use std::path::{Path, PathBuf};

use crate::config::{
    collection_name_from_path, default_json_path, validate_collection_name, LoaderConfig,
};
use crate::convert::{assemble_documents, whole_document};
use crate::error::Result;
use crate::json::save_json;
use crate::store::{insert_documents, DocumentStore, InsertOutcome, MongoStore};
use crate::types::Document;
use crate::xml::load_xml_file;

/// What to load and where the snapshot goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// XML source file.
    pub xml_path: PathBuf,

    /// Collection override (default: derived from the XML file name).
    pub collection: Option<String>,

    /// JSON snapshot path override (default: XML path with `.json`).
    pub json_output: Option<PathBuf>,

    /// Whether to write the JSON snapshot.
    pub write_json: bool,

    /// Store the whole tree as one document instead of one per root child.
    pub whole: bool,
}

impl LoadOptions {
    pub fn new(xml_path: impl Into<PathBuf>) -> Self {
        Self {
            xml_path: xml_path.into(),
            collection: None,
            json_output: None,
            write_json: true,
            whole: false,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_json_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_output = Some(path.into());
        self
    }

    pub fn without_json(mut self) -> Self {
        self.write_json = false;
        self
    }

    pub fn whole_document(mut self) -> Self {
        self.whole = true;
        self
    }

    /// Target collection: the override, or the sanitized file name.
    #[must_use]
    pub fn collection_name(&self) -> String {
        self.collection
            .clone()
            .unwrap_or_else(|| collection_name_from_path(&self.xml_path))
    }

    /// Snapshot location, or `None` when the snapshot is disabled.
    #[must_use]
    pub fn json_path(&self) -> Option<PathBuf> {
        if !self.write_json {
            return None;
        }
        Some(
            self.json_output
                .clone()
                .unwrap_or_else(|| default_json_path(&self.xml_path)),
        )
    }
}

/// Receives progress notifications from a load run.
///
/// All methods default to doing nothing.
pub trait LoadObserver {
    fn xml_loaded(&self, _path: &Path, _root_tag: &str) {}
    fn documents_assembled(&self, _count: usize) {}
    fn json_written(&self, _path: &Path) {}
    fn inserting(&self, _collection: &str, _count: usize) {}
    fn inserted(&self, _outcome: &InsertOutcome) {}
    fn nothing_to_insert(&self) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LoadObserver for NoopObserver {}

/// Result of a load run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub collection: String,
    pub documents: Vec<Document>,
    pub json_path: Option<PathBuf>,
    pub inserted: Option<InsertOutcome>,
}

/// Load the XML file and build documents, writing the JSON snapshot if enabled.
///
/// Nothing is sent to a store.
pub fn prepare(options: &LoadOptions, observer: &dyn LoadObserver) -> Result<LoadSummary> {
    let collection = options.collection_name();
    validate_collection_name(&collection)?;

    let root = load_xml_file(&options.xml_path)?;
    observer.xml_loaded(&options.xml_path, &root.tag);

    let documents = if options.whole {
        vec![whole_document(&root)]
    } else {
        assemble_documents(&root)
    };
    observer.documents_assembled(documents.len());

    let json_path = options.json_path();
    if let Some(path) = &json_path {
        save_json(&documents, path)?;
        observer.json_written(path);
    }

    Ok(LoadSummary {
        collection,
        documents,
        json_path,
        inserted: None,
    })
}

/// Run the full pipeline against the given store.
pub fn run_with_store(
    options: &LoadOptions,
    store: &mut dyn DocumentStore,
    observer: &dyn LoadObserver,
) -> Result<LoadSummary> {
    let summary = prepare(options, observer)?;
    if summary.documents.is_empty() {
        report_empty(options, observer);
        return Ok(summary);
    }
    store_documents(summary, store, observer)
}

/// Run the full pipeline against MongoDB.
///
/// Names are validated and the XML is converted before the store is opened,
/// so input errors never reach the database.
pub fn run(
    options: &LoadOptions,
    config: &LoaderConfig,
    observer: &dyn LoadObserver,
) -> Result<LoadSummary> {
    config.validate()?;

    let summary = prepare(options, observer)?;
    if summary.documents.is_empty() {
        report_empty(options, observer);
        return Ok(summary);
    }

    let mut store = MongoStore::connect(config, &summary.collection)?;
    store_documents(summary, &mut store, observer)
}

fn report_empty(options: &LoadOptions, observer: &dyn LoadObserver) {
    tracing::warn!(path = %options.xml_path.display(), "No documents to insert");
    observer.nothing_to_insert();
}

fn store_documents(
    mut summary: LoadSummary,
    store: &mut dyn DocumentStore,
    observer: &dyn LoadObserver,
) -> Result<LoadSummary> {
    observer.inserting(&summary.collection, summary.documents.len());
    summary.inserted = insert_documents(store, &summary.documents)?;
    if let Some(outcome) = &summary.inserted {
        observer.inserted(outcome);
    }
    Ok(summary)
}
