//! Document store client.
//!
//! [`DocumentStore`] is the seam between the loader and the database.
//! [`MongoStore`] implements it on the synchronous MongoDB driver; tests use
//! an in-memory store.

use mongodb::bson::{Bson, Document as BsonDocument};
use mongodb::sync::{Client, Collection};

use crate::config::{validate_collection_name, LoaderConfig};
use crate::error::{LoaderError, Result};
use crate::types::{ConvertedValue, Document, Field};

/// Identifiers reported by the store after an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A single document was inserted.
    One { id: String },

    /// A batch was inserted; ids are in batch order.
    Many { ids: Vec<String> },
}

impl InsertOutcome {
    /// Number of documents inserted.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::One { .. } => 1,
            Self::Many { ids } => ids.len(),
        }
    }
}

/// A collection that accepts fresh document inserts.
pub trait DocumentStore {
    /// Insert one document.
    fn insert_one(&mut self, document: &Document) -> Result<InsertOutcome>;

    /// Insert a batch of documents.
    ///
    /// A partially applied batch is reported through the returned error
    /// exactly as the backend describes it.
    fn insert_many(&mut self, documents: &[Document]) -> Result<InsertOutcome>;
}

/// Insert documents, picking the single or batch call by count.
///
/// Returns `None` without touching the store when there is nothing to insert.
pub fn insert_documents(
    store: &mut dyn DocumentStore,
    documents: &[Document],
) -> Result<Option<InsertOutcome>> {
    let outcome = match documents {
        [] => return Ok(None),
        [document] => store.insert_one(document)?,
        _ => store.insert_many(documents)?,
    };
    tracing::info!(count = outcome.count(), "Inserted documents");
    Ok(Some(outcome))
}

/// MongoDB collection handle.
#[derive(Debug)]
pub struct MongoStore {
    collection: Collection<BsonDocument>,
}

impl MongoStore {
    /// Open a handle on `collection` in the configured database.
    ///
    /// The driver connects lazily, so unreachable servers surface on the
    /// first insert.
    pub fn connect(config: &LoaderConfig, collection: &str) -> Result<Self> {
        config.validate()?;
        validate_collection_name(collection)?;

        let client = Client::with_uri_str(&config.connection_string).map_err(|source| {
            LoaderError::Storage {
                collection: collection.to_string(),
                source,
            }
        })?;

        tracing::debug!(
            database = %config.database,
            collection,
            "Opened document store"
        );

        Ok(Self {
            collection: client
                .database(&config.database)
                .collection::<BsonDocument>(collection),
        })
    }

    fn storage_error(&self, source: mongodb::error::Error) -> LoaderError {
        LoaderError::Storage {
            collection: self.collection.name().to_string(),
            source,
        }
    }
}

impl DocumentStore for MongoStore {
    fn insert_one(&mut self, document: &Document) -> Result<InsertOutcome> {
        let result = self
            .collection
            .insert_one(to_bson_document(document))
            .run()
            .map_err(|e| self.storage_error(e))?;

        Ok(InsertOutcome::One {
            id: id_to_string(&result.inserted_id),
        })
    }

    fn insert_many(&mut self, documents: &[Document]) -> Result<InsertOutcome> {
        let batch: Vec<BsonDocument> = documents.iter().map(to_bson_document).collect();
        let result = self
            .collection
            .insert_many(batch)
            .run()
            .map_err(|e| self.storage_error(e))?;

        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);

        Ok(InsertOutcome::Many {
            ids: ids.iter().map(|(_, id)| id_to_string(id)).collect(),
        })
    }
}

fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Encode a document as BSON, keeping field order.
pub fn to_bson_document(document: &Document) -> BsonDocument {
    document
        .fields()
        .iter()
        .map(|(key, field)| (key.clone(), field_to_bson(field)))
        .collect()
}

fn field_to_bson(field: &Field) -> Bson {
    match field {
        Field::Single(value) => value_to_bson(value),
        Field::List(values) => Bson::Array(values.iter().map(value_to_bson).collect()),
    }
}

fn value_to_bson(value: &ConvertedValue) -> Bson {
    match value {
        ConvertedValue::Absent => Bson::Null,
        ConvertedValue::Text(text) => Bson::String(text.clone()),
        ConvertedValue::Record(record) => Bson::Document(
            record
                .iter()
                .map(|(key, field)| (key.clone(), field_to_bson(field)))
                .collect(),
        ),
    }
}
