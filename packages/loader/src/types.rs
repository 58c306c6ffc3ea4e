//! Core data types produced by conversion.
//!
//! Values serialize to JSON in their natural shape: records become objects
//! with insertion-ordered keys, leaf text becomes a string and an absent
//! value becomes `null`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key prefix for attribute fields.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Key holding element text when it sits next to attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Key added to every document naming the source element.
pub const TYPE_KEY: &str = "_type";

/// Key holding a leaf or absent value in a wrapped document.
pub const VALUE_KEY: &str = "value";

/// Insertion-ordered mapping from field key to field.
pub type Record = IndexMap<String, Field>;

/// Result of converting one XML element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConvertedValue {
    /// No attributes, no children and no meaningful text.
    Absent,

    /// No attributes, no children, non-empty trimmed text.
    Text(String),

    /// Attributes, children and text merged into named fields.
    Record(Record),
}

impl ConvertedValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl From<&str> for ConvertedValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// One record field: a single value, or several values from same-tag siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Single(ConvertedValue),
    List(Vec<ConvertedValue>),
}

impl Field {
    /// Build a field from same-tag values. One value stays single.
    #[must_use]
    pub fn from_values(mut values: Vec<ConvertedValue>) -> Self {
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                return Self::Single(value);
            }
        }
        Self::List(values)
    }

    #[must_use]
    pub fn as_single(&self) -> Option<&ConvertedValue> {
        match self {
            Self::Single(value) => Some(value),
            Self::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[ConvertedValue]> {
        match self {
            Self::Single(_) => None,
            Self::List(values) => Some(values),
        }
    }
}

impl From<ConvertedValue> for Field {
    fn from(value: ConvertedValue) -> Self {
        Self::Single(value)
    }
}

/// One unit handed to the document store.
///
/// Built from a single top-level child of the XML root and always carrying
/// a `_type` field naming that child's tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Record);

impl Document {
    /// Build a document for an element with tag `tag` that converted to `value`.
    ///
    /// Records get `_type` appended as their last field; leaf and absent
    /// values are wrapped as `{_type, value}`.
    ///
    /// # Examples
    /// ```
    /// use xmldb_loader::types::{ConvertedValue, Document};
    ///
    /// let doc = Document::from_converted("draw", ConvertedValue::from("42"));
    /// assert_eq!(doc.type_name(), Some("draw"));
    /// assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["_type", "value"]);
    /// ```
    #[must_use]
    pub fn from_converted(tag: &str, value: ConvertedValue) -> Self {
        let type_field = Field::Single(ConvertedValue::Text(tag.to_string()));
        match value {
            ConvertedValue::Record(mut record) => {
                record.insert(TYPE_KEY.to_string(), type_field);
                Self(record)
            }
            leaf @ (ConvertedValue::Text(_) | ConvertedValue::Absent) => {
                let mut record = Record::with_capacity(2);
                record.insert(TYPE_KEY.to_string(), type_field);
                record.insert(VALUE_KEY.to_string(), Field::Single(leaf));
                Self(record)
            }
        }
    }

    /// Tag of the element this document was built from.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.0
            .get(TYPE_KEY)
            .and_then(Field::as_single)
            .and_then(ConvertedValue::as_text)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn fields(&self) -> &Record {
        &self.0
    }
}
