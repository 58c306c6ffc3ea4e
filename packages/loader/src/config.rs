//! Configuration constants, connection settings and name helpers.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LoaderError, Result};

/// Connection string used when neither the CLI nor the environment provides one.
pub const DEFAULT_CONNECTION_STRING: &str = "mongodb://localhost:27017";

/// Database used when neither the CLI nor the environment provides one.
pub const DEFAULT_DATABASE: &str = "xmldb";

/// Environment variable holding the connection string.
pub const CONNECTION_STRING_ENV: &str = "MONGODB_URI";

/// Environment variable holding the database name.
pub const DATABASE_ENV: &str = "MONGODB_DATABASE";

/// Extension given to the JSON snapshot when no output path is set.
pub const JSON_EXTENSION: &str = "json";

/// Indentation used for the JSON snapshot.
pub const JSON_INDENT: &[u8] = b"  ";

/// Maximum database name length in bytes accepted by MongoDB.
const MAX_DATABASE_NAME_BYTES: usize = 63;

/// Characters MongoDB forbids in database names.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATABASE_FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\. "$\x00]"#).expect("valid regex"));

/// Connection settings for the document store.
///
/// Passed explicitly to the store; there is no process-wide default state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub connection_string: String,
    pub database: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            connection_string: DEFAULT_CONNECTION_STRING.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn new(connection_string: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database: database.into(),
        }
    }

    /// Build a config from `MONGODB_URI` / `MONGODB_DATABASE`, falling back
    /// to the built-in defaults for unset variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let connection_string = std::env::var(CONNECTION_STRING_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.connection_string);

        let database = std::env::var(DATABASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.database);

        Self {
            connection_string,
            database,
        }
    }

    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = connection_string.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Check the settings before any connection attempt.
    pub fn validate(&self) -> Result<()> {
        if self.connection_string.trim().is_empty() {
            return Err(LoaderError::Config("connection string is empty".into()));
        }
        validate_database_name(&self.database)
    }
}

/// Derive a collection name from an XML file path.
///
/// Takes the file name without its extension and replaces spaces and
/// hyphens with underscores.
///
/// # Examples
/// ```
/// use xmldb_loader::config::collection_name_from_path;
///
/// assert_eq!(collection_name_from_path("my report-2024.xml"), "my_report_2024");
/// assert_eq!(collection_name_from_path("exports/draw-results.xml"), "draw_results");
/// ```
pub fn collection_name_from_path(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default()
        .replace([' ', '-'], "_")
}

/// Default JSON snapshot location: the XML path with a `.json` extension.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use xmldb_loader::config::default_json_path;
///
/// assert_eq!(default_json_path("data/draws.xml"), PathBuf::from("data/draws.json"));
/// ```
pub fn default_json_path(xml_path: impl AsRef<Path>) -> PathBuf {
    xml_path.as_ref().with_extension(JSON_EXTENSION)
}

/// Validate a collection name against MongoDB naming rules.
pub fn validate_collection_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.contains('\0') {
        Some("must not contain NUL characters")
    } else if name.contains('$') {
        Some("must not contain '$'")
    } else if name.starts_with("system.") {
        Some("must not start with 'system.'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(LoaderError::InvalidName {
            kind: "collection",
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Validate a database name against MongoDB naming rules.
pub fn validate_database_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.len() > MAX_DATABASE_NAME_BYTES {
        Some("must be at most 63 bytes")
    } else if DATABASE_FORBIDDEN.is_match(name) {
        Some("must not contain any of / \\ . space \" $ or NUL")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(LoaderError::InvalidName {
            kind: "database",
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
