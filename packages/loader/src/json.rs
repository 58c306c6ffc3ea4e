//! JSON snapshot of assembled documents.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::JSON_INDENT;
use crate::error::Result;
use crate::types::Document;

/// Serialize documents as a two-space indented JSON array.
///
/// Non-ASCII characters are written as-is and object keys keep their
/// insertion order.
pub fn to_json_string(documents: &[Document]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    documents.serialize(&mut serializer)?;

    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write documents to a JSON snapshot file.
///
/// Uses atomic write pattern: writes to a temp file next to the target,
/// syncs, then renames over the target.
pub fn save_json(documents: &[Document], path: &Path) -> Result<()> {
    let content = to_json_string(documents)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot.json".to_string());
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;

    tracing::debug!(path = %path.display(), count = documents.len(), "Wrote JSON snapshot");
    Ok(())
}

/// Read a JSON snapshot written by [`save_json`].
pub fn read_json(path: &Path) -> Result<Vec<Document>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
