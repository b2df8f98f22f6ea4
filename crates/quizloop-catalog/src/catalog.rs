//! The catalog trait and the listing rules shared by every catalog.
//!
//! A catalog is a folder of CSV quizzes, optionally described by a
//! `quizzes.json` manifest. Listing merges the manifest with whatever CSV
//! files can be discovered next to it.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quizloop_core::model::QuestionRecord;
use quizloop_core::parser;

use crate::error::CatalogError;

/// File name of the optional manifest inside a catalog.
pub const MANIFEST_FILE: &str = "quizzes.json";

/// A quiz offered by a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// File name within the catalog, e.g. `rust_basics.csv`.
    pub file: String,
    /// Human-readable title.
    pub title: String,
}

/// A source of quizzes.
#[async_trait]
pub trait QuizCatalog: Send + Sync {
    /// Human-readable catalog description (a directory or a URL).
    fn name(&self) -> &str;

    /// List the quizzes on offer: manifest entries first, then discovered files.
    async fn list(&self) -> anyhow::Result<Vec<CatalogEntry>>;

    /// Fetch the raw CSV text of one quiz.
    async fn fetch(&self, file: &str) -> anyhow::Result<String>;
}

/// Fetch a quiz and parse it into records.
///
/// Fails when the quiz cannot be fetched or contains no valid question.
pub async fn load_quiz(
    catalog: &dyn QuizCatalog,
    file: &str,
) -> anyhow::Result<Vec<QuestionRecord>> {
    let raw = catalog
        .fetch(file)
        .await
        .with_context(|| format!("failed to load quiz {file} from {}", catalog.name()))?;

    parser::parse(&raw).map_err(|rejected| {
        anyhow::anyhow!(
            "no valid questions were found in {file} ({} row(s) rejected)",
            rejected.len()
        )
    })
}

/// Parse a manifest body. Anything that is not a JSON array of objects with
/// a `file` string yields no entries.
pub fn parse_manifest(body: &str) -> Vec<CatalogEntry> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("ignoring unreadable manifest: {e}");
            return Vec::new();
        }
    };

    let Some(items) = value.as_array() else {
        tracing::warn!("ignoring manifest that is not a JSON array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let file = item.get("file")?.as_str().filter(|f| !f.is_empty())?;
            let title = item
                .get("title")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .unwrap_or(file);
            Some(CatalogEntry {
                file: file.to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}

/// Merge manifest entries with discovered CSV files.
///
/// Manifest order is kept. A file listed twice keeps its first position and
/// takes the title of its last entry. Discovered
/// files not in the manifest are appended with a title derived from the
/// file name.
pub fn merge_entries(manifest: Vec<CatalogEntry>, discovered: Vec<String>) -> Vec<CatalogEntry> {
    let mut merged: Vec<CatalogEntry> = Vec::new();

    for entry in manifest {
        match merged.iter_mut().find(|e| e.file == entry.file) {
            Some(existing) => existing.title = entry.title,
            None => merged.push(entry),
        }
    }

    for file in discovered {
        if !merged.iter().any(|e| e.file == file) {
            merged.push(CatalogEntry {
                title: pretty_title(&file),
                file,
            });
        }
    }

    merged
}

/// `world_capitals.csv` -> `World capitals`.
pub fn pretty_title(file: &str) -> String {
    let spaced = file.replace('_', " ");
    let stem = if has_csv_extension(&spaced) {
        &spaced[..spaced.len() - 4]
    } else {
        spaced.as_str()
    };

    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn has_csv_extension(name: &str) -> bool {
    name.len() >= 4
        && name.is_char_boundary(name.len() - 4)
        && name[name.len() - 4..].eq_ignore_ascii_case(".csv")
}

/// Reject names that would leave the catalog folder.
pub(crate) fn check_file_name(file: &str) -> Result<(), CatalogError> {
    let bad = file.is_empty()
        || file.contains('/')
        || file.contains('\\')
        || file == "."
        || file == "..";
    if bad {
        return Err(CatalogError::InvalidName(file.to_string()));
    }
    Ok(())
}
