//! Catalog backed by a local directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use crate::catalog::{
    check_file_name, has_csv_extension, merge_entries, parse_manifest, CatalogEntry,
    QuizCatalog, MANIFEST_FILE,
};
use crate::error::CatalogError;

/// Quizzes stored as CSV files in one directory.
pub struct LocalCatalog {
    dir: PathBuf,
    name: String,
}

impl LocalCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let name = dir.display().to_string();
        Self { dir, name }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_manifest(&self) -> Vec<CatalogEntry> {
        let path = self.dir.join(MANIFEST_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => parse_manifest(&body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!("skipping manifest {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    async fn discover(&self) -> anyhow::Result<Vec<String>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("failed to read catalog directory: {}", self.dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("skipping non UTF-8 file name in {}", self.dir.display());
                continue;
            };
            if has_csv_extension(&name) {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl QuizCatalog for LocalCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn list(&self) -> anyhow::Result<Vec<CatalogEntry>> {
        if !self.dir.is_dir() {
            anyhow::bail!("not a directory: {}", self.dir.display());
        }
        let manifest = self.read_manifest().await;
        let discovered = self.discover().await?;
        Ok(merge_entries(manifest, discovered))
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn fetch(&self, file: &str) -> anyhow::Result<String> {
        check_file_name(file)?;
        let path = self.dir.join(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CatalogError::NotFound(file.to_string()).into())
            }
            Err(e) => Err(CatalogError::Io(e).into()),
        }
    }
}
