/// Library importer
/// 
/// Scans the library directory for `*.json` files in filename order and imports
/// them one at a time. A failing file is recorded in the report and the run
/// continues with the next file.

use crate::{
    catalog::{
        types::{ExtractedUpdate, NewCatalogWorkflow},
        CatalogStorage,
    },
    workflow::{validate_workflow_json, MetadataExtractor, WorkflowDefinition},
};
use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Base URL for generated demo links
pub const DEMO_BASE_URL: &str = "https://demo.autoflowhub.com";

/// Base URL for generated download links
pub const DOWNLOAD_BASE_URL: &str = "https://download.autoflowhub.com/workflows";

/// Reasons a single library file could not be imported
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid JSON format")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Invalid N8N workflow structure")]
    InvalidStructure,
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// What happened to one imported file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Created(i64),
    Updated(i64),
}

/// Summary of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Number of `.json` files found
    pub files: usize,
    pub success: usize,
    pub failed: usize,
    pub created: usize,
    pub updated: usize,
    /// (filename, error message) for every failed file
    pub errors: Vec<(String, String)>,
}

/// Imports workflow exports from a directory into the catalog
#[derive(Debug, Clone)]
pub struct LibraryImporter {
    storage: CatalogStorage,
    extractor: MetadataExtractor,
    dir: PathBuf,
}

impl LibraryImporter {
    /// Create an importer for the given library directory
    pub fn new(storage: CatalogStorage, dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            extractor: MetadataExtractor::default(),
            dir: dir.into(),
        }
    }

    /// Library directory scanned by this importer
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Import every `*.json` file in the library directory
    /// 
    /// A missing directory is created and yields an empty report.
    pub async fn import_all(&self) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        if !self.dir.exists() {
            tracing::info!("📁 Creating workflow library directory: {}", self.dir.display());
            std::fs::create_dir_all(&self.dir).map_err(|e| {
                anyhow::anyhow!("Failed to create library directory '{}': {}", self.dir.display(), e)
            })?;
            return Ok(report);
        }

        let files = self.library_files()?;
        report.files = files.len();

        if files.is_empty() {
            tracing::info!("ℹ️ No .json files found in {}", self.dir.display());
            return Ok(report);
        }

        tracing::info!("📂 Found {} workflow file(s)", files.len());

        for (index, path) in files.iter().enumerate() {
            let filename = file_name(path);
            tracing::info!("[{}/{}] Processing: {}", index + 1, files.len(), filename);

            match self.import_file(path).await {
                Ok(FileOutcome::Created(id)) => {
                    tracing::info!("   └─ ✅ Created (ID: {})", id);
                    report.success += 1;
                    report.created += 1;
                }
                Ok(FileOutcome::Updated(id)) => {
                    tracing::info!("   └─ ✅ Updated (ID: {})", id);
                    report.success += 1;
                    report.updated += 1;
                }
                Err(e) => {
                    tracing::warn!("   └─ ❌ Failed: {}", e);
                    report.failed += 1;
                    report.errors.push((filename, e.to_string()));
                }
            }
        }

        tracing::info!(
            "📊 Import finished: {}/{} succeeded ({} created, {} updated), {} failed",
            report.success,
            report.files,
            report.created,
            report.updated,
            report.failed
        );

        Ok(report)
    }

    /// Import a single workflow export
    pub async fn import_file(&self, path: &Path) -> Result<FileOutcome, ImportError> {
        let filename = file_name(path);
        let content = std::fs::read_to_string(path)?;

        let value: Value = serde_json::from_str(&content).map_err(ImportError::InvalidJson)?;
        if !validate_workflow_json(&value) {
            return Err(ImportError::InvalidStructure);
        }

        let definition = WorkflowDefinition::from_value(&value);
        let extracted = self.extractor.extract(&filename, &definition);

        tracing::debug!("   ├─ Title: {}", extracted.title);
        tracing::debug!("   ├─ Category: {}", extracted.category);
        tracing::debug!(
            "   ├─ Nodes: {} ({})",
            extracted.stats.node_count,
            extracted.stats.complexity
        );
        tracing::debug!("   ├─ Tags: {}", extracted.tags.join(", "));

        let workflow_json = serde_json::to_string(&value).map_err(ImportError::InvalidJson)?;

        if let Some(id) = self.storage.find_id_by_title(&extracted.title).await? {
            let update = ExtractedUpdate {
                description: extracted.description,
                category: extracted.category.to_string(),
                tags: extracted.tags,
                workflow_json,
            };
            self.storage.update_extracted(&extracted.title, &update).await?;
            return Ok(FileOutcome::Updated(id));
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.clone());

        let id = self
            .storage
            .insert_workflow(&NewCatalogWorkflow {
                title: extracted.title,
                description: extracted.description,
                category: extracted.category.to_string(),
                price: 0.0,
                demo_url: Some(format!("{}/{}", DEMO_BASE_URL, stem)),
                download_url: Some(format!("{}/{}", DOWNLOAD_BASE_URL, filename)),
                tags: extracted.tags,
                image_url: None,
                workflow_json: Some(workflow_json),
            })
            .await?;

        Ok(FileOutcome::Created(id))
    }

    /// `*.json` files in the library directory, sorted by filename
    fn library_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            if path.is_file() && is_json {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
