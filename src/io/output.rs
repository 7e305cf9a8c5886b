use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::models::{QualityReport, RuleDictionary};
use crate::optimizer::{DictionaryStore, OptimizationReport};
use crate::segmenter::Paragraph;

use super::StoreError;

fn write_string(path: &Path, content: &str) -> Result<(), StoreError> {
    std::fs::write(path, content).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    write_string(path, &json)
}

/// Write the corrected transcript text.
pub fn write_corrected_text(path: &Path, text: &str) -> Result<(), StoreError> {
    write_string(path, text)?;
    info!(path = %path.display(), "corrected text written");
    Ok(())
}

/// Write the quality report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &QualityReport) -> Result<(), StoreError> {
    write_pretty_json(path, report)?;
    info!(path = %path.display(), "quality report written");
    Ok(())
}

/// Write the segmented paragraphs as pretty-printed JSON.
pub fn write_paragraphs(path: &Path, paragraphs: &[Paragraph]) -> Result<(), StoreError> {
    write_pretty_json(path, &paragraphs)?;
    info!(path = %path.display(), count = paragraphs.len(), "paragraphs written");
    Ok(())
}

/// Write the optimizer's trajectory report as pretty-printed JSON.
pub fn write_optimization_report(
    path: &Path,
    report: &OptimizationReport,
) -> Result<(), StoreError> {
    write_pretty_json(path, report)?;
    info!(path = %path.display(), "optimization report written");
    Ok(())
}

/// File-backed dictionary store with versioned backups.
///
/// `backup` writes the pre-enrichment dictionary next to the live file under
/// a `_v<version>_backup.json` suffix; `save` overwrites the live file.
#[derive(Debug, Clone)]
pub struct JsonDictionaryStore {
    path: PathBuf,
}

impl JsonDictionaryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn backup_path(&self, version: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dictionary");
        self.path
            .with_file_name(format!("{stem}_v{version}_backup.json"))
    }
}

impl DictionaryStore for JsonDictionaryStore {
    fn backup(&mut self, dictionary: &RuleDictionary) -> Result<(), StoreError> {
        let path = self.backup_path(&dictionary.version);
        write_pretty_json(&path, dictionary)?;
        info!(path = %path.display(), "dictionary backup written");
        Ok(())
    }

    fn save(&mut self, dictionary: &RuleDictionary) -> Result<(), StoreError> {
        write_pretty_json(&self.path, dictionary)?;
        info!(path = %self.path.display(), version = %dictionary.version, "dictionary saved");
        Ok(())
    }
}
