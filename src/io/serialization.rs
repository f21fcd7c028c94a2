// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation file serialization and deserialization.
//!
//! The whole dataset is a single JSON array of [`ImageRecord`]s. Every
//! commit rewrites the full file with 4-space indentation.

use crate::models::annotation::ImageRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Read all records from `path`.
///
/// A missing or empty file yields no records. A malformed file is an error.
pub fn load_records(path: &Path) -> Result<Vec<ImageRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records = serde_json::from_str(&json)
        .with_context(|| format!("Malformed annotation file {}", path.display()))?;
    Ok(records)
}

/// Overwrite `path` with all `records`.
pub fn save_records(path: &Path, records: &[ImageRecord]) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    std::fs::write(path, buf).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Append-only collection of committed records backed by one JSON file.
#[derive(Debug)]
pub struct AnnotationStore {
    path: PathBuf,
    records: Vec<ImageRecord>,
}

impl AnnotationStore {
    /// Load the existing document at `path`, if any.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = load_records(&path)?;
        log::info!("Loaded {} image records from {}", records.len(), path.display());
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append `record` and rewrite the file.
    ///
    /// On a write failure the record is dropped again, leaving the store as
    /// it was before the call.
    pub fn append(&mut self, record: ImageRecord) -> Result<()> {
        self.records.push(record);
        if let Err(e) = save_records(&self.path, &self.records) {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }
}
