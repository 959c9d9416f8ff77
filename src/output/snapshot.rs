//! Catalog snapshots on disk
//!
//! A snapshot is the JSON document `crawl` writes: the entries of one
//! driver plus provenance. Feeding it back with `--previous` lets a refresh
//! keep ids, watched flags and already known sub-entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::model::CatalogEntry;
use crate::SumiError;

/// Everything one crawl produced, as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub driver_id: String,
    pub driver_version: String,

    /// SHA-256 of the driver file used for the crawl
    pub config_hash: String,

    pub crawled_at: DateTime<Utc>,
    pub entries: Vec<CatalogEntry>,

    /// Error messages recorded during the crawl
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Writes any serializable value as pretty JSON
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), SumiError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads a snapshot written by [`write_json`]
pub fn read_snapshot(path: &Path) -> Result<CatalogSnapshot, SumiError> {
    let file = File::open(path)?;
    let snapshot = serde_json::from_reader(BufReader::new(file))?;
    Ok(snapshot)
}
