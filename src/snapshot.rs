//! Reading and writing catalog snapshots.
//!
//! A snapshot is the whole [`Catalog`] as one JSON document. Shards write one
//! each; the merger reads them back.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{FactError, Result};
use crate::types::Catalog;

/// Read a snapshot file.
pub fn read_snapshot(path: &Path) -> Result<Catalog> {
    let file = File::open(path).map_err(|e| FactError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FactError::data_format(path, e.line(), e.to_string()))
}

/// Write a snapshot file, creating parent directories as needed.
pub fn write_snapshot(catalog: &Catalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| FactError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| FactError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, catalog)?;
    writer.flush().map_err(|e| FactError::io(path, e))
}
