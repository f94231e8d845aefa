//! Atomic CSV persistence of a [`MetadataTable`].

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::table::{MetadataTable, METADATA_COLUMNS};

/// Errors from writing the metadata table.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Serializing or persisting the table failed. No complete-looking file
    /// is left at `path`.
    #[error("Failed to write metadata to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes a metadata table to one target path.
///
/// The table is serialized into a sibling temp file which is synced and
/// then renamed over the target, so the target either holds a complete
/// table or is untouched.
#[derive(Debug, Clone)]
pub struct MetadataWriter {
    path: PathBuf,
}

impl MetadataWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("csv.tmp")
    }

    /// Persist `table`, replacing any previous file at the target path.
    pub fn write(&self, table: &MetadataTable) -> Result<(), MetadataError> {
        let temp_path = self.temp_path();

        let result = write_csv(&temp_path, table).and_then(|_| fs::rename(&temp_path, &self.path));

        if let Err(source) = result {
            if temp_path.exists() {
                if let Err(e) = fs::remove_file(&temp_path) {
                    warn!(
                        path = %temp_path.display(),
                        error = %e,
                        "Failed to remove temporary metadata file"
                    );
                }
            }
            return Err(MetadataError::Write {
                path: self.path.clone(),
                source,
            });
        }

        info!(
            path = %self.path.display(),
            rows = table.object_count(),
            "Metadata saved"
        );
        Ok(())
    }
}

fn write_csv(path: &Path, table: &MetadataTable) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    writer.write_record(METADATA_COLUMNS)?;
    for row in table.rows() {
        writer.write_record(row.to_record())?;
    }

    let buffered = writer.into_inner().map_err(|e| e.into_error())?;
    let file = buffered.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    debug!(path = %path.display(), "Metadata temp file synced");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{GeographicBound, ObjectRecord};
    use crate::projection::{ProjectionOrigin, TransverseMercator};
    use tempfile::TempDir;

    fn sample_table() -> MetadataTable {
        let projection = TransverseMercator::new(ProjectionOrigin::at(35.0, 139.0).unwrap());
        let records = vec![ObjectRecord::new(
            "tile_0",
            GeographicBound {
                min_lat: 34.9999,
                min_lon: 138.9999,
                max_lat: 35.0001,
                max_lon: 139.0001,
            },
        )];
        MetadataTable::new(&projection, 1.0, &records)
    }

    #[test]
    fn test_write_produces_header_and_rows() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pass_metadata.csv");

        MetadataWriter::new(&path).write(&sample_table()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "mesh_id,max_lat,max_lon,min_lat,min_lon,scale_factor");
        let origin: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(origin[0], "origin");
        assert!((origin[1].parse::<f64>().unwrap() - 35.0).abs() < 1e-12);
        assert_eq!(&origin[2..], &["139", "", "", "1"]);
        assert_eq!(lines[2], "tile_0,35.0001,139.0001,34.9999,138.9999,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pass_metadata.csv");
        let writer = MetadataWriter::new(&path);

        writer.write(&sample_table()).unwrap();

        assert!(path.exists());
        assert!(!writer.temp_path().exists());
    }

    #[test]
    fn test_write_overwrites_previous_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pass_metadata.csv");
        fs::write(&path, "stale").unwrap();

        MetadataWriter::new(&path).write(&sample_table()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("mesh_id,"));
    }

    #[test]
    fn test_write_into_missing_directory_fails_with_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("pass_metadata.csv");

        let err = MetadataWriter::new(&path).write(&sample_table()).unwrap_err();
        let MetadataError::Write { path: failed, .. } = &err;
        assert_eq!(failed, &path);
        assert!(err.to_string().contains("pass_metadata.csv"));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_rename_cleans_up_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pass_metadata.csv");
        // A non-empty directory at the target makes the rename fail
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();
        let writer = MetadataWriter::new(&path);

        assert!(writer.write(&sample_table()).is_err());
        assert!(!writer.temp_path().exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_identical_tables_write_identical_bytes() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a_metadata.csv");
        let b = temp.path().join("b_metadata.csv");

        MetadataWriter::new(&a).write(&sample_table()).unwrap();
        MetadataWriter::new(&b).write(&sample_table()).unwrap();

        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }
}
