//! In-memory form of the metadata table.

use crate::bounds::ObjectRecord;
use crate::projection::TransverseMercator;

/// Column header, in output order.
pub const METADATA_COLUMNS: [&str; 6] = [
    "mesh_id",
    "max_lat",
    "max_lon",
    "min_lat",
    "min_lon",
    "scale_factor",
];

/// `mesh_id` of the synthetic first row.
pub const ORIGIN_ROW_ID: &str = "origin";

/// One row of the metadata table. Empty cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRow {
    pub mesh_id: String,
    pub max_lat: Option<f64>,
    pub max_lon: Option<f64>,
    pub min_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub scale_factor: Option<f64>,
}

impl MetadataRow {
    /// Synthetic row carrying the projection origin and scale factor.
    ///
    /// The origin coordinates go in `max_lat`/`max_lon`; the scale factor
    /// has its own column and the `min_*` cells stay empty.
    pub fn origin(projection: &TransverseMercator, scale_factor: f64) -> Self {
        let origin = projection.origin_geographic();
        Self {
            mesh_id: ORIGIN_ROW_ID.to_string(),
            max_lat: Some(origin.lat),
            max_lon: Some(origin.lon),
            min_lat: None,
            min_lon: None,
            scale_factor: Some(scale_factor),
        }
    }

    pub fn object(record: &ObjectRecord) -> Self {
        Self {
            mesh_id: record.id.clone(),
            max_lat: Some(record.bound.max_lat),
            max_lon: Some(record.bound.max_lon),
            min_lat: Some(record.bound.min_lat),
            min_lon: Some(record.bound.min_lon),
            scale_factor: None,
        }
    }

    /// Cell strings in [`METADATA_COLUMNS`] order.
    pub fn to_record(&self) -> [String; 6] {
        [
            self.mesh_id.clone(),
            cell(self.max_lat),
            cell(self.max_lon),
            cell(self.min_lat),
            cell(self.min_lon),
            cell(self.scale_factor),
        ]
    }
}

// Same float rendering as the canonical name
fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Ordered metadata rows for one pass: origin row first, then one row per
/// object record in the order given.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTable {
    rows: Vec<MetadataRow>,
}

impl MetadataTable {
    pub fn new(
        projection: &TransverseMercator,
        scale_factor: f64,
        records: &[ObjectRecord],
    ) -> Self {
        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(MetadataRow::origin(projection, scale_factor));
        rows.extend(records.iter().map(MetadataRow::object));
        Self { rows }
    }

    pub fn rows(&self) -> &[MetadataRow] {
        &self.rows
    }

    /// Number of object rows (excludes the origin row).
    pub fn object_count(&self) -> usize {
        self.rows.len() - 1
    }
}
