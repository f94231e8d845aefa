//! Metadata table emission.
//!
//! One CSV file per export pass with a fixed header:
//!
//! ```text
//! mesh_id,max_lat,max_lon,min_lat,min_lon,scale_factor
//! origin,<origin lat>,<origin lon>,,,<scale factor>
//! <object id>,<max lat>,<max lon>,<min lat>,<min lon>,
//! ...
//! ```
//!
//! The first row is synthetic and records the projection origin and scale
//! factor. Object rows follow in the order the records were supplied.

mod table;
mod writer;

pub use table::{MetadataRow, MetadataTable, METADATA_COLUMNS, ORIGIN_ROW_ID};
pub use writer::{MetadataError, MetadataWriter};
