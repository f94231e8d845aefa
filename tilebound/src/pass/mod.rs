//! Export passes.
//!
//! A pass takes one level of detail of a scene and produces its canonical
//! name, global bound and metadata file:
//!
//! ```text
//! SceneObject ──► extract_record ──► ObjectRecord ──► GlobalBound ──► canonical name
//!  (meshes)        (projection)       (sorted by id)   (min/max fold)        │
//!                                          │                                 ▼
//!                                          └───────────► MetadataTable ──► {name}_metadata.csv
//! ```
//!
//! Objects that cannot be bounded are reported in [`PassOutcome::failures`]
//! and the pass continues with the rest. A pass with no bounded object
//! fails with [`PassError::NoGeometry`] and writes nothing.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tilebound::geometry::SceneObject;
//! use tilebound::pass::compute_bounds_and_write_metadata;
//! use tilebound::scene::SceneOrigin;
//!
//! let objects = vec![SceneObject::mesh_from_extent("tile_0", [-10.0, -10.0, 0.0], [10.0, 10.0, 5.0])];
//! let outcome = compute_bounds_and_write_metadata(
//!     SceneOrigin { lat: 35.0, lon: 139.0 },
//!     1.0,
//!     &objects,
//!     "tokyo",
//!     "lod1",
//!     Path::new("output"),
//! )?;
//! println!("{} -> {}", outcome.canonical_name, outcome.metadata_path.display());
//! # Ok::<(), tilebound::pass::PassError>(())
//! ```

mod error;
mod policy;

pub use error::{PassError, PassResult};
pub use policy::{CollectionPolicy, ParseCollectionPolicyError};

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::bounds::{GeographicBound, GlobalBound, ObjectRecord};
use crate::geometry::{extract_record, ExtractError, SceneObject};
use crate::metadata::{MetadataTable, MetadataWriter};
use crate::naming::{canonical_name, collection_base_name, is_file_name_safe, metadata_path};
use crate::projection::{ProjectionOrigin, TransverseMercator};
use crate::scene::{Scene, SceneOrigin};

/// Result of one successful export pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome {
    /// Deterministic name of the pass; also names the metadata file.
    pub canonical_name: String,
    pub global_bound: GeographicBound,
    /// Bounded objects, sorted by id then bound.
    pub records: Vec<ObjectRecord>,
    /// Objects that could not be bounded, sorted by id.
    pub failures: Vec<ExtractError>,
    pub metadata_path: PathBuf,
}

impl PassOutcome {
    /// True when every mesh object was bounded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-object results of a pass before anything is named or written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComputedBounds {
    pub records: Vec<ObjectRecord>,
    pub failures: Vec<ExtractError>,
    pub global: GlobalBound,
}

/// One export pass: a projection plus the scale factor it was built with.
#[derive(Debug, Clone, Copy)]
pub struct ExportPass {
    projection: TransverseMercator,
    scale_factor: f64,
    parallel: bool,
}

impl ExportPass {
    /// Build a pass for a scene origin and scale factor.
    ///
    /// # Errors
    ///
    /// [`PassError::Projection`] when the scale factor is not positive or
    /// the origin is not finite.
    pub fn new(origin: SceneOrigin, scale_factor: f64) -> PassResult<Self> {
        let origin = ProjectionOrigin::new(origin.lat, origin.lon, scale_factor)?;
        Ok(Self {
            projection: TransverseMercator::new(origin),
            scale_factor,
            parallel: true,
        })
    }

    /// Extract object bounds on the rayon pool (default) or sequentially.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn projection(&self) -> &TransverseMercator {
        &self.projection
    }

    /// Bound every mesh object. No I/O.
    ///
    /// Records come back sorted by id, then by bound, so downstream output
    /// does not depend on scene traversal or thread completion order. Every
    /// bounded object contributes to the global bound, duplicate ids included.
    pub fn compute<'a, I>(&self, objects: I) -> ComputedBounds
    where
        I: IntoIterator<Item = &'a SceneObject>,
    {
        let meshes: Vec<&SceneObject> = objects.into_iter().filter(|o| o.kind.is_mesh()).collect();
        let projection = &self.projection;

        let results: Vec<Result<ObjectRecord, ExtractError>> = if self.parallel {
            meshes
                .par_iter()
                .map(|object| extract_record(object, projection))
                .collect()
        } else {
            meshes
                .iter()
                .map(|object| extract_record(object, projection))
                .collect()
        };

        let mut records = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(object = e.object_id(), error = %e, "Skipping object");
                    failures.push(e);
                }
            }
        }

        records.sort_by(ObjectRecord::canonical_cmp);
        for pair in records.windows(2) {
            if pair[0].id == pair[1].id {
                warn!(object = %pair[0].id, "Duplicate object id, keeping every record");
            }
        }
        failures.sort_by(|a, b| {
            a.object_id()
                .cmp(b.object_id())
                .then_with(|| a.to_string().cmp(&b.to_string()))
        });

        let global = if self.parallel {
            records
                .par_iter()
                .fold(GlobalBound::new, |mut acc, record| {
                    acc.include(&record.bound);
                    acc
                })
                .reduce(GlobalBound::new, GlobalBound::merge)
        } else {
            records.iter().collect()
        };

        debug!(
            meshes = meshes.len(),
            bounded = records.len(),
            failed = failures.len(),
            "Object bounds computed"
        );

        ComputedBounds {
            records,
            failures,
            global,
        }
    }

    /// Bound `objects`, name the pass and write its metadata into
    /// `output_dir` (created if missing).
    pub fn run<'a, I>(
        &self,
        objects: I,
        base_name: &str,
        lod: &str,
        output_dir: &Path,
    ) -> PassResult<PassOutcome>
    where
        I: IntoIterator<Item = &'a SceneObject>,
    {
        for (field, value) in [("base name", base_name), ("LOD", lod)] {
            if !is_file_name_safe(value) {
                return Err(PassError::UnsafeName {
                    field,
                    value: value.to_string(),
                });
            }
        }

        let ComputedBounds {
            records,
            failures,
            global,
        } = self.compute(objects);

        let global_bound = match global.resolve() {
            Ok(bound) => bound,
            Err(_) => {
                return Err(PassError::NoGeometry {
                    lod: lod.to_string(),
                    failures,
                })
            }
        };

        let canonical_name = canonical_name(base_name, lod, &global_bound);
        info!(name = %canonical_name, objects = records.len(), "Pass named");

        ensure_output_directory(output_dir)?;

        let metadata_path = metadata_path(output_dir, &canonical_name);
        let table = MetadataTable::new(&self.projection, self.scale_factor, &records);
        MetadataWriter::new(&metadata_path).write(&table)?;

        Ok(PassOutcome {
            canonical_name,
            global_bound,
            records,
            failures,
            metadata_path,
        })
    }
}

/// Bound `objects`, derive the canonical name and write the metadata table
/// to `{output_dir}/{canonical_name}_metadata.csv`.
///
/// `origin` is the scene's recorded origin (use [`SceneOrigin::default`]
/// when the scene has none) and `scale_factor` the factor the scene was
/// scaled by after import.
pub fn compute_bounds_and_write_metadata(
    origin: SceneOrigin,
    scale_factor: f64,
    objects: &[SceneObject],
    base_name: &str,
    lod: &str,
    output_dir: &Path,
) -> PassResult<PassOutcome> {
    ExportPass::new(origin, scale_factor)?.run(objects, base_name, lod, output_dir)
}

/// Settings for exporting a whole scene at one level of detail.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSettings {
    pub base_name: String,
    pub lod: String,
    pub scale_factor: f64,
    pub output_dir: PathBuf,
    pub collection_policy: CollectionPolicy,
    /// Used when the scene records no origin.
    pub fallback_origin: SceneOrigin,
    pub parallel: bool,
}

impl PassSettings {
    pub fn new(
        base_name: impl Into<String>,
        lod: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            lod: lod.into(),
            scale_factor: crate::projection::DEFAULT_SCALE,
            output_dir: output_dir.into(),
            collection_policy: CollectionPolicy::default(),
            fallback_origin: SceneOrigin::default(),
            parallel: true,
        }
    }
}

/// A collection whose pass failed during an independent export.
#[derive(Debug)]
pub struct CollectionFailure {
    pub collection: String,
    pub error: PassError,
}

/// Everything one scene pass produced.
///
/// `failed_collections` is only ever filled under
/// [`CollectionPolicy::Independent`]; the other policies run a single pass
/// and return its error directly.
#[derive(Debug, Default)]
pub struct ScenePassReport {
    pub outcomes: Vec<PassOutcome>,
    pub failed_collections: Vec<CollectionFailure>,
}

impl ScenePassReport {
    fn single(outcome: PassOutcome) -> Self {
        Self {
            outcomes: vec![outcome],
            failed_collections: Vec::new(),
        }
    }

    /// True when no collection failed and every object was bounded.
    pub fn is_complete(&self) -> bool {
        self.failed_collections.is_empty() && self.outcomes.iter().all(PassOutcome::is_complete)
    }
}

/// Export a scene according to its collection policy.
///
/// Returns one outcome for [`CollectionPolicy::RequireSingle`] and
/// [`CollectionPolicy::Merge`], and one per collection holding meshes for
/// [`CollectionPolicy::Independent`]. In independent mode a failing
/// collection is recorded in [`ScenePassReport::failed_collections`] and the
/// remaining collections still run; the call only fails when no collection
/// produced an outcome.
pub fn run_scene_pass(scene: &Scene, settings: &PassSettings) -> PassResult<ScenePassReport> {
    let origin = scene.origin_or(settings.fallback_origin);
    let pass = ExportPass::new(origin, settings.scale_factor)?.with_parallel(settings.parallel);

    info!(
        lod = %settings.lod,
        policy = %settings.collection_policy,
        collections = scene.collections.len(),
        "Starting export pass"
    );

    match settings.collection_policy {
        CollectionPolicy::RequireSingle => {
            let [collection] = scene.collections.as_slice() else {
                return Err(PassError::CollectionCount {
                    found: scene.collections.len(),
                });
            };
            let outcome = pass.run(
                &collection.objects,
                &settings.base_name,
                &settings.lod,
                &settings.output_dir,
            )?;
            Ok(ScenePassReport::single(outcome))
        }
        CollectionPolicy::Merge => {
            let objects = scene.collections.iter().flat_map(|c| c.objects.iter());
            let outcome = pass.run(
                objects,
                &settings.base_name,
                &settings.lod,
                &settings.output_dir,
            )?;
            Ok(ScenePassReport::single(outcome))
        }
        CollectionPolicy::Independent => {
            let mut report = ScenePassReport::default();
            for collection in &scene.collections {
                if collection.meshes().next().is_none() {
                    warn!(
                        collection = %collection.name,
                        "Collection has no mesh objects, skipping"
                    );
                    continue;
                }
                let base_name = collection_base_name(&settings.base_name, &collection.name);
                match pass.run(
                    &collection.objects,
                    &base_name,
                    &settings.lod,
                    &settings.output_dir,
                ) {
                    Ok(outcome) => report.outcomes.push(outcome),
                    Err(error) => {
                        warn!(
                            collection = %collection.name,
                            error = %error,
                            "Collection export failed"
                        );
                        report.failed_collections.push(CollectionFailure {
                            collection: collection.name.clone(),
                            error,
                        });
                    }
                }
            }
            if report.outcomes.is_empty() {
                return Err(no_collection_succeeded(
                    &settings.lod,
                    report.failed_collections,
                ));
            }
            Ok(report)
        }
    }
}

/// Error for an independent export where every collection failed.
///
/// Geometry failures are merged into one [`PassError::NoGeometry`]; any
/// other error (I/O, naming) is returned as is.
fn no_collection_succeeded(lod: &str, failed: Vec<CollectionFailure>) -> PassError {
    let mut failures = Vec::new();
    for CollectionFailure { error, .. } in failed {
        match error {
            PassError::NoGeometry {
                failures: collection_failures,
                ..
            } => failures.extend(collection_failures),
            other => return other,
        }
    }
    PassError::NoGeometry {
        lod: lod.to_string(),
        failures,
    }
}

fn ensure_output_directory(output_dir: &Path) -> PassResult<()> {
    if output_dir.is_dir() {
        debug!(path = %output_dir.display(), "Output directory already exists");
        return Ok(());
    }
    fs::create_dir_all(output_dir).map_err(|source| PassError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    info!(path = %output_dir.display(), "Output directory created");
    Ok(())
}
