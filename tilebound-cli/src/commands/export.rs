//! Export command - bound a scene and write its metadata.

use std::path::{Path, PathBuf};

use clap::Args;
use tilebound::config::ensure_config_exists;
use tilebound::pass::{run_scene_pass, PassOutcome};
use tilebound::scene::Scene;
use tracing::{info, warn};

use super::common::{load_config, CollectionPolicyArg, ConfigOverrides};
use crate::error::CliError;

/// Arguments for `tilebound export`.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Scene description (JSON)
    #[arg(long)]
    pub scene: PathBuf,

    /// Level of detail to export; repeat for several passes (default: export.lods).
    /// A failing LOD is reported and the remaining ones still run
    #[arg(long = "lod")]
    pub lods: Vec<String>,

    /// Prefix for canonical names (default: output.base_name)
    #[arg(long)]
    pub base_name: Option<String>,

    /// Factor the scene was scaled by after import (default: export.scale_factor)
    #[arg(long)]
    pub scale_factor: Option<f64>,

    /// Directory for metadata files (default: output.output_dir)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// How scenes with several top-level collections are exported
    #[arg(long, value_enum)]
    pub collection_policy: Option<CollectionPolicyArg>,

    /// Scale the scene's meshes by the scale factor before bounding
    #[arg(long)]
    pub apply_scale: bool,

    /// Extract object bounds on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Write the command-line overrides back to the config file
    #[arg(long)]
    pub save: bool,
}

impl ExportArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_name: self.base_name.clone(),
            scale_factor: self.scale_factor,
            output_dir: self.output_dir.clone(),
            collection_policy: self.collection_policy,
            lods: self.lods.clone(),
            sequential: self.sequential,
        }
    }
}

/// Run the export command.
pub fn run(args: ExportArgs, config_path: &Path) -> Result<(), CliError> {
    if ensure_config_exists(config_path)? {
        println!("Created default configuration: {}", config_path.display());
    }

    let mut config = load_config(config_path)?;
    args.overrides().apply(&mut config)?;
    config.validate()?;

    if args.save {
        config.save_to(config_path)?;
        info!(path = %config_path.display(), "Overrides saved");
    }

    let mut scene = Scene::load(&args.scene)?;
    if args.apply_scale {
        scene.rescale(config.export.scale_factor);
    }

    // Each LOD is an independent pass; one failing does not stop the rest
    let mut written = 0;
    let mut failed_lods = Vec::new();
    for lod in &config.export.lods {
        let settings = config.pass_settings(lod);
        match run_scene_pass(&scene, &settings) {
            Ok(report) => {
                for outcome in &report.outcomes {
                    print_outcome(lod, outcome);
                }
                for failure in &report.failed_collections {
                    println!(
                        "[{}] Collection '{}' failed: {}",
                        lod, failure.collection, failure.error
                    );
                }
                written += report.outcomes.len();
            }
            Err(e) => {
                println!("[{}] Failed: {}", lod, e);
                warn!(lod = %lod, error = %e, "Export pass failed");
                failed_lods.push(lod.clone());
            }
        }
    }

    println!();
    println!(
        "Wrote {} metadata file(s) to {}",
        written,
        config.output.output_dir.display()
    );

    if !failed_lods.is_empty() {
        return Err(CliError::PassesFailed(failed_lods));
    }
    Ok(())
}

fn print_outcome(lod: &str, outcome: &PassOutcome) {
    println!("[{}] {}", lod, outcome.canonical_name);
    println!("  Bound:    {}", outcome.global_bound);
    println!("  Objects:  {}", outcome.records.len());
    println!("  Metadata: {}", outcome.metadata_path.display());

    if !outcome.is_complete() {
        println!("  Skipped {} object(s):", outcome.failures.len());
        for failure in &outcome.failures {
            println!("    {}", failure);
        }
        warn!(
            name = %outcome.canonical_name,
            skipped = outcome.failures.len(),
            "Pass completed with skipped objects"
        );
    }
}
