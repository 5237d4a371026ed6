//! Command line interface for the Godot Android Exporter.
//!
//! Parses arguments, loads `properties.gae`, runs the
//! [`Exporter`](crate::exporter::Exporter) and turns the outcome into an
//! exit code.

mod args;
mod output;
mod spinner;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;
pub use spinner::Spinner;

use crate::error::{CliError, Result};
use crate::exporter::{Exporter, SettingsBuilder};
use crate::properties::Properties;
use path_absolutize::Absolutize;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let runtime = RuntimeConfig::from(&args);

    match execute(&args, &runtime).await {
        Ok(()) => Ok(0),
        Err(e) => {
            log::debug!(
                "run failed ({}): {:?}",
                if e.is_input_error() { "before any tool ran" } else { "during export" },
                e
            );
            runtime.output().error("\n=== PROCESS FAILED ===")?;
            runtime.output().error(&format!("Error: {e}"))?;
            Ok(1)
        }
    }
}

async fn execute(args: &Args, runtime: &RuntimeConfig) -> Result<()> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    runtime.output().banner()?;

    let working_dir = args.working_dir.absolutize()?.into_owned();
    log::debug!("Working directory: {}", working_dir.display());

    runtime.section("READING PROPERTIES")?;
    let properties_path = working_dir.join(&args.properties);
    let properties = Properties::load(&properties_path, &working_dir).await?;

    runtime.success("Loaded properties:")?;
    for (key, value) in properties.display_entries() {
        runtime.change(&format!("  {key}: {value}"))?;
    }

    let settings = SettingsBuilder::new()
        .working_dir(&working_dir)
        .properties(properties)
        .template_apk(&args.template)
        .decompiled_dir(&args.decompiled_dir)
        .clean(args.clean)
        .build()?;

    let artifact = Exporter::new(settings).export(runtime).await?;
    log::info!(
        "Exported {} ({} bytes, sha256 {})",
        artifact.path.display(),
        artifact.size,
        artifact.checksum
    );

    Ok(())
}
