//! Project asset injection.

use crate::cli::RuntimeConfig;
use crate::exporter::error::{Error, Result};
use crate::exporter::utils::fs;
use std::path::Path;

/// Marker file the Godot template expects next to the project assets.
pub const CL_MARKER: &str = "_cl_";

/// Extracts the project archive into `assets_dir`, overwriting existing files.
///
/// Returns the number of archive entries.
pub async fn extract_project(zip_path: &Path, assets_dir: &Path, runtime: &RuntimeConfig) -> Result<usize> {
    runtime.section("EXTRACTING PROJECT ZIP")?;

    if !zip_path.is_file() {
        return Err(Error::MissingInput {
            what: "project archive",
            path: zip_path.to_path_buf(),
        });
    }

    let zip_path = zip_path.to_path_buf();
    let target = assets_dir.to_path_buf();
    let entries = tokio::task::spawn_blocking(move || -> Result<usize> {
        let file = std::fs::File::open(&zip_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        std::fs::create_dir_all(&target)?;
        archive.extract(&target)?;
        Ok(archive.len())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Archive extraction task panicked: {}", e)))??;

    log::debug!("Extracted {} entries", entries);
    runtime.success(&format!("Extracted to: {}", assets_dir.display()))?;

    Ok(entries)
}

/// Ensures `assets/_cl_` exists, copying it from `working_dir` when needed.
///
/// A marker missing from both places only produces a warning.
pub async fn ensure_cl_marker(assets_dir: &Path, working_dir: &Path, runtime: &RuntimeConfig) -> Result<bool> {
    runtime.section("ADJUSTING APP SCREEN APPROPRIATE")?;

    let destination = assets_dir.join(CL_MARKER);
    if destination.exists() {
        runtime.success("_cl_ file already exists in assets")?;
        return Ok(true);
    }

    let source = working_dir.join(CL_MARKER);
    if source.is_file() {
        fs::copy_file(&source, &destination).await?;
        runtime.success("Copied _cl_ file to assets")?;
        Ok(true)
    } else {
        runtime.warn("Warning: _cl_ file not found in working directory!")?;
        Ok(false)
    }
}
