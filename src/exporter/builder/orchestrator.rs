//! Main export orchestration.

use super::checksum::calculate_sha256;
use super::signing::{align_command, decompile_command, rebuild_command, sign_command};
use super::tool_detection::Toolchain;
use crate::bail;
use crate::cli::RuntimeConfig;
use crate::exporter::error::{Error, ErrorExt, Result};
use crate::exporter::process::ProcessRunner;
use crate::exporter::utils::fs;
use crate::exporter::{ExportedArtifact, Settings, assets, icons, manifest};

/// Runs the rebranding pipeline for one template APK.
///
/// Steps run strictly in order and the first failure ends the run. Nothing
/// is rolled back; the decompiled tree and intermediate APKs stay in the
/// working directory.
///
/// # Examples
///
/// ```no_run
/// use gae_exporter::cli::RuntimeConfig;
/// use gae_exporter::exporter::{Exporter, Settings};
///
/// # async fn example(settings: Settings) -> gae_exporter::exporter::Result<()> {
/// let runtime = RuntimeConfig::quiet();
/// let artifact = Exporter::new(settings).export(&runtime).await?;
/// println!("{} ({} bytes)", artifact.path.display(), artifact.size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Exporter {
    settings: Settings,
    tools: Toolchain,
}

impl Exporter {
    /// Creates an exporter, locating the external tools.
    pub fn new(settings: Settings) -> Self {
        Self::with_toolchain(settings, Toolchain::detect())
    }

    /// Creates an exporter with explicit tool locations.
    pub fn with_toolchain(settings: Settings, tools: Toolchain) -> Self {
        Self { settings, tools }
    }

    /// Settings this exporter runs with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs every step and returns the signed, renamed APK.
    pub async fn export(&self, runtime: &RuntimeConfig) -> Result<ExportedArtifact> {
        let settings = &self.settings;
        let properties = settings.properties();
        let decompiled = settings.decompiled_dir();
        let runner = ProcessRunner::new(settings.working_dir(), runtime);

        for missing in self.tools.missing() {
            log::warn!("{} was not located; relying on the process search path", missing.display());
        }

        if !settings.template_apk().is_file() {
            return Err(Error::MissingInput {
                what: "Template APK",
                path: settings.template_apk().to_path_buf(),
            });
        }

        runtime.section("DECOMPILING APK")?;
        runner
            .run(
                &decompile_command(&self.tools, settings.template_apk(), decompiled),
                "Decompilation failed",
            )
            .await?;

        manifest::update_app_name(decompiled, &properties.app_name, runtime).await?;
        manifest::update_package_name(decompiled, &properties.package_name, runtime).await?;
        manifest::update_sdk_versions(
            decompiled,
            &properties.min_sdk_version,
            &properties.target_sdk_version,
            runtime,
        )
        .await?;
        manifest::update_version_info(
            decompiled,
            &properties.version_code,
            &properties.version_name,
            runtime,
        )
        .await?;

        match &properties.project_zip_path {
            Some(zip_path) => {
                let assets_dir = settings.assets_dir();
                assets::extract_project(zip_path, &assets_dir, runtime).await?;
                assets::ensure_cl_marker(&assets_dir, settings.working_dir(), runtime).await?;
            }
            None => log::debug!("No project_zip_path configured, skipping asset injection"),
        }

        match &properties.icon_path {
            Some(icon_path) => {
                icons::replace_icons(icon_path, &settings.res_dir(), runtime).await?;
            }
            None => log::debug!("No icon_path configured, keeping template icons"),
        }

        let unsigned = settings.unsigned_apk();
        let aligned = settings.aligned_apk();

        runtime.section("BUILDING APP & SIGNING")?;
        runner
            .run(&rebuild_command(&self.tools, decompiled, &unsigned), "Build failed")
            .await?;
        runner
            .run(&align_command(&self.tools, &unsigned, &aligned), "Alignment failed")
            .await?;
        if !aligned.is_file() {
            bail!("zipalign reported success but {} is missing", aligned.display());
        }
        runner
            .run(
                &sign_command(&self.tools, &properties.keystore, &aligned),
                "Signing failed",
            )
            .await?;

        let artifact_path = settings.artifact_path();
        fs::replace_file(&aligned, &artifact_path).await?;

        let size = tokio::fs::metadata(&artifact_path)
            .await
            .fs_context("reading artifact metadata", &artifact_path)?
            .len();
        let checksum = calculate_sha256(&artifact_path).await?;

        if settings.clean() {
            log::info!("Removing intermediates");
            fs::remove_file(&unsigned).await?;
            fs::remove_dir_all(decompiled).await?;
        }

        runtime.section("PROCESS COMPLETED")?;
        runtime.success(&format!("Final APK: {}", artifact_path.display()))?;
        runtime.indent(&format!("Size: {size} bytes"))?;
        runtime.indent(&format!("SHA-256: {checksum}"))?;

        Ok(ExportedArtifact {
            path: artifact_path,
            size,
            checksum,
        })
    }
}
