//! Core Settings struct.

use super::{ALIGNED_APK, UNSIGNED_APK};
use crate::properties::Properties;
use std::path::{Path, PathBuf};

/// Everything an [`Exporter`](crate::exporter::Exporter) needs to run.
///
/// All paths are absolute or relative to [`Settings::working_dir`], which is
/// also the directory the external tools run in.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Rebranding configuration.
    properties: Properties,

    /// Directory holding the template, the keystore and the outputs.
    working_dir: PathBuf,

    /// Template APK to decompile.
    template_apk: PathBuf,

    /// Directory `apktool` decompiles into and rebuilds from.
    decompiled_dir: PathBuf,

    /// Remove intermediates after a successful run.
    clean: bool,
}

impl Settings {
    pub(super) fn new(
        properties: Properties,
        working_dir: PathBuf,
        template_apk: PathBuf,
        decompiled_dir: PathBuf,
        clean: bool,
    ) -> Self {
        Self {
            properties,
            working_dir,
            template_apk,
            decompiled_dir,
            clean,
        }
    }

    /// Rebranding configuration.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Template APK location.
    pub fn template_apk(&self) -> &Path {
        &self.template_apk
    }

    /// Decompiled tree root.
    pub fn decompiled_dir(&self) -> &Path {
        &self.decompiled_dir
    }

    /// Whether intermediates are removed after success.
    pub fn clean(&self) -> bool {
        self.clean
    }

    /// `res/` inside the decompiled tree.
    pub fn res_dir(&self) -> PathBuf {
        self.decompiled_dir.join("res")
    }

    /// `assets/` inside the decompiled tree.
    pub fn assets_dir(&self) -> PathBuf {
        self.decompiled_dir.join("assets")
    }

    /// `unsigned.apk` in the working directory.
    pub fn unsigned_apk(&self) -> PathBuf {
        self.working_dir.join(UNSIGNED_APK)
    }

    /// `aligned.apk` in the working directory.
    pub fn aligned_apk(&self) -> PathBuf {
        self.working_dir.join(ALIGNED_APK)
    }

    /// Final artifact, `{app_name}_{version_code}.apk` in the working directory.
    pub fn artifact_path(&self) -> PathBuf {
        self.working_dir.join(self.properties.artifact_name())
    }
}
