//! Builder for constructing Settings.

use super::{DEFAULT_DECOMPILED_DIR, DEFAULT_TEMPLATE_APK, Settings};
use crate::exporter::error::{Context, Result};
use crate::properties::Properties;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Relative template and decompiled paths are joined onto the working
/// directory when the settings are built.
///
/// # Examples
///
/// ```no_run
/// use gae_exporter::exporter::SettingsBuilder;
/// use gae_exporter::properties::Properties;
///
/// # fn example(properties: Properties) -> gae_exporter::exporter::Result<()> {
/// let settings = SettingsBuilder::new()
///     .working_dir("/srv/build")
///     .properties(properties)
///     .clean(true)
///     .build()?;
/// assert!(settings.template_apk().ends_with("android_godot_template_signed.apk"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    properties: Option<Properties>,
    working_dir: Option<PathBuf>,
    template_apk: Option<PathBuf>,
    decompiled_dir: Option<PathBuf>,
    clean: bool,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the rebranding configuration.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Sets the working directory.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn working_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.working_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the template APK.
    ///
    /// Default: `android_godot_template_signed.apk`
    pub fn template_apk<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.template_apk = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the decompilation directory.
    ///
    /// Default: `decompiled_apk`
    pub fn decompiled_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.decompiled_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Removes `unsigned.apk` and the decompiled tree after success.
    ///
    /// Default: false
    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `properties` or `working_dir` is missing.
    pub fn build(self) -> Result<Settings> {
        let properties = self.properties.context("properties are required")?;
        let working_dir = self.working_dir.context("working_dir is required")?;

        let template_apk = working_dir.join(
            self.template_apk
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_APK)),
        );
        let decompiled_dir = working_dir.join(
            self.decompiled_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DECOMPILED_DIR)),
        );

        Ok(Settings::new(
            properties,
            working_dir,
            template_apk,
            decompiled_dir,
            self.clean,
        ))
    }
}
