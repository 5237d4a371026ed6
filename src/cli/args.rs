//! Command line argument parsing and validation.

use super::OutputManager;
use crate::exporter::{DEFAULT_DECOMPILED_DIR, DEFAULT_TEMPLATE_APK};
use crate::properties::PROPERTIES_FILE;
use clap::Parser;
use std::path::PathBuf;

/// Godot Android Exporter
#[derive(Parser, Debug)]
#[command(
    name = "gae",
    version,
    about = "Rebrands a signed Godot template APK and re-signs it",
    long_about = "Rebrands a signed Godot template APK and re-signs it.

Reads properties.gae from the working directory, decompiles the template with
apktool, rewrites app name, package, SDK and version info, optionally injects
a project archive and launcher icons, then rebuilds, aligns and signs the APK
as {app_name}_{version_code}.apk.

Usage:
  gae
  gae -C ./build --clean
  gae --template base.apk --properties release.gae

Exit code 0 = signed artifact exists in the working directory."
)]
pub struct Args {
    /// Directory holding the template, keystore and properties file
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub working_dir: PathBuf,

    /// Properties file, relative to the working directory
    #[arg(short, long, value_name = "FILE", default_value = PROPERTIES_FILE)]
    pub properties: PathBuf,

    /// Template APK, relative to the working directory
    #[arg(short, long, value_name = "APK", default_value = DEFAULT_TEMPLATE_APK)]
    pub template: PathBuf,

    /// Directory apktool decompiles into, relative to the working directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_DECOMPILED_DIR)]
    pub decompiled_dir: PathBuf,

    /// Remove unsigned.apk and the decompiled directory after success
    #[arg(long)]
    pub clean: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.working_dir.as_os_str().is_empty() {
            return Err("Working directory cannot be empty".to_string());
        }

        for (flag, path) in [
            ("--properties", &self.properties),
            ("--template", &self.template),
            ("--decompiled-dir", &self.decompiled_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(format!("{flag} cannot be empty"));
            }
        }

        if self.decompiled_dir.components().count() == 1
            && matches!(
                self.decompiled_dir.components().next(),
                Some(std::path::Component::CurDir | std::path::Component::ParentDir)
            )
        {
            return Err(format!(
                "--decompiled-dir must name a subdirectory, got {}",
                self.decompiled_dir.display()
            ));
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: OutputManager::new(args.quiet, !args.no_color),
        }
    }
}

impl RuntimeConfig {
    /// Runtime that prints only errors, without color.
    pub fn quiet() -> Self {
        Self {
            output: OutputManager::new(true, false),
        }
    }

    /// Runtime writing through `output`.
    #[cfg(test)]
    pub(crate) fn with_output(output: OutputManager) -> Self {
        Self { output }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &OutputManager {
        &self.output
    }

    /// Print success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print a before/after change
    pub fn change(&self, message: &str) -> std::io::Result<()> {
        self.output.change(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }

    /// Print error message, even when quiet
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }
}
