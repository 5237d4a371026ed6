//! APK rebranding pipeline.
//!
//! Takes a signed Godot template APK apart with `apktool`, rewrites its
//! identity (display name, package, SDK bounds, version), optionally injects
//! a project archive and launcher icons, then rebuilds, aligns and signs it.
//!
//! # Example
//!
//! ```no_run
//! use gae_exporter::cli::RuntimeConfig;
//! use gae_exporter::exporter::{Exporter, SettingsBuilder};
//! use gae_exporter::properties::Properties;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let working_dir = Path::new("/srv/build");
//! let properties = Properties::load(&working_dir.join("properties.gae"), working_dir).await?;
//! let settings = SettingsBuilder::new()
//!     .working_dir(working_dir)
//!     .properties(properties)
//!     .build()?;
//!
//! let artifact = Exporter::new(settings).export(&RuntimeConfig::quiet()).await?;
//! println!("SHA256: {}", artifact.checksum);
//! # Ok(())
//! # }
//! ```

pub mod assets;
mod builder;
pub mod error;
pub mod icons;
pub mod manifest;
pub mod process;
mod settings;
pub mod utils;

pub use builder::{Exporter, Toolchain, calculate_sha256};
pub use error::{Context, Error, ErrorExt, Result};
pub use settings::{
    ALIGNED_APK, DEFAULT_DECOMPILED_DIR, DEFAULT_TEMPLATE_APK, Settings, SettingsBuilder,
    UNSIGNED_APK,
};

use std::path::PathBuf;

/// The signed APK produced by a successful run.
#[derive(Debug, Clone)]
pub struct ExportedArtifact {
    /// `{app_name}_{version_code}.apk` in the working directory
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Hex-encoded SHA-256
    pub checksum: String,
}
