//! Godot Android Exporter library
//!
//! Rebrands a signed Godot template APK:
//! - decompiles it with `apktool`
//! - rewrites display name, package, SDK bounds and version info
//! - optionally injects a project archive and launcher icons
//! - rebuilds, aligns with `zipalign` and signs with `apksigner`
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod exporter;
pub mod properties;

// Re-export commonly used types
pub use error::{AppError, CliError, Result};
pub use exporter::{ExportedArtifact, Exporter};
pub use properties::Properties;
