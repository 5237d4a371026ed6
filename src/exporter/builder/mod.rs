//! Export orchestration.
//!
//! The [`Exporter`] runs the whole pipeline against one [`Settings`]:
//!
//! 1. Decompile the template with `apktool d`
//! 2. Rewrite app name, package, SDK bounds and version info
//! 3. Optionally inject project assets and replace launcher icons
//! 4. Rebuild, align and sign
//! 5. Rename to `{app_name}_{version_code}.apk` and hash the result
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 of the final APK
//! - [`orchestrator`] - [`Exporter`] and the step sequence
//! - [`signing`] - Command lines for apktool, zipalign and apksigner
//! - [`tool_detection`] - Locating the external tools
//!
//! [`Settings`]: crate::exporter::Settings

mod checksum;
mod orchestrator;
mod signing;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use orchestrator::Exporter;
pub use tool_detection::Toolchain;
