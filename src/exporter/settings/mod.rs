//! Configuration for a single export run.
//!
//! [`Settings`] combines the loaded [`Properties`](crate::properties::Properties)
//! with the on-disk layout of the working directory, and is built with
//! [`SettingsBuilder`].

mod builder;
mod core;

pub use builder::SettingsBuilder;
pub use core::Settings;

/// Default template APK file name.
pub const DEFAULT_TEMPLATE_APK: &str = "android_godot_template_signed.apk";

/// Default directory `apktool d` decompiles into.
pub const DEFAULT_DECOMPILED_DIR: &str = "decompiled_apk";

/// Output of `apktool b`.
pub const UNSIGNED_APK: &str = "unsigned.apk";

/// Output of `zipalign`, signed in place.
pub const ALIGNED_APK: &str = "aligned.apk";
