//! External tool discovery.
//!
//! Tools are looked up on `PATH` first. `zipalign` and `apksigner` ship with
//! the Android SDK build-tools, so the newest build-tools directory under
//! `$ANDROID_SDK_ROOT`/`$ANDROID_HOME` is tried next. A tool found nowhere
//! keeps its bare name and fails when it is launched.

use std::path::{Path, PathBuf};

/// Resolved tool locations.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// APK decompiler/rebuilder
    pub apktool: PathBuf,
    /// Archive aligner
    pub zipalign: PathBuf,
    /// APK signer
    pub apksigner: PathBuf,
}

impl Toolchain {
    /// Locates all tools, logging where each was found.
    pub fn detect() -> Self {
        let build_tools = sdk_build_tools();
        if let Some(dir) = &build_tools {
            log::debug!("Android build-tools: {}", dir.display());
        }

        Self {
            apktool: locate("apktool", None),
            zipalign: locate(zipalign_name(), build_tools.as_deref()),
            apksigner: locate(apksigner_name(), build_tools.as_deref()),
        }
    }

    /// Tools whose location could not be confirmed.
    pub fn missing(&self) -> Vec<&Path> {
        [&self.apktool, &self.zipalign, &self.apksigner]
            .into_iter()
            .filter(|path| !path.is_absolute())
            .map(PathBuf::as_path)
            .collect()
    }
}

fn zipalign_name() -> &'static str {
    if cfg!(windows) { "zipalign.exe" } else { "zipalign" }
}

fn apksigner_name() -> &'static str {
    if cfg!(windows) { "apksigner.bat" } else { "apksigner" }
}

fn locate(name: &str, build_tools: Option<&Path>) -> PathBuf {
    match which::which(name) {
        Ok(path) => {
            log::debug!("Found {} at: {}", name, path.display());
            return path;
        }
        Err(e) => log::debug!("{} not found in PATH: {}", name, e),
    }

    if let Some(candidate) = build_tools.map(|dir| dir.join(name)) {
        if candidate.is_file() {
            log::debug!("Found {} at: {}", name, candidate.display());
            return candidate;
        }
    }

    log::warn!("{} not found in PATH or Android build-tools", name);
    PathBuf::from(name)
}

/// Newest `build-tools/<version>` directory of the Android SDK, if any.
fn sdk_build_tools() -> Option<PathBuf> {
    let sdk = std::env::var_os("ANDROID_SDK_ROOT").or_else(|| std::env::var_os("ANDROID_HOME"))?;
    newest_build_tools(&Path::new(&sdk).join("build-tools"))
}

fn newest_build_tools(build_tools_dir: &Path) -> Option<PathBuf> {
    std::fs::read_dir(build_tools_dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            let version = parse_version(&name)?;
            Some((version, e.path()))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}

/// `"34.0.0"` → `[34, 0, 0]`. Suffixes like `-rc1` are ignored.
fn parse_version(name: &str) -> Option<Vec<u32>> {
    let numeric = name.split('-').next()?;
    numeric.split('.').map(|part| part.parse().ok()).collect()
}
