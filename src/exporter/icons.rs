//! Launcher icon replacement.
//!
//! One source image is resized once per `res/mipmap-*` directory and written
//! over the icon files the template already ships there.

use crate::cli::RuntimeConfig;
use crate::exporter::error::{Error, Result};
use crate::exporter::utils::fs::glob_dirs;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// Density qualifier → square icon size, tested in order against the
/// directory name. The first substring match wins.
pub const ICON_SIZES: [(&str, u32); 8] = [
    ("ldpi", 36),
    ("mdpi", 48),
    ("hdpi", 72),
    ("xhdpi", 96),
    ("xxhdpi", 144),
    ("xxxhdpi", 192),
    ("anydpi", 512),
    ("v4", 512),
];

/// Size used when no qualifier matches.
pub const DEFAULT_ICON_SIZE: u32 = 512;

/// Icon files overwritten when present. Missing ones are never created.
pub const ICON_FILES: [&str; 3] = ["icon.png", "icon_background.png", "icon_foreground.png"];

/// Square dimension for a mipmap directory name.
pub fn icon_size(dir_name: &str) -> u32 {
    ICON_SIZES
        .iter()
        .find(|(qualifier, _)| dir_name.contains(qualifier))
        .map(|(_, size)| *size)
        .unwrap_or(DEFAULT_ICON_SIZE)
}

/// Replaces the launcher icons under `res_dir`.
///
/// Returns the paths that were overwritten.
pub async fn replace_icons(icon_path: &Path, res_dir: &Path, runtime: &RuntimeConfig) -> Result<Vec<PathBuf>> {
    runtime.section("REPLACING ICONS")?;

    let mipmap_dirs = glob_dirs(res_dir, "mipmap-*")?;
    let targets: Vec<(PathBuf, u32, Vec<PathBuf>)> = mipmap_dirs
        .into_iter()
        .map(|dir| {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let existing = ICON_FILES
                .iter()
                .map(|file| dir.join(file))
                .filter(|path| path.is_file())
                .collect();
            (dir, icon_size(&name), existing)
        })
        .collect();

    for (dir, size, _) in &targets {
        let name = dir.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        runtime.progress(&format!("Processing {name} - Size: {size}x{size}"))?;
    }

    let icon_path = icon_path.to_path_buf();
    let replaced = tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
        let original = image::open(&icon_path)?;
        let mut replaced = Vec::new();

        for (_, size, existing) in targets {
            let resized = original.resize_exact(size, size, FilterType::Lanczos3);
            for target in existing {
                resized.save(&target)?;
                log::debug!("Wrote {}x{} icon to {}", size, size, target.display());
                replaced.push(target);
            }
        }

        Ok(replaced)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Icon resize task panicked: {}", e)))?;

    let replaced = match replaced {
        Ok(replaced) => replaced,
        Err(e) => {
            let _ = runtime.error(&format!("Error replacing icons: {e}"));
            return Err(e);
        }
    };

    for path in &replaced {
        runtime.success(&format!("Replaced: {}", path.display()))?;
    }

    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    #[test]
    fn known_qualifiers() {
        assert_eq!(icon_size("mipmap-ldpi"), 36);
        assert_eq!(icon_size("mipmap-mdpi"), 48);
        assert_eq!(icon_size("mipmap-hdpi"), 72);
        assert_eq!(icon_size("mipmap-anydpi-v26"), 512);
        assert_eq!(icon_size("mipmap-v4"), 512);
    }

    #[test]
    fn first_match_wins() {
        // "hdpi" precedes the x-prefixed qualifiers in the table.
        assert_eq!(icon_size("mipmap-xhdpi"), 72);
        assert_eq!(icon_size("mipmap-xxhdpi-v4"), 72);
        assert_eq!(icon_size("mipmap-xxxhdpi"), 72);
        assert_eq!(icon_size("mipmap-mdpi-v4"), 48);
    }

    #[test]
    fn unmatched_uses_default() {
        assert_eq!(icon_size("mipmap-night"), DEFAULT_ICON_SIZE);
        assert_eq!(icon_size("mipmap"), DEFAULT_ICON_SIZE);
    }

    #[tokio::test]
    async fn overwrites_only_existing_icons() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path().join("res");
        let mdpi = res.join("mipmap-mdpi");
        let other = res.join("mipmap-night");
        std::fs::create_dir_all(&mdpi).unwrap();
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(mdpi.join("icon.png"), b"stale").unwrap();
        std::fs::write(other.join("icon_foreground.png"), b"stale").unwrap();

        let source = dir.path().join("source.png");
        RgbaImage::from_pixel(20, 20, Rgba([200, 10, 10, 255]))
            .save(&source)
            .unwrap();

        let runtime = RuntimeConfig::quiet();
        let replaced = replace_icons(&source, &res, &runtime).await.unwrap();

        assert_eq!(replaced.len(), 2);
        assert_eq!(image::open(mdpi.join("icon.png")).unwrap().dimensions(), (48, 48));
        assert_eq!(
            image::open(other.join("icon_foreground.png")).unwrap().dimensions(),
            (512, 512)
        );
        assert!(!mdpi.join("icon_background.png").exists());
        assert!(!mdpi.join("icon_foreground.png").exists());
    }

    #[tokio::test]
    async fn unreadable_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path().join("res");
        std::fs::create_dir_all(res.join("mipmap-hdpi")).unwrap();
        let source = dir.path().join("broken.png");
        std::fs::write(&source, b"not an image").unwrap();

        let runtime = RuntimeConfig::quiet();
        let err = replace_icons(&source, &res, &runtime).await.unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }
}
