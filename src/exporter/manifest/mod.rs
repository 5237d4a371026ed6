//! Edits to the decompiled manifest and string resources.
//!
//! Each edit re-reads its file, applies one change and writes the file back
//! immediately. [`replace_app_name`], [`substitute_package`] and the `set_*`
//! functions work on strings and need no decompiled tree.

mod xml;

use crate::cli::RuntimeConfig;
use crate::exporter::error::{Error, ErrorExt, Result};
use crate::exporter::utils::fs::glob_dirs;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use regex::{NoExpand, Regex};
use std::path::{Path, PathBuf};

/// Package identifier baked into the template APK.
pub const TEMPLATE_PACKAGE: &str = "com.nineboom.AGT";

/// `<string name=...>` holding the Godot project display name.
pub const APP_NAME_KEY: &str = "godot_project_name_string";

const MANIFEST_FILE: &str = "AndroidManifest.xml";
const STRINGS_FILE: &str = "strings.xml";

/// Previous values reported by [`set_version_info`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VersionChange {
    /// `versionCode` before the edit
    pub previous_code: Option<String>,
    /// `versionName` before the edit
    pub previous_name: Option<String>,
}

/// Replaces the text of every top-level `<string name="godot_project_name_string">`.
///
/// Returns the new document and the replaced texts, one per match.
pub fn replace_app_name(strings_xml: &str, app_name: &str) -> quick_xml::Result<(String, Vec<String>)> {
    let mut replaced = Vec::new();
    let mut skipping = false;
    let mut old_text = String::new();

    let content = xml::rewrite(strings_xml, |w, event, depth| {
        if skipping {
            match event {
                Event::End(end) if depth == 1 => {
                    skipping = false;
                    replaced.push(std::mem::take(&mut old_text));
                    w.write_event(Event::End(end))?;
                }
                Event::Text(text) => old_text.push_str(&String::from_utf8_lossy(&text)),
                Event::CData(data) => old_text.push_str(&String::from_utf8_lossy(&data)),
                _ => {}
            }
            return Ok(());
        }

        match event {
            Event::Start(start) if depth == 1 && is_app_name_string(&start)? => {
                w.write_event(Event::Start(start))?;
                w.write_event(Event::Text(BytesText::new(app_name)))?;
                skipping = true;
            }
            Event::Empty(start) if depth == 1 && is_app_name_string(&start)? => {
                let end = BytesEnd::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                w.write_event(Event::Start(start))?;
                w.write_event(Event::Text(BytesText::new(app_name)))?;
                w.write_event(Event::End(end))?;
                replaced.push(String::new());
            }
            other => w.write_event(other)?,
        }
        Ok(())
    })?;

    Ok((content, replaced))
}

fn is_app_name_string(start: &BytesStart<'_>) -> quick_xml::Result<bool> {
    Ok(start.name().as_ref() == b"string"
        && xml::attribute(start, "name")?.as_deref() == Some(APP_NAME_KEY))
}

/// Substitutes the template package identifier on raw text.
///
/// Matches `com.nineboom.AGT` on word boundaries only. Returns `None` when
/// there is nothing to replace, which makes a second application a no-op.
pub fn substitute_package(manifest: &str, new_package: &str) -> Result<Option<String>> {
    let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(TEMPLATE_PACKAGE)))?;
    if !pattern.is_match(manifest) {
        return Ok(None);
    }
    let replaced = pattern.replace_all(manifest, NoExpand(new_package)).into_owned();
    if replaced == manifest {
        return Ok(None);
    }
    Ok(Some(replaced))
}

/// Sets `minSdkVersion`/`targetSdkVersion` on the root's `<uses-sdk>`,
/// appending a new `<uses-sdk/>` as the root's last child when there is none.
///
/// Returns the new document and whether the element had to be created.
pub fn set_sdk_versions(manifest: &str, min_sdk: &str, target_sdk: &str) -> quick_xml::Result<(String, bool)> {
    let mut prefix = String::from("android");
    let mut found = false;
    let mut created = false;

    let uses_sdk = |start: &BytesStart<'_>, prefix: &str| -> quick_xml::Result<BytesStart<'static>> {
        let (start, _) = xml::with_attribute(start, &format!("{prefix}:minSdkVersion"), min_sdk)?;
        let (start, _) = xml::with_attribute(&start, &format!("{prefix}:targetSdkVersion"), target_sdk)?;
        Ok(start)
    };

    let content = xml::rewrite(manifest, |w, event, depth| {
        match event {
            Event::Start(root) if depth == 0 => {
                let (root, bound) = xml::bind_android_namespace(&root)?;
                prefix = bound;
                w.write_event(Event::Start(root))?;
            }
            Event::Empty(root) if depth == 0 => {
                let (root, bound) = xml::bind_android_namespace(&root)?;
                prefix = bound;
                let end = BytesEnd::new(String::from_utf8_lossy(root.name().as_ref()).into_owned());
                w.write_event(Event::Start(root))?;
                w.write_event(Event::Empty(uses_sdk(&BytesStart::new("uses-sdk"), &prefix)?))?;
                w.write_event(Event::End(end))?;
                created = true;
            }
            Event::Start(start) if depth == 1 && !found && start.name().as_ref() == b"uses-sdk" => {
                found = true;
                w.write_event(Event::Start(uses_sdk(&start, &prefix)?))?;
            }
            Event::Empty(start) if depth == 1 && !found && start.name().as_ref() == b"uses-sdk" => {
                found = true;
                w.write_event(Event::Empty(uses_sdk(&start, &prefix)?))?;
            }
            Event::End(end) if depth == 0 => {
                if !found {
                    w.write_event(Event::Empty(uses_sdk(&BytesStart::new("uses-sdk"), &prefix)?))?;
                    created = true;
                }
                w.write_event(Event::End(end))?;
            }
            other => w.write_event(other)?,
        }
        Ok(())
    })?;

    Ok((content, created))
}

/// Sets `versionCode`/`versionName` on the manifest root, overwriting any
/// previous values.
pub fn set_version_info(manifest: &str, version_code: &str, version_name: &str) -> quick_xml::Result<(String, VersionChange)> {
    let mut change = VersionChange::default();

    let content = xml::rewrite(manifest, |w, event, depth| {
        match event {
            Event::Start(ref root) | Event::Empty(ref root) if depth == 0 => {
                let (root_el, prefix) = xml::bind_android_namespace(root)?;
                let (root_el, code) =
                    xml::with_attribute(&root_el, &format!("{prefix}:versionCode"), version_code)?;
                let (root_el, name) =
                    xml::with_attribute(&root_el, &format!("{prefix}:versionName"), version_name)?;
                change = VersionChange {
                    previous_code: code,
                    previous_name: name,
                };
                if matches!(event, Event::Start(_)) {
                    w.write_event(Event::Start(root_el))?;
                } else {
                    w.write_event(Event::Empty(root_el))?;
                }
            }
            other => w.write_event(other)?,
        }
        Ok(())
    })?;

    Ok((content, change))
}

/// Writes the configured display name into every `res/values*/strings.xml`.
///
/// Returns the number of files processed.
pub async fn update_app_name(decompiled_dir: &Path, app_name: &str, runtime: &RuntimeConfig) -> Result<usize> {
    runtime.section("UPDATING APP NAME")?;

    let mut processed = 0;
    for values_dir in glob_dirs(&decompiled_dir.join("res"), "values*")? {
        let strings_path = values_dir.join(STRINGS_FILE);
        if !strings_path.is_file() {
            log::debug!("No {} in {}", STRINGS_FILE, values_dir.display());
            continue;
        }

        runtime.progress(&format!("Processing: {}", strings_path.display()))?;
        let text = read(&strings_path).await?;
        let (content, replaced) =
            replace_app_name(&text, app_name).map_err(|error| xml_error(&strings_path, error))?;

        for previous in &replaced {
            runtime.change(&format!("Found {APP_NAME_KEY}: {previous} -> {app_name}"))?;
        }

        write(&strings_path, content).await?;
        processed += 1;
    }

    Ok(processed)
}

/// Replaces the template package identifier in the manifest.
///
/// Returns `false` when the placeholder was not found (nothing written).
pub async fn update_package_name(decompiled_dir: &Path, new_package: &str, runtime: &RuntimeConfig) -> Result<bool> {
    runtime.section("UPDATING PACKAGE NAME")?;

    let manifest_path = decompiled_dir.join(MANIFEST_FILE);
    let text = read(&manifest_path).await?;

    match substitute_package(&text, new_package)? {
        Some(content) => {
            write(&manifest_path, content).await?;
            runtime.change(&format!("Replaced package: {TEMPLATE_PACKAGE} -> {new_package}"))?;
            Ok(true)
        }
        None => {
            runtime.change("No package name replacements needed")?;
            Ok(false)
        }
    }
}

/// Sets the SDK bounds in the manifest.
pub async fn update_sdk_versions(
    decompiled_dir: &Path,
    min_sdk: &str,
    target_sdk: &str,
    runtime: &RuntimeConfig,
) -> Result<()> {
    runtime.section("UPDATING SDK VERSIONS")?;

    let manifest_path = decompiled_dir.join(MANIFEST_FILE);
    let text = read(&manifest_path).await?;
    let (content, created) = set_sdk_versions(&text, min_sdk, target_sdk)
        .map_err(|error| xml_error(&manifest_path, error))?;

    if created {
        runtime.change("Created new uses-sdk element")?;
    }
    write(&manifest_path, content).await?;
    runtime.success(&format!(
        "Updated SDK versions: minSdk={min_sdk}, targetSdk={target_sdk}"
    ))?;

    Ok(())
}

/// Sets `versionCode`/`versionName` in the manifest.
pub async fn update_version_info(
    decompiled_dir: &Path,
    version_code: &str,
    version_name: &str,
    runtime: &RuntimeConfig,
) -> Result<()> {
    runtime.section("UPDATING VERSION INFO")?;

    let manifest_path = decompiled_dir.join(MANIFEST_FILE);
    let text = read(&manifest_path).await?;
    let (content, change) = set_version_info(&text, version_code, version_name)
        .map_err(|error| xml_error(&manifest_path, error))?;

    if let Some(previous) = &change.previous_code {
        runtime.change(&format!("Updating versionCode: {previous} -> {version_code}"))?;
    }
    if let Some(previous) = &change.previous_name {
        runtime.change(&format!("Updating versionName: {previous} -> {version_name}"))?;
    }

    write(&manifest_path, content).await?;
    runtime.success(&format!(
        "Updated versions: versionName={version_name}, versionCode={version_code}"
    ))?;

    Ok(())
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .fs_context("reading resource file", path)
}

async fn write(path: &Path, content: String) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .fs_context("writing resource file", path)
}

fn xml_error(path: &Path, error: quick_xml::Error) -> Error {
    Error::Xml {
        path: PathBuf::from(path),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" android:versionCode="1" android:versionName="1.0" package="com.nineboom.AGT">
    <uses-permission android:name="com.nineboom.AGT.permission.C2D"/>
    <application android:label="@string/godot_project_name_string"/>
</manifest>
"#;

    const STRINGS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="godot_project_name_string">Template</string>
    <string name="other">Keep &amp; me</string>
</resources>
"#;

    #[test]
    fn app_name_replaces_matching_string_only() {
        let (out, replaced) = replace_app_name(STRINGS, "My <Game>").unwrap();

        assert_eq!(replaced, ["Template"]);
        assert!(out.contains(r#"<string name="godot_project_name_string">My &lt;Game&gt;</string>"#));
        assert!(out.contains(r#"<string name="other">Keep &amp; me</string>"#));
    }

    #[test]
    fn app_name_without_match_leaves_content() {
        let src = STRINGS.replace("godot_project_name_string", "app_title");
        let (out, replaced) = replace_app_name(&src, "Foo").unwrap();

        assert!(replaced.is_empty());
        assert_eq!(out, src);
    }

    #[test]
    fn app_name_fills_empty_element() {
        let src = r#"<resources><string name="godot_project_name_string"/></resources>"#;
        let (out, replaced) = replace_app_name(src, "Foo").unwrap();

        assert_eq!(replaced.len(), 1);
        assert!(out.ends_with(r#"<resources><string name="godot_project_name_string">Foo</string></resources>"#));
    }

    #[test]
    fn app_name_ignores_nested_strings() {
        let src = r#"<resources><group><string name="godot_project_name_string">Old</string></group></resources>"#;
        let (out, replaced) = replace_app_name(src, "Foo").unwrap();

        assert!(replaced.is_empty());
        assert!(out.contains(">Old<"));
    }

    #[test]
    fn package_substitution_is_idempotent() {
        let once = substitute_package(MANIFEST, "com.example.foo").unwrap().unwrap();
        assert!(!once.contains(TEMPLATE_PACKAGE));
        assert!(once.contains(r#"package="com.example.foo""#));
        assert!(once.contains("com.example.foo.permission.C2D"));

        assert_eq!(substitute_package(&once, "com.example.foo").unwrap(), None);
    }

    #[test]
    fn package_substitution_respects_word_boundaries() {
        let src = r#"<manifest package="com.nineboom.AGTX"/>"#;
        assert_eq!(substitute_package(src, "com.example.foo").unwrap(), None);
    }

    #[test]
    fn package_substitution_is_literal() {
        let out = substitute_package(MANIFEST, "com.example.$1").unwrap().unwrap();
        assert!(out.contains(r#"package="com.example.$1""#));
    }

    #[test]
    fn sdk_element_is_created_when_missing() {
        let (out, created) = set_sdk_versions(MANIFEST, "21", "34").unwrap();

        assert!(created);
        assert!(out.contains(
            r#"<uses-sdk android:minSdkVersion="21" android:targetSdkVersion="34"/></manifest>"#
        ));
    }

    #[test]
    fn sdk_element_is_updated_in_place() {
        let src = MANIFEST.replace(
            "    <application",
            "    <uses-sdk android:minSdkVersion=\"19\" android:targetSdkVersion=\"30\"/>\n    <application",
        );
        let (out, created) = set_sdk_versions(&src, "24", "35").unwrap();

        assert!(!created);
        assert_eq!(out.matches("<uses-sdk").count(), 1);
        assert!(out.contains(r#"<uses-sdk android:minSdkVersion="24" android:targetSdkVersion="35"/>"#));
    }

    #[test]
    fn sdk_uses_document_prefix() {
        let src = r#"<manifest xmlns:a="http://schemas.android.com/apk/res/android"></manifest>"#;
        let (out, _) = set_sdk_versions(src, "21", "34").unwrap();

        assert!(out.contains(r#"<uses-sdk a:minSdkVersion="21" a:targetSdkVersion="34"/>"#));
    }

    #[test]
    fn version_info_overwrites_root_attributes() {
        let (out, change) = set_version_info(MANIFEST, "7", "1.0.7").unwrap();

        assert_eq!(change.previous_code.as_deref(), Some("1"));
        assert_eq!(change.previous_name.as_deref(), Some("1.0"));
        assert!(out.contains(r#"android:versionCode="7" android:versionName="1.0.7""#));
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<manifest"));
    }

    #[test]
    fn version_info_binds_namespace_when_missing() {
        let (out, change) = set_version_info("<manifest package=\"x\"/>", "3", "0.3").unwrap();

        assert_eq!(change, VersionChange::default());
        assert!(out.contains(
            r#"<manifest package="x" xmlns:android="http://schemas.android.com/apk/res/android" android:versionCode="3" android:versionName="0.3"/>"#
        ));
    }

    #[tokio::test]
    async fn update_app_name_skips_values_dirs_without_strings() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path().join("res");
        std::fs::create_dir_all(res.join("values")).unwrap();
        std::fs::create_dir_all(res.join("values-fr")).unwrap();
        std::fs::create_dir_all(res.join("values-v21")).unwrap();
        std::fs::write(res.join("values/strings.xml"), STRINGS).unwrap();
        std::fs::write(res.join("values-fr/strings.xml"), STRINGS).unwrap();

        let runtime = RuntimeConfig::quiet();
        let processed = update_app_name(dir.path(), "Foo", &runtime).await.unwrap();

        assert_eq!(processed, 2);
        let fr = std::fs::read_to_string(res.join("values-fr/strings.xml")).unwrap();
        assert!(fr.contains(">Foo</string>"));
        assert!(!res.join("values-v21/strings.xml").exists());
    }

    #[tokio::test]
    async fn manifest_edits_compose() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        let runtime = RuntimeConfig::quiet();

        assert!(update_package_name(dir.path(), "com.example.foo", &runtime).await.unwrap());
        assert!(!update_package_name(dir.path(), "com.example.foo", &runtime).await.unwrap());
        update_sdk_versions(dir.path(), "21", "34", &runtime).await.unwrap();
        update_version_info(dir.path(), "7", "1.0.7", &runtime).await.unwrap();

        let out = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(out.contains(r#"package="com.example.foo""#));
        assert!(out.contains(r#"android:minSdkVersion="21""#));
        assert!(out.contains(r#"android:versionCode="7""#));
    }
}
