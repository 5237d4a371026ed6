//! Loading of `properties.gae`, the rebranding configuration.
//!
//! The file is a flat list of `key=value` lines with one implicit INI section:
//!
//! ```text
//! app_name=My Game
//! package_name=com.example.mygame
//! version_code=7
//! version_name=1.0.7
//! minSdkVersion=21
//! targetSdkVersion=34
//! keystone_path=release.jks
//! keystone_user=release
//! keystone_pass=secret
//! project_zip_path=project.zip
//! icon_path=icon.png
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed name of the properties file looked up in the working directory.
pub const PROPERTIES_FILE: &str = "properties.gae";

const MASK: &str = "********";

/// Errors raised while loading `properties.gae`.
#[derive(Error, Debug)]
pub enum PropertiesError {
    /// The file does not exist.
    #[error("properties.gae not found: {}", .path.display())]
    NotFound {
        /// Expected location
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read {}: {error}", .path.display())]
    Read {
        /// File location
        path: PathBuf,
        /// Underlying error
        error: std::io::Error,
    },

    /// The file is malformed or a required key is missing.
    #[error("invalid properties in {}: {error}", .path.display())]
    Invalid {
        /// File location
        path: PathBuf,
        /// Parse or deserialization error
        error: config::ConfigError,
    },
}

/// Keystore used by `apksigner`.
///
/// The store password doubles as the key password.
#[derive(Clone)]
pub struct KeystoreSettings {
    /// Path to the keystore file
    pub path: PathBuf,
    /// Key alias inside the keystore
    pub alias: String,
    /// Store and key password
    pub password: String,
}

impl fmt::Debug for KeystoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreSettings")
            .field("path", &self.path)
            .field("alias", &self.alias)
            .field("password", &MASK)
            .finish()
    }
}

/// Rebranding configuration, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Properties {
    /// Display name written into every `strings.xml`
    pub app_name: String,
    /// Package identifier replacing the template placeholder
    pub package_name: String,
    /// `android:versionCode`
    pub version_code: String,
    /// `android:versionName`
    pub version_name: String,
    /// `android:minSdkVersion`
    pub min_sdk_version: String,
    /// `android:targetSdkVersion`
    pub target_sdk_version: String,
    /// Signing keystore
    pub keystore: KeystoreSettings,
    /// Project archive extracted into `assets/`. `None` skips asset injection.
    pub project_zip_path: Option<PathBuf>,
    /// Source icon. `None` leaves the template icons untouched.
    pub icon_path: Option<PathBuf>,
}

/// On-disk shape of the file, after keys have been lowercased.
#[derive(Deserialize)]
struct RawProperties {
    app_name: String,
    package_name: String,
    version_code: String,
    version_name: String,
    #[serde(rename = "minsdkversion")]
    min_sdk_version: String,
    #[serde(rename = "targetsdkversion")]
    target_sdk_version: String,
    keystone_path: String,
    keystone_user: String,
    keystone_pass: String,
    #[serde(default)]
    project_zip_path: Option<String>,
    #[serde(default)]
    icon_path: Option<String>,
}

/// `properties.gae` as a [`config::Source`].
///
/// Values are taken verbatim: no quote stripping and no backslash escapes, so
/// Windows paths and passwords survive. Keys are case-insensitive and every
/// section is folded into the root table.
#[derive(Debug, Clone)]
struct PropertiesSource {
    text: String,
}

impl config::Source for PropertiesSource {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let options = ini::ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..Default::default()
        };
        let ini = ini::Ini::load_from_str_opt(&self.text, options)
            .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;

        let mut map = config::Map::new();
        for (_, section) in ini.iter() {
            for (key, value) in section.iter() {
                map.insert(
                    key.trim().to_lowercase(),
                    config::Value::new(None, value.to_string()),
                );
            }
        }
        Ok(map)
    }
}

impl Properties {
    /// Parses properties text. Relative paths are resolved against `base_dir`.
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self, config::ConfigError> {
        let raw: RawProperties = config::Config::builder()
            .add_source(PropertiesSource {
                text: text.to_string(),
            })
            .build()?
            .try_deserialize()?;

        Ok(Self {
            app_name: raw.app_name.trim().to_string(),
            package_name: raw.package_name.trim().to_string(),
            version_code: raw.version_code.trim().to_string(),
            version_name: raw.version_name.trim().to_string(),
            min_sdk_version: raw.min_sdk_version.trim().to_string(),
            target_sdk_version: raw.target_sdk_version.trim().to_string(),
            keystore: KeystoreSettings {
                path: resolve(base_dir, raw.keystone_path.trim()),
                alias: raw.keystone_user.trim().to_string(),
                password: raw.keystone_pass,
            },
            project_zip_path: optional_path(raw.project_zip_path, base_dir),
            icon_path: optional_path(raw.icon_path, base_dir),
        })
    }

    /// Reads and parses `path`.
    pub async fn load(path: &Path, base_dir: &Path) -> Result<Self, PropertiesError> {
        if !path.is_file() {
            return Err(PropertiesError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|error| PropertiesError::Read {
                path: path.to_path_buf(),
                error,
            })?;

        log::debug!("Parsing {}", path.display());

        Self::parse(&text, base_dir).map_err(|error| PropertiesError::Invalid {
            path: path.to_path_buf(),
            error,
        })
    }

    /// File name of the final signed APK: `{app_name}_{version_code}.apk`.
    pub fn artifact_name(&self) -> String {
        format!("{}_{}.apk", self.app_name, self.version_code)
    }

    /// Key/value pairs for display, with the keystore password masked.
    pub fn display_entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = vec![
            ("app_name", self.app_name.clone()),
            ("package_name", self.package_name.clone()),
            ("version_code", self.version_code.clone()),
            ("version_name", self.version_name.clone()),
            ("minSdkVersion", self.min_sdk_version.clone()),
            ("targetSdkVersion", self.target_sdk_version.clone()),
            ("keystone_path", self.keystore.path.display().to_string()),
            ("keystone_user", self.keystore.alias.clone()),
            ("keystone_pass", MASK.to_string()),
        ];

        if let Some(zip) = &self.project_zip_path {
            entries.push(("project_zip_path", zip.display().to_string()));
        }
        if let Some(icon) = &self.icon_path {
            entries.push(("icon_path", icon.display().to_string()));
        }

        entries
    }
}

fn resolve(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Missing keys and blank values both mean "not configured".
fn optional_path(value: Option<String>, base_dir: &Path) -> Option<PathBuf> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| resolve(base_dir, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: &str = "app_name=Foo
package_name=com.example.foo
version_code=7
version_name=1.0.7
minSdkVersion=21
targetSdkVersion=34
keystone_path=keys/release.jks
keystone_user=release
keystone_pass=hunter2
";

    #[test]
    fn parses_required_keys() {
        let props = Properties::parse(REQUIRED, Path::new("/work")).unwrap();

        assert_eq!(props.app_name, "Foo");
        assert_eq!(props.package_name, "com.example.foo");
        assert_eq!(props.version_code, "7");
        assert_eq!(props.version_name, "1.0.7");
        assert_eq!(props.min_sdk_version, "21");
        assert_eq!(props.target_sdk_version, "34");
        assert_eq!(props.keystore.path, Path::new("/work/keys/release.jks"));
        assert_eq!(props.keystore.alias, "release");
        assert_eq!(props.keystore.password, "hunter2");
        assert!(props.project_zip_path.is_none());
        assert!(props.icon_path.is_none());
        assert_eq!(props.artifact_name(), "Foo_7.apk");
    }

    #[test]
    fn optional_paths_resolve_against_base_dir() {
        let text = format!("{}project_zip_path=project.zip\nicon_path=/abs/icon.png\n", REQUIRED);
        let props = Properties::parse(&text, Path::new("/work")).unwrap();

        assert_eq!(
            props.project_zip_path.as_deref(),
            Some(Path::new("/work/project.zip"))
        );
        assert_eq!(props.icon_path.as_deref(), Some(Path::new("/abs/icon.png")));
    }

    #[test]
    fn blank_optional_value_is_absent() {
        let text = format!("{}icon_path=\nproject_zip_path =   \n", REQUIRED);
        let props = Properties::parse(&text, Path::new("/work")).unwrap();

        assert!(props.icon_path.is_none());
        assert!(props.project_zip_path.is_none());
    }

    #[test]
    fn accepts_lowercase_sdk_keys_and_comments() {
        let text = REQUIRED
            .replace("minSdkVersion", "minsdkversion")
            .replace("targetSdkVersion", "targetsdkversion");
        let text = format!("# release build\n; signed with the store key\n{text}");
        let props = Properties::parse(&text, Path::new("/work")).unwrap();

        assert_eq!(props.min_sdk_version, "21");
        assert_eq!(props.target_sdk_version, "34");
    }

    #[test]
    fn values_are_taken_verbatim() {
        let text = REQUIRED.replace("keystone_pass=hunter2", r"keystone_pass=p\ass")
            + "project_zip_path=\"quoted.zip\"\n"
            + "icon_path=C:\\icons\\new.png\n";
        let props = Properties::parse(&text, Path::new("/work")).unwrap();

        assert_eq!(props.keystore.password, r"p\ass");
        assert!(
            props
                .project_zip_path
                .unwrap()
                .to_string_lossy()
                .ends_with("\"quoted.zip\"")
        );
        assert!(props.icon_path.unwrap().to_string_lossy().ends_with(r"C:\icons\new.png"));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let text = REQUIRED
            .replace("app_name", "APP_NAME")
            .replace("minSdkVersion", "MinSdkVersion")
            .replace("keystone_pass", "Keystone_Pass");
        let props = Properties::parse(&text, Path::new("/work")).unwrap();

        assert_eq!(props.app_name, "Foo");
        assert_eq!(props.min_sdk_version, "21");
        assert_eq!(props.keystore.password, "hunter2");
    }

    #[test]
    fn missing_required_key_is_an_error() {
        let text = REQUIRED.replace("keystone_user=release\n", "");
        let err = Properties::parse(&text, Path::new("/work")).unwrap_err();

        assert!(err.to_string().contains("keystone_user"), "{err}");
    }

    #[test]
    fn display_masks_password() {
        let props = Properties::parse(REQUIRED, Path::new("/work")).unwrap();
        let entries = props.display_entries();

        assert!(entries.iter().all(|(_, v)| !v.contains("hunter2")));
        assert!(!format!("{props:?}").contains("hunter2"));
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROPERTIES_FILE);

        let err = Properties::load(&path, dir.path()).await.unwrap_err();
        assert!(matches!(err, PropertiesError::NotFound { .. }));
        assert!(err.to_string().contains("properties.gae not found"));
    }

    #[tokio::test]
    async fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROPERTIES_FILE);
        std::fs::write(&path, REQUIRED).unwrap();

        let props = Properties::load(&path, dir.path()).await.unwrap();
        assert_eq!(props.keystore.path, dir.path().join("keys/release.jks"));
    }
}
