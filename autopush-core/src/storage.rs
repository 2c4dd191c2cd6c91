use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fs, path::PathBuf};

use crate::error::{Error, Result};

/// File name of the Config Document inside the storage directory.
const STORAGE_FILE: &str = "autopush.json";

/// Default option set managed by [`Storage::repair`].
///
/// `location`, `github_bio_content` and `github_cron_tab` are written by
/// other operations and deliberately left out: repair never touches them.
fn default_opts() -> [(&'static str, Value); 5] {
    [
        ("app_init", Value::Bool(true)),
        ("weather_api", Value::Bool(false)),
        ("github_status", Value::Bool(false)),
        ("github_bio_custom_content", Value::Bool(false)),
        ("keyboard_handler", Value::Bool(false)),
    ]
}

/// Durable key-value state shared by the command layer and the updater.
///
/// The whole document is one JSON object in one file; every read goes to
/// disk and every mutation rewrites the file wholesale. Concurrent
/// writers are out of scope: last writer wins.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
    file: PathBuf,
}

impl Storage {
    /// Storage rooted at the platform config directory.
    pub fn open() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "autopush", "autopush").ok_or_else(|| {
            Error::Io(std::io::Error::other(
                "could not determine platform config directory",
            ))
        })?;

        Ok(Self::at(dirs.config_dir()))
    }

    /// Storage rooted at an explicit directory (used by tests).
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let file = dir.join(STORAGE_FILE);
        Self { dir, file }
    }

    /// Directory holding the Config Document and the secrets file.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Ensure the storage directory and document exist.
    ///
    /// A missing document is created with the default option set plus the
    /// `location` key pointing at the storage directory. Idempotent: a
    /// second call leaves the file byte-for-byte untouched.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        if !self.file.exists() {
            let mut doc = Map::new();
            for (key, value) in default_opts() {
                doc.insert(key.to_string(), value);
            }
            doc.insert(
                "location".to_string(),
                Value::String(self.dir.display().to_string()),
            );
            self.write_document(&doc)?;
        }

        Ok(())
    }

    /// Reset every default option key to its default value.
    ///
    /// Writes back only when at least one key was absent or drifted.
    pub fn repair(&self) -> Result<()> {
        let mut doc = self.document()?;
        let mut changed = false;

        for (key, value) in default_opts() {
            if doc.get(key) != Some(&value) {
                doc.insert(key.to_string(), value);
                changed = true;
            }
        }

        if changed {
            self.write_document(&doc)?;
        }

        Ok(())
    }

    /// Value for `key`, or `None` when absent. Reads fresh from disk.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.document()?.get(key).cloned())
    }

    /// Set `key` to `value`, adding the key if missing.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let mut doc = self.document()?;
        doc.insert(key.to_string(), value.into());
        self.write_document(&doc)
    }

    /// Flip the bio-content mode flags as one mutation.
    ///
    /// A non-empty `content` selects custom mode and stores the content;
    /// anything else selects weather mode. The `weather_api` /
    /// `github_bio_custom_content` pair always ends up mutually exclusive,
    /// whatever it held before.
    pub fn set_bio_mode(&self, content: Option<&str>) -> Result<()> {
        let mut doc = self.document()?;

        match content {
            Some(text) if !text.is_empty() => {
                doc.insert("github_bio_custom_content".into(), Value::Bool(true));
                doc.insert("github_bio_content".into(), Value::String(text.into()));
                doc.insert("weather_api".into(), Value::Bool(false));
            }
            _ => {
                doc.insert("github_bio_custom_content".into(), Value::Bool(false));
                doc.insert("weather_api".into(), Value::Bool(true));
            }
        }

        self.write_document(&doc)
    }

    /// The raw Config Document, for display and key-level inspection.
    pub fn document(&self) -> Result<Map<String, Value>> {
        let contents = fs::read_to_string(&self.file)?;
        let doc: Map<String, Value> = serde_json::from_str(&contents)?;
        Ok(doc)
    }

    /// Typed view of the Config Document. Missing keys take defaults.
    ///
    /// Only the mode pair and the custom content are strict about their
    /// JSON type: a wrong-typed value there is configuration corruption.
    /// Wrong-typed values in keys the updater never consults (such as a
    /// drifted `github_cron_tab`) fall back to their defaults instead of
    /// derailing the whole read.
    pub fn settings(&self) -> Result<Settings> {
        let doc = self.document()?;

        Ok(Settings {
            location: doc.get("location").and_then(Value::as_str).map(str::to_string),
            app_init: lenient_bool(&doc, "app_init", true),
            weather_api: strict_bool(&doc, "weather_api")?,
            github_status: lenient_bool(&doc, "github_status", false),
            github_bio_custom_content: strict_bool(&doc, "github_bio_custom_content")?,
            github_bio_content: strict_string(&doc, "github_bio_content")?,
            github_cron_tab: doc.get("github_cron_tab").and_then(Value::as_bool),
            keyboard_handler: lenient_bool(&doc, "keyboard_handler", false),
        })
    }

    fn write_document(&self, doc: &Map<String, Value>) -> Result<()> {
        let contents = serde_json::to_string(doc)?;
        fs::write(&self.file, contents)?;
        Ok(())
    }
}

fn lenient_bool(doc: &Map<String, Value>, key: &str, default: bool) -> bool {
    doc.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn strict_bool(doc: &Map<String, Value>, key: &str) -> Result<bool> {
    match doc.get(key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(Error::Corrupt(format!(
            "{key} should be a boolean, found {other}"
        ))),
    }
}

fn strict_string(doc: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match doc.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::Corrupt(format!(
            "{key} should be a string, found {other}"
        ))),
    }
}

/// Typed view over the Config Document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub location: Option<String>,
    pub app_init: bool,
    pub weather_api: bool,
    pub github_status: bool,
    pub github_bio_custom_content: bool,
    pub github_bio_content: Option<String>,
    pub github_cron_tab: Option<bool>,
    pub keyboard_handler: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            location: None,
            app_init: true,
            weather_api: false,
            github_status: false,
            github_bio_custom_content: false,
            github_bio_content: None,
            github_cron_tab: None,
            keyboard_handler: false,
        }
    }
}

/// Where the updater takes the bio text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BioSource {
    /// Custom mode: the stored `github_bio_content` string.
    Custom(String),
    /// Weather mode: fetch and format the current weather.
    Weather,
    /// Both or neither mode flag set: the configuration is corrupt and
    /// no source can be picked.
    Invalid,
}

impl Settings {
    /// Resolve the mutually exclusive mode pair into a bio source.
    pub fn bio_source(&self) -> BioSource {
        match (self.github_bio_custom_content, self.weather_api) {
            (true, false) => {
                BioSource::Custom(self.github_bio_content.clone().unwrap_or_default())
            }
            (false, true) => BioSource::Weather,
            _ => BioSource::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, Storage) {
        let dir = tempdir().expect("tempdir");
        let storage = Storage::at(dir.path());
        storage.init().expect("init");
        (dir, storage)
    }

    #[test]
    fn init_writes_defaults_and_location() {
        let (_dir, storage) = store();

        assert_eq!(storage.get("app_init").unwrap(), Some(Value::Bool(true)));
        assert_eq!(storage.get("weather_api").unwrap(), Some(Value::Bool(false)));

        let location = storage.get("location").unwrap().expect("location set");
        assert_eq!(
            location.as_str().unwrap(),
            storage.dir().display().to_string()
        );
    }

    #[test]
    fn init_is_idempotent() {
        let (_dir, storage) = store();
        let before = std::fs::read(storage.dir().join(STORAGE_FILE)).unwrap();

        storage.init().expect("second init");

        let after = std::fs::read(storage.dir().join(STORAGE_FILE)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn set_then_get_roundtrips_primitives() {
        let (_dir, storage) = store();

        storage.set("flag", true).unwrap();
        assert_eq!(storage.get("flag").unwrap(), Some(Value::Bool(true)));

        storage.set("flag", false).unwrap();
        assert_eq!(storage.get("flag").unwrap(), Some(Value::Bool(false)));

        storage.set("name", "hello").unwrap();
        assert_eq!(
            storage.get("name").unwrap(),
            Some(Value::String("hello".into()))
        );

        storage.set("count", 42).unwrap();
        assert_eq!(storage.get("count").unwrap(), Some(Value::from(42)));
    }

    #[test]
    fn get_absent_key_is_none_not_error() {
        let (_dir, storage) = store();
        assert_eq!(storage.get("does_not_exist").unwrap(), None);
    }

    #[test]
    fn repair_is_a_noop_when_defaults_hold() {
        let (_dir, storage) = store();
        storage.set("github_bio_content", "keep me").unwrap();
        let before = std::fs::read(storage.dir().join(STORAGE_FILE)).unwrap();

        storage.repair().unwrap();

        let after = std::fs::read(storage.dir().join(STORAGE_FILE)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn repair_restores_defaults_from_empty_document() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path());
        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), "{}").unwrap();

        storage.repair().unwrap();

        assert_eq!(storage.get("app_init").unwrap(), Some(Value::Bool(true)));
        assert_eq!(storage.get("weather_api").unwrap(), Some(Value::Bool(false)));
        assert_eq!(
            storage.get("github_bio_custom_content").unwrap(),
            Some(Value::Bool(false))
        );
        assert_eq!(
            storage.get("keyboard_handler").unwrap(),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn repair_resets_drifted_values() {
        let (_dir, storage) = store();
        storage.set("weather_api", true).unwrap();

        storage.repair().unwrap();

        assert_eq!(storage.get("weather_api").unwrap(), Some(Value::Bool(false)));
    }

    #[test]
    fn repair_leaves_unmanaged_keys_alone() {
        let (_dir, storage) = store();
        storage.set("github_bio_content", "my bio").unwrap();
        storage.set("github_cron_tab", true).unwrap();

        storage.repair().unwrap();

        assert_eq!(
            storage.get("github_bio_content").unwrap(),
            Some(Value::String("my bio".into()))
        );
        assert_eq!(
            storage.get("github_cron_tab").unwrap(),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn set_bio_mode_custom_forces_mutual_exclusion() {
        let (_dir, storage) = store();
        storage.set("weather_api", true).unwrap();

        storage.set_bio_mode(Some("hire me")).unwrap();

        assert_eq!(storage.get("weather_api").unwrap(), Some(Value::Bool(false)));
        assert_eq!(
            storage.get("github_bio_custom_content").unwrap(),
            Some(Value::Bool(true))
        );
        assert_eq!(
            storage.get("github_bio_content").unwrap(),
            Some(Value::String("hire me".into()))
        );
    }

    #[test]
    fn set_bio_mode_empty_selects_weather() {
        let (_dir, storage) = store();
        storage.set("github_bio_custom_content", true).unwrap();

        storage.set_bio_mode(None).unwrap();

        assert_eq!(storage.get("weather_api").unwrap(), Some(Value::Bool(true)));
        assert_eq!(
            storage.get("github_bio_custom_content").unwrap(),
            Some(Value::Bool(false))
        );

        storage.set_bio_mode(Some("")).unwrap();
        assert_eq!(storage.get("weather_api").unwrap(), Some(Value::Bool(true)));
    }

    #[test]
    fn bio_source_decision_table() {
        let mut settings = Settings::default();

        settings.github_bio_custom_content = true;
        settings.weather_api = false;
        settings.github_bio_content = Some("static text".into());
        assert_eq!(settings.bio_source(), BioSource::Custom("static text".into()));

        settings.github_bio_custom_content = false;
        settings.weather_api = true;
        assert_eq!(settings.bio_source(), BioSource::Weather);

        settings.github_bio_custom_content = true;
        settings.weather_api = true;
        assert_eq!(settings.bio_source(), BioSource::Invalid);

        settings.github_bio_custom_content = false;
        settings.weather_api = false;
        assert_eq!(settings.bio_source(), BioSource::Invalid);
    }

    #[test]
    fn settings_reads_typed_view() {
        let (_dir, storage) = store();
        storage.set_bio_mode(Some("rustacean")).unwrap();

        let settings = storage.settings().unwrap();
        assert!(settings.app_init);
        assert!(settings.github_bio_custom_content);
        assert_eq!(settings.github_bio_content.as_deref(), Some("rustacean"));
        assert_eq!(settings.github_cron_tab, None);
    }

    #[test]
    fn settings_tolerate_wrong_typed_unmanaged_keys() {
        let (_dir, storage) = store();
        storage.set_bio_mode(Some("bio")).unwrap();
        storage.set("github_cron_tab", "weird").unwrap();
        storage.set("app_init", 7).unwrap();

        let settings = storage.settings().unwrap();
        assert_eq!(settings.github_cron_tab, None);
        assert!(settings.app_init);
        assert_eq!(settings.bio_source(), BioSource::Custom("bio".into()));
    }

    #[test]
    fn settings_reject_wrong_typed_mode_flags() {
        let (_dir, storage) = store();
        storage.set("weather_api", "yes").unwrap();

        let err = storage.settings().unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
        assert_eq!(err.exit_code(), 3);
    }
}
