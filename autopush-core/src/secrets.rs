use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Environment variable holding the GitHub personal access token.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_PERSONAL_ACCESS";
/// Environment variable holding the weatherapi.com key.
pub const WEATHER_KEY_VAR: &str = "WEATHER_API_KEY";
/// Optional `owner/repo` slug where tracking issues are filed.
pub const ISSUE_REPO_VAR: &str = "GITHUB_ISSUE_REPO";

const SECRETS_FILE: &str = ".env";

/// Credential slots accepted by `setup --key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    GithubToken,
    WeatherKey,
}

impl SecretKind {
    /// Map the CLI's small-integer key to a secret slot.
    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            1 => Some(SecretKind::GithubToken),
            2 => Some(SecretKind::WeatherKey),
            _ => None,
        }
    }

    pub fn var_name(self) -> &'static str {
        match self {
            SecretKind::GithubToken => GITHUB_TOKEN_VAR,
            SecretKind::WeatherKey => WEATHER_KEY_VAR,
        }
    }
}

/// Line-oriented `KEY=VALUE` secrets file next to the Config Document.
///
/// `#`-prefixed and blank lines are ignored. Values are trusted as
/// given; no quoting or escaping is applied.
#[derive(Debug, Clone)]
pub struct SecretsFile {
    path: PathBuf,
}

impl SecretsFile {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SECRETS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Append one credential entry, creating the file if needed.
    pub fn append(&self, kind: SecretKind, value: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}={}", kind.var_name(), value)?;
        Ok(())
    }

    /// Parsed (key, value) pairs, in file order.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let contents = std::fs::read_to_string(&self.path)?;
        let mut entries = Vec::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                Error::Corrupt(format!("secrets line without '=': {line}"))
            })?;
            entries.push((key.to_string(), value.to_string()));
        }

        Ok(entries)
    }

    /// Load all entries into the process environment. A missing file is
    /// fine; the updater then runs against placeholder credentials.
    pub fn load_into_env(&self) -> Result<()> {
        if !self.exists() {
            return Ok(());
        }
        dotenvy::from_path(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn from_key_maps_known_slots() {
        assert_eq!(SecretKind::from_key(1), Some(SecretKind::GithubToken));
        assert_eq!(SecretKind::from_key(2), Some(SecretKind::WeatherKey));
        assert_eq!(SecretKind::from_key(0), None);
        assert_eq!(SecretKind::from_key(3), None);
    }

    #[test]
    fn append_then_entries_roundtrips() {
        let dir = tempdir().unwrap();
        let secrets = SecretsFile::in_dir(dir.path());
        assert!(!secrets.exists());

        secrets.append(SecretKind::GithubToken, "ghp_abc").unwrap();
        secrets.append(SecretKind::WeatherKey, "w-key").unwrap();

        let entries = secrets.entries().unwrap();
        assert_eq!(
            entries,
            vec![
                ("GITHUB_PERSONAL_ACCESS".to_string(), "ghp_abc".to_string()),
                ("WEATHER_API_KEY".to_string(), "w-key".to_string()),
            ]
        );
    }

    #[test]
    fn entries_skip_comments_and_blanks() {
        let dir = tempdir().unwrap();
        let secrets = SecretsFile::in_dir(dir.path());
        std::fs::write(
            secrets.path(),
            "# a comment\n\nWEATHER_API_KEY=abc\n  # indented comment\n",
        )
        .unwrap();

        let entries = secrets.entries().unwrap();
        assert_eq!(entries, vec![("WEATHER_API_KEY".to_string(), "abc".to_string())]);
    }

    #[test]
    fn load_into_env_tolerates_missing_file() {
        let dir = tempdir().unwrap();
        let secrets = SecretsFile::in_dir(dir.path());
        secrets.load_into_env().unwrap();
    }
}
