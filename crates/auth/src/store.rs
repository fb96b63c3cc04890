use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Secrets that may be kept out of the YAML config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretKind {
    Password,
    ConsumerSecret,
    AccessTokenSecret,
}

impl SecretKind {
    pub const ALL: [SecretKind; 3] = [
        SecretKind::Password,
        SecretKind::ConsumerSecret,
        SecretKind::AccessTokenSecret,
    ];

    fn as_str(self) -> &'static str {
        match self {
            SecretKind::Password => "password",
            SecretKind::ConsumerSecret => "consumer_secret",
            SecretKind::AccessTokenSecret => "access_token_secret",
        }
    }
}

/// Key under which a profile's secret is stored.
pub fn secret_key(profile: &str, kind: SecretKind) -> String {
    format!("{profile}:{}", kind.as_str())
}

/// JSON file of profile secrets, written with 600 permissions.
#[derive(Clone, Debug)]
pub struct SecretStore {
    path: PathBuf,
}

impl SecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.xray-cli/credentials`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().context("Cannot determine home directory")?;
        Ok(Self::new(home.join(".xray-cli").join("credentials")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_secret(&self, account: &str, secret: &str) -> Result<()> {
        let mut creds = self.read_all()?;
        creds.insert(account.to_string(), secret.to_string());
        self.write_all(&creds)
    }

    pub fn get_secret(&self, account: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.get(account).cloned())
    }

    pub fn delete_secret(&self, account: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut creds = self.read_all()?;
        creds.remove(account);
        self.write_all(&creds)
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read credentials at {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed credentials file {}", self.path.display()))
    }

    fn write_all(&self, creds: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let file = options
            .open(&self.path)
            .with_context(|| format!("Unable to write credentials at {}", self.path.display()))?;
        serde_json::to_writer_pretty(file, creds)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_secret_key_format() {
        assert_eq!(secret_key("work", SecretKind::Password), "work:password");
        assert_eq!(
            secret_key("ci", SecretKind::AccessTokenSecret),
            "ci:access_token_secret"
        );
    }

    #[test]
    fn test_set_get_delete() {
        let dir = TempDir::new().unwrap();
        let store = SecretStore::new(dir.path().join("nested").join("credentials"));

        assert_eq!(store.get_secret("work:password").unwrap(), None);

        store.set_secret("work:password", "hunter2").unwrap();
        store.set_secret("ci:password", "other").unwrap();
        assert_eq!(
            store.get_secret("work:password").unwrap(),
            Some("hunter2".to_string())
        );

        store.delete_secret("work:password").unwrap();
        assert_eq!(store.get_secret("work:password").unwrap(), None);
        assert_eq!(
            store.get_secret("ci:password").unwrap(),
            Some("other".to_string())
        );
    }

    #[test]
    fn test_delete_missing_file_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = SecretStore::new(dir.path().join("credentials"));
        assert!(store.delete_secret("anything").is_ok());
        assert!(!store.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = SecretStore::new(dir.path().join("credentials"));
        store.set_secret("work:password", "hunter2").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
