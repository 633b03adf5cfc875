use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use wlroot_crypto::{AnyHasher, HashAlgorithm};

/// Whitelist file contents.
///
/// ```toml
/// hasher = "keccak256"
/// entries = ["0xA1A2EE28Ef70A03864824866b6919c8E6B90c3cD"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WhitelistConfig {
    /// Hash function for leaves and parents.
    pub hasher: HashAlgorithm,
    /// Domain tag prepended to every BLAKE3 computation. Ignored by keccak256.
    pub domain: Option<String>,
    /// Entries in tree order.
    pub entries: Vec<String>,
}

impl WhitelistConfig {
    /// File looked up in the working directory when no path is given.
    pub const DEFAULT_PATH: &'static str = "whitelist.toml";

    /// Read and parse a whitelist file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading whitelist {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing whitelist {}", path.display()))
    }

    /// Load `path` if given; otherwise the default file when it exists, or
    /// an empty configuration.
    pub fn discover(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = PathBuf::from(Self::DEFAULT_PATH);
                if default.is_file() {
                    Self::load(&default)
                } else {
                    tracing::debug!("no {} found, using defaults", Self::DEFAULT_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    /// The configured hasher.
    pub fn build_hasher(&self) -> AnyHasher {
        AnyHasher::new(self.hasher, self.domain.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_config() {
        let c = WhitelistConfig::default();
        assert_eq!(c.hasher, HashAlgorithm::Keccak256);
        assert!(c.domain.is_none());
        assert!(c.entries.is_empty());
    }

    #[test]
    fn load_full_file() {
        let file = write_config(
            r#"
hasher = "blake3"
domain = "wlroot-v1"
entries = ["0xA1A2EE28Ef70A03864824866b6919c8E6B90c3cD", "alice"]
"#,
        );
        let c = WhitelistConfig::load(file.path()).unwrap();
        assert_eq!(c.hasher, HashAlgorithm::Blake3);
        assert_eq!(c.domain.as_deref(), Some("wlroot-v1"));
        assert_eq!(c.entries.len(), 2);
        assert_eq!(c.build_hasher().algorithm(), HashAlgorithm::Blake3);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let file = write_config(r#"entries = ["a"]"#);
        let c = WhitelistConfig::load(file.path()).unwrap();
        assert_eq!(c.hasher, HashAlgorithm::Keccak256);
        assert_eq!(c.entries, vec!["a"]);
    }

    #[test]
    fn unknown_hasher_is_an_error() {
        let file = write_config(r#"hasher = "md5""#);
        assert!(WhitelistConfig::load(file.path()).is_err());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let file = write_config(r#"entires = ["a"]"#);
        assert!(WhitelistConfig::load(file.path()).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WhitelistConfig::discover(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading whitelist"));
    }

    #[test]
    fn toml_roundtrip() {
        let c = WhitelistConfig {
            hasher: HashAlgorithm::Blake3,
            domain: None,
            entries: vec!["x".into(), "y".into()],
        };
        let text = toml::to_string(&c).unwrap();
        let parsed: WhitelistConfig = toml::from_str(&text).unwrap();
        assert_eq!(c, parsed);
    }
}
