//! Configuration loading and management
//!
//! Handles parsing of `.fulid.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::alphabet::{Alphabet, DEFAULT_CHARACTERS, DEFAULT_FORBIDDEN_CHARACTERS};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = ".fulid.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Identifier alphabet
    #[serde(default)]
    pub fulid: FulidConfig,

    /// Ledger configuration
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Alphabet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulidConfig {
    /// Characters used for the randomness and sequence segments
    #[serde(default = "default_characters")]
    pub characters: String,

    /// Characters that must never appear in generated identifiers
    #[serde(default = "default_forbidden_characters")]
    pub forbidden_characters: String,
}

fn default_characters() -> String {
    DEFAULT_CHARACTERS.to_string()
}

fn default_forbidden_characters() -> String {
    DEFAULT_FORBIDDEN_CHARACTERS.to_string()
}

impl Default for FulidConfig {
    fn default() -> Self {
        Self {
            characters: default_characters(),
            forbidden_characters: default_forbidden_characters(),
        }
    }
}

impl FulidConfig {
    /// Build the validated alphabet described by this section
    pub fn alphabet(&self) -> crate::error::Result<Alphabet> {
        Alphabet::new(&self.characters, &self.forbidden_characters)
    }
}

/// Ledger-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Stream used when none is given on the command line
    #[serde(default = "default_stream")]
    pub default_stream: String,

    /// How long to wait for the ledger lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_stream() -> String {
    "default".to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_stream: default_stream(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl LedgerConfig {
    fn validate(&self) -> crate::error::Result<()> {
        validate_stream_name(&self.default_stream)?;
        if self.lock_timeout_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "ledger.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Stream names end up in JSON records and on the command line.
pub fn validate_stream_name(name: &str) -> crate::error::Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(crate::error::Error::InvalidConfig(
            "stream name cannot be empty".to_string(),
        ));
    }
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(crate::error::Error::InvalidConfig(format!(
            "stream name '{trimmed}' must be alphanumeric, '-' or '_'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a `.fulid.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a data directory, or return defaults when
    /// the file is missing
    pub fn load_from_dir(dir: &Path) -> crate::error::Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        crate::lock::write_atomic_str(path, &content)
    }

    /// Path of the config file inside `dir`
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    pub fn alphabet(&self) -> crate::error::Result<Alphabet> {
        self.fulid.alphabet()
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.fulid.alphabet()?;
        self.ledger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.fulid.characters, "asdfghjwer");
        assert_eq!(cfg.fulid.forbidden_characters, "ilou|&:;()<>~*@?!$#[]{}\\/'\"`");
        assert_eq!(cfg.ledger.default_stream, "default");
        assert_eq!(cfg.ledger.lock_timeout_ms, 5000);
        assert_eq!(cfg.alphabet().expect("alphabet"), Alphabet::default());
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[fulid]
characters = "qwerty"
forbidden_characters = "ilou"

[ledger]
default_stream = "work"
lock_timeout_ms = 250
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.fulid.characters, "qwerty");
        assert_eq!(cfg.fulid.forbidden_characters, "ilou");
        assert_eq!(cfg.ledger.default_stream, "work");
        assert_eq!(cfg.ledger.lock_timeout_ms, 250);
        assert_eq!(cfg.alphabet().expect("alphabet").base(), 6);
    }

    #[test]
    fn overlapping_alphabet_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[fulid]
characters = "a"
forbidden_characters = "a"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_ledger_config_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[ledger]\ndefault_stream = \"has space\"").expect("write config");
        assert!(matches!(
            Config::load(&path),
            Err(crate::error::Error::InvalidConfig(_))
        ));

        fs::write(&path, "[ledger]\nlock_timeout_ms = 0").expect("write config");
        assert!(matches!(
            Config::load(&path),
            Err(crate::error::Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path()).expect("defaults");
        assert_eq!(cfg.fulid.characters, "asdfghjwer");
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("characters = \"asdfghjwer\""));

        let reloaded = Config::load(&path).expect("reload");
        assert_eq!(reloaded.fulid.forbidden_characters, cfg.fulid.forbidden_characters);
    }
}
