use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Scratch data directory for one CLI test.
pub struct DataDir {
    dir: TempDir,
}

impl DataDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(".fulid.toml")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.config_path();
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// `fulid` bound to this data directory, isolated from the environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("fulid").expect("binary");
        cmd.env_remove("FULID_CONFIG")
            .env_remove("FULID_STREAM")
            .env_remove("RUST_LOG")
            .env("FULID_DIR", self.dir.path());
        cmd
    }

    /// Run with `--json` and return the parsed `data` payload.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run fulid");
        assert!(
            output.status.success(),
            "fulid {args:?} failed: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        let value: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("json output");
        value["data"].clone()
    }
}
