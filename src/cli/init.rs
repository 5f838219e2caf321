//! fulid init command implementation
//!
//! Creates the data directory and writes a default configuration file.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct InitReport {
    dir: PathBuf,
    config: PathBuf,
    created: bool,
}

pub fn run(
    dir: &Path,
    config_path: Option<&Path>,
    force: bool,
    output: OutputOptions,
) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::path_in(dir));

    let exists = path.exists();
    if exists && !force {
        return Err(Error::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    std::fs::create_dir_all(dir)?;
    Config::default().save(&path)?;
    tracing::info!(path = %path.display(), "wrote default config");

    let report = InitReport {
        dir: dir.to_path_buf(),
        config: path.clone(),
        created: !exists,
    };

    let verb = if exists { "Overwrote" } else { "Created" };
    let mut human = HumanOutput::new(format!("{verb} {}", path.display()));
    human.push_summary("data dir", dir.display().to_string());

    emit_success(output, "init", &report, Some(&human))
}
