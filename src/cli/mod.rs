//! Command-line interface for fulid
//!
//! This module defines the CLI structure using clap derive macros.
//! Each group of subcommands is implemented in its own submodule.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{validate_stream_name, Config};
use crate::error::{Error, Result};
use crate::output::OutputOptions;

mod id;
mod init;
mod ledger;
mod short;

/// fulid - friendly sortable identifiers
///
/// Mints time-sortable identifiers that are easy to type, and abbreviates
/// them to the shortest suffix that is unique among the open identifiers.
#[derive(Parser, Debug)]
#[command(name = "fulid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding .fulid.toml and the ledger
    #[arg(long, global = true, env = "FULID_DIR")]
    pub dir: Option<PathBuf>,

    /// Configuration file (defaults to <dir>/.fulid.toml)
    #[arg(long, global = true, env = "FULID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ledger stream to work on (defaults to ledger.default_stream)
    #[arg(long, global = true, env = "FULID_STREAM")]
    pub stream: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .fulid.toml into the data directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Generate an identifier without recording it
    New {
        /// Identifier whose sequence the new one continues
        #[arg(long)]
        previous: Option<String>,
    },

    /// Generate identifiers and record them in the ledger stream
    Mint {
        /// How many identifiers to mint
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Close open identifiers of the stream (full or short ids)
    Close {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// List identifiers of the stream with their short ids
    List {
        /// Include closed identifiers
        #[arg(long)]
        all: bool,
    },

    /// Compute short ids (defaults to the open identifiers of the stream)
    Short {
        /// Working set; `-` reads one id per line from stdin
        ids: Vec<String>,
    },

    /// Expand a short id to the full identifier
    Resolve {
        /// Short id, or a full identifier
        short: String,

        /// Working set; defaults to the open identifiers of the stream
        ids: Vec<String>,
    },

    /// Show the segments of an identifier
    Inspect {
        id: String,
    },

    /// Encode a number with the configured alphabet
    Encode {
        number: u64,

        /// Left-pad to this many characters
        #[arg(long)]
        pad: Option<usize>,
    },

    /// Decode a sequence segment (or the tail of an identifier)
    Decode {
        text: String,
    },
}

/// Resolved data directory, configuration and output settings
pub(crate) struct Context {
    pub dir: PathBuf,
    pub config: Config,
    pub stream: String,
    pub output: OutputOptions,
}

impl Context {
    pub fn ledger(&self) -> Result<crate::ledger::Ledger> {
        crate::ledger::Ledger::from_config(&self.dir, &self.config)
    }

    /// Explicit ids from the command line, stdin for `-`, or the open
    /// identifiers of the stream when none are given.
    pub fn working_set(&self, ids: Vec<String>) -> Result<Vec<String>> {
        if ids.is_empty() {
            let open = self.ledger()?.open_ids(&self.stream)?;
            return Ok(open.into_iter().map(String::from).collect());
        }
        if ids.len() == 1 && ids[0] == "-" {
            let mut from_stdin = Vec::new();
            for line in std::io::stdin().lock().lines() {
                let line = line?;
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    from_stdin.push(trimmed.to_string());
                }
            }
            return Ok(from_stdin);
        }
        Ok(ids)
    }

    fn load(
        dir: PathBuf,
        config_path: Option<&Path>,
        stream: Option<String>,
        output: OutputOptions,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::load_from_dir(&dir)?,
        };
        let stream = stream.unwrap_or_else(|| config.ledger.default_stream.clone());
        validate_stream_name(&stream)?;

        tracing::debug!(dir = %dir.display(), stream = %stream, "resolved context");
        Ok(Self {
            dir,
            config,
            stream,
            output,
        })
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let dir = data_dir(self.dir)?;
        let config_path = self.config;
        let stream = self.stream;
        let load = || Context::load(dir.clone(), config_path.as_deref(), stream.clone(), output);

        match self.command {
            Commands::Init { force } => init::run(&dir, config_path.as_deref(), force, output),
            Commands::New { previous } => id::run_new(&load()?, previous.as_deref()),
            Commands::Inspect { id } => id::run_inspect(&load()?, &id),
            Commands::Encode { number, pad } => id::run_encode(&load()?, number, pad),
            Commands::Decode { text } => id::run_decode(&load()?, &text),
            Commands::Mint { count } => ledger::run_mint(&load()?, count),
            Commands::Close { ids } => ledger::run_close(&load()?, &ids),
            Commands::List { all } => ledger::run_list(&load()?, all),
            Commands::Short { ids } => short::run_short(&load()?, ids),
            Commands::Resolve { short, ids } => short::run_resolve(&load()?, &short, ids),
        }
    }
}

fn data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    directories::ProjectDirs::from("", "", "fulid")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            Error::InvalidArgument(
                "no home directory found; pass --dir or set FULID_DIR".to_string(),
            )
        })
}
