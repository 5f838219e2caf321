//! Identifier ledger.
//!
//! The ledger is the persistence side of minting: it remembers which fulids
//! were minted in which stream and which of them are still open. It is stored
//! as append-only events in `ledger.jsonl` inside the data directory and
//! replayed on read.
//!
//! A stream is one working set. Its open identifiers are what short ids are
//! computed against, and its most recently minted open identifier seeds the
//! sequence of the next mint.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{validate_stream_name, Config};
use crate::error::{Error, Result};
use crate::fulid::{Fulid, FulidGenerator};
use crate::lock::FileLock;
use crate::shortener;

/// Event log file name inside the data directory
pub const LEDGER_FILE: &str = "ledger.jsonl";

/// Lock file guarding mint and close
pub const LEDGER_LOCK_FILE: &str = "ledger.lock";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEventType {
    Minted,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    #[serde(rename = "type")]
    pub event_type: LedgerEventType,
    pub id: Fulid,
    pub stream: String,
    pub timestamp: DateTime<Utc>,
}

impl LedgerEvent {
    fn new(event_type: LedgerEventType, id: Fulid, stream: &str) -> Self {
        Self {
            event_type,
            id,
            stream: stream.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdState {
    Open,
    Closed,
}

/// Replayed state of one minted identifier.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRecord {
    pub id: Fulid,
    pub stream: String,
    pub state: IdState,
    pub minted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

/// File-backed ledger rooted at a data directory.
#[derive(Debug, Clone)]
pub struct Ledger {
    dir: PathBuf,
    generator: FulidGenerator,
    lock_timeout_ms: u64,
}

impl Ledger {
    pub fn new(dir: impl Into<PathBuf>, generator: FulidGenerator, lock_timeout_ms: u64) -> Self {
        Self {
            dir: dir.into(),
            generator,
            lock_timeout_ms,
        }
    }

    /// Build a ledger using the alphabet and lock settings of `config`.
    pub fn from_config(dir: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        let generator = FulidGenerator::new(config.alphabet()?);
        Ok(Self::new(dir, generator, config.ledger.lock_timeout_ms))
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(LEDGER_LOCK_FILE)
    }

    /// Replay the event log into records, in minting order.
    pub fn records(&self) -> Result<Vec<LedgerRecord>> {
        let events: Vec<LedgerEvent> = read_jsonl(&self.log_path())?;
        let mut records: Vec<LedgerRecord> = Vec::new();

        for event in events {
            match event.event_type {
                LedgerEventType::Minted => records.push(LedgerRecord {
                    id: event.id,
                    stream: event.stream,
                    state: IdState::Open,
                    minted_at: event.timestamp,
                    closed_at: None,
                }),
                LedgerEventType::Closed => {
                    match records
                        .iter_mut()
                        .find(|record| record.id == event.id && record.stream == event.stream)
                    {
                        Some(record) => {
                            record.state = IdState::Closed;
                            record.closed_at = Some(event.timestamp);
                        }
                        None => {
                            tracing::warn!(
                                id = %event.id,
                                stream = %event.stream,
                                "close event for unknown id"
                            );
                        }
                    }
                }
            }
        }

        Ok(records)
    }

    /// Records of one stream, in minting order.
    pub fn stream_records(&self, stream: &str) -> Result<Vec<LedgerRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|record| record.stream == stream)
            .collect())
    }

    /// Open identifiers of `stream`: the working set for short ids.
    pub fn open_ids(&self, stream: &str) -> Result<Vec<Fulid>> {
        Ok(self
            .stream_records(stream)?
            .into_iter()
            .filter(|record| record.state == IdState::Open)
            .map(|record| record.id)
            .collect())
    }

    /// Most recently minted identifier of `stream` that is still open.
    pub fn last_open(&self, stream: &str) -> Result<Option<Fulid>> {
        Ok(self.open_ids(stream)?.pop())
    }

    /// Mint the next identifier of `stream` and record it.
    pub fn mint(&self, stream: &str) -> Result<Fulid> {
        validate_stream_name(stream)?;
        let _lock = FileLock::acquire(self.lock_path(), self.lock_timeout_ms)?;

        let previous = self.last_open(stream)?;
        let id = self.generator.generate(previous.as_ref())?;
        append_jsonl(
            &self.log_path(),
            &LedgerEvent::new(LedgerEventType::Minted, id.clone(), stream),
        )?;

        tracing::info!(id = %id, stream, "recorded fulid");
        Ok(id)
    }

    /// Close an open identifier of `stream`, given in full or as a short id.
    pub fn close(&self, stream: &str, input: &str) -> Result<Fulid> {
        validate_stream_name(stream)?;
        let _lock = FileLock::acquire(self.lock_path(), self.lock_timeout_ms)?;

        let open = self.open_ids(stream)?;
        let expanded = shortener::expand(input, &open)?;
        let id = open
            .into_iter()
            .find(|candidate| candidate.as_str() == expanded)
            .ok_or_else(|| Error::NotFound(input.trim().to_string()))?;

        append_jsonl(
            &self.log_path(),
            &LedgerEvent::new(LedgerEventType::Closed, id.clone(), stream),
        )?;

        tracing::info!(id = %id, stream, "closed fulid");
        Ok(id)
    }
}

fn append_jsonl<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(record)?;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    writeln!(file, "{}", json)?;
    file.sync_all()?;

    Ok(())
}

fn read_jsonl<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }

    Ok(records)
}
