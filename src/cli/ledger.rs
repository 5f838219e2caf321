//! Ledger commands: mint, close, list.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::fulid::Fulid;
use crate::ledger::{IdState, LedgerRecord};
use crate::output::{emit_success, HumanOutput};
use crate::shortener::ShortIdIndex;

use super::Context;

#[derive(serde::Serialize)]
struct MintReport {
    stream: String,
    minted: Vec<Fulid>,
}

#[derive(serde::Serialize)]
struct CloseReport {
    stream: String,
    closed: Vec<Fulid>,
}

#[derive(serde::Serialize)]
struct ListEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    short: Option<String>,
    #[serde(flatten)]
    record: LedgerRecord,
}

#[derive(serde::Serialize)]
struct ListReport {
    stream: String,
    suffix_len: usize,
    entries: Vec<ListEntry>,
}

pub(super) const SHORT_ID_WARNING: &str =
    "short ids are only valid for this listing; they change as identifiers are minted or closed";

pub fn run_mint(context: &Context, count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidArgument("--count must be at least 1".to_string()));
    }

    let ledger = context.ledger()?;
    let mut minted = Vec::with_capacity(count);
    for _ in 0..count {
        minted.push(ledger.mint(&context.stream)?);
    }

    let mut human = HumanOutput::new("");
    for id in &minted {
        human.push_row(id.to_string());
    }

    let report = MintReport {
        stream: context.stream.clone(),
        minted,
    };
    emit_success(context.output, "mint", &report, Some(&human))
}

/// Every short id is resolved against the working set as it was before the
/// first close, which is the set the user was shown. Inputs naming the same
/// identifier close it once.
pub fn run_close(context: &Context, inputs: &[String]) -> Result<()> {
    let ledger = context.ledger()?;

    let open = ledger.open_ids(&context.stream)?;
    let index = ShortIdIndex::new(&open);
    let mut seen = HashSet::with_capacity(inputs.len());
    let mut targets = Vec::with_capacity(inputs.len());
    for input in inputs {
        let full = crate::shortener::expand(input, index.iter().map(|(id, _)| id))?;
        if seen.insert(full.clone()) {
            targets.push(full);
        }
    }

    let mut closed = Vec::with_capacity(targets.len());
    for target in targets {
        closed.push(ledger.close(&context.stream, &target)?);
    }

    let mut human = HumanOutput::new(format!("Closed {} id(s)", closed.len()));
    for id in &closed {
        human.push_row(id.to_string());
    }

    let report = CloseReport {
        stream: context.stream.clone(),
        closed,
    };
    emit_success(context.output, "close", &report, Some(&human))
}

pub fn run_list(context: &Context, all: bool) -> Result<()> {
    let records = context.ledger()?.stream_records(&context.stream)?;
    let index = ShortIdIndex::new(
        records
            .iter()
            .filter(|record| record.state == IdState::Open)
            .map(|record| record.id.as_str()),
    );

    let entries: Vec<ListEntry> = records
        .into_iter()
        .filter(|record| all || record.state == IdState::Open)
        .map(|record| ListEntry {
            short: index.contract(record.id.as_str()).ok().map(str::to_string),
            record,
        })
        .collect();

    let width = index.suffix_len().max(1);
    let mut human = HumanOutput::new("");
    for entry in &entries {
        let short = entry.short.as_deref().unwrap_or("-");
        let mut row = format!("{short:<width$}  {}", entry.record.id);
        if entry.record.state == IdState::Closed {
            row.push_str("  (closed)");
        }
        human.push_row(row);
    }
    if entries.is_empty() {
        human.push_row(format!("no identifiers in stream '{}'", context.stream));
    }
    if !index.is_empty() {
        human.push_warning(SHORT_ID_WARNING);
    }

    let report = ListReport {
        stream: context.stream.clone(),
        suffix_len: index.suffix_len(),
        entries,
    };
    emit_success(context.output, "list", &report, Some(&human))
}
