//! Short id commands: short, resolve.

use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::shortener::{self, ShortIdIndex};

use super::ledger::SHORT_ID_WARNING;
use super::Context;

#[derive(serde::Serialize)]
struct ShortEntry {
    id: String,
    short: String,
}

#[derive(serde::Serialize)]
struct ShortReport {
    suffix_len: usize,
    entries: Vec<ShortEntry>,
}

#[derive(serde::Serialize)]
struct ResolveReport {
    input: String,
    id: String,
}

pub fn run_short(context: &Context, ids: Vec<String>) -> Result<()> {
    let ids = context.working_set(ids)?;
    let index = ShortIdIndex::new(&ids);

    let entries: Vec<ShortEntry> = index
        .iter()
        .map(|(id, short)| ShortEntry {
            id: id.to_string(),
            short: short.to_string(),
        })
        .collect();

    let width = index.suffix_len().max(1);
    let mut human = HumanOutput::new("");
    for entry in &entries {
        human.push_row(format!("{:<width$}  {}", entry.short, entry.id));
    }
    if !index.is_empty() {
        human.push_warning(SHORT_ID_WARNING);
    }

    let report = ShortReport {
        suffix_len: index.suffix_len(),
        entries,
    };
    emit_success(context.output, "short", &report, Some(&human))
}

pub fn run_resolve(context: &Context, input: &str, ids: Vec<String>) -> Result<()> {
    let ids = context.working_set(ids)?;
    let id = shortener::expand(input, &ids)?;

    let mut human = HumanOutput::new("");
    human.push_row(id.clone());

    let report = ResolveReport {
        input: input.trim().to_string(),
        id,
    };
    emit_success(context.output, "resolve", &report, Some(&human))
}
