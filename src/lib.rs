//! fulid - Friendly Sortable Identifiers
//!
//! This library mints record identifiers that sort by creation time, use
//! only characters that are easy to type, and can be abbreviated to the
//! shortest suffix that is unique within a working set.
//!
//! # Core Concepts
//!
//! - **Alphabet**: ordered charset used for randomness and sequence digits
//! - **Fulid**: 26 character identifier (time + randomness + sequence)
//! - **Short id**: minimal unique suffix of a fulid within a working set
//! - **Stream**: named ledger subset with its own sequence and working set
//!
//! Fulids sort by their time segment. Within one millisecond only the
//! sequence segment increases; the order of full ids then depends on the
//! random segment that precedes it.
//!
//! # Module Organization
//!
//! - `alphabet`: Alphabet validation and the base-N codec
//! - `fulid`: Identifier type and generator
//! - `shortener`: Short id computation and resolution
//! - `config`: Configuration loading from `.fulid.toml`
//! - `ledger`: Append-only record of minted and closed identifiers
//! - `lock`: File locking and atomic writes
//! - `cli`: Command-line interface using clap
//! - `output`: Human and JSON output
//! - `error`: Error types and result aliases

pub mod alphabet;
pub mod cli;
pub mod config;
pub mod error;
pub mod fulid;
pub mod ledger;
pub mod lock;
pub mod output;
pub mod shortener;

pub use alphabet::Alphabet;
pub use error::{Error, Result};
pub use fulid::{Fulid, FulidGenerator};
pub use shortener::{contract, expand, resolve, shorten, ShortIdIndex};
