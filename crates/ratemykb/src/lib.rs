//! ratemykb: rate the notes in a Markdown vault.
//!
//! The vault is scanned for notes, trivially empty ones are settled by a
//! structural pre-check, and the rest go to a [`Classifier`](ai::Classifier).
//! Results land in a Markdown report inside the vault, rewritten after every
//! note; the next run reads that report back and only handles new notes.
//!
//! - [`scout`]: walking the vault and pre-checking notes
//! - [`ai`]: classifier trait and backends
//! - [`runner`]: the per-note processing loop
//! - [`config`]: TOML/YAML settings
//! - [`cli`]: the `ratemykb` command

pub mod ai;
pub mod cli;
pub mod config;
pub mod runner;
pub mod scout;

pub use ratemykb_state_store as state_store;
