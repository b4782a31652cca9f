//! CLI module for ratemykb

pub mod error;
pub mod rate;
