//! Frameprof
//!
//! Reports for the result of a sampling profiler run: a weighted call graph
//! of stack frames with per-frame, per-callsite and per-line sample counts.
//!
//! A [`profile::Profile`] is built once (by a sampling engine, or from
//! collapsed stacks with [`aggregator::ProfileBuilder`]) and never mutated.
//! The renderers in [`report`] are read-only projections of it:
//! a ranked table, a graphviz call graph, annotated source listings and a
//! raw JSON dump.
//!
//! ## Getting Started
//!
//! ```bash
//! frameprof build --input stacks.txt --output profile.json
//! frameprof table --file profile.json
//! frameprof graph --file profile.json | dot -Tsvg > profile.svg
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod profile;
pub mod report;
pub mod utils;
