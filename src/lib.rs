//! Bidirectional sync between decomp C sources and editable JSON records.
//!
//! Data for a Pokémon decomp project lives in C: designated initializers,
//! `_("…")` strings, `COMPOUND_STRING(…)` literals and `#define` tables.
//! This crate extracts that data into canonical JSON documents under
//! `data/`, lets them be edited, and regenerates C back into `source/`
//! without disturbing hand-written code around the managed regions.
//!
//! The public API is organised into layers:
//!
//! - **[`resources`]**: source reader/writer with the generated-file banner,
//!   file bindings with pristine backups, generated files
//! - **[`model`]** / **[`expr`]**: tagged record values and compile-time
//!   conditional expressions
//! - **[`parse`]** / **[`extract`]**: per-field value parsers and the
//!   line-oriented extractors
//! - **[`codegen`]**: whole-file emission and backup-driven splicing
//! - **[`categories`]**: one extractor/generator pair per data category,
//!   registered in a static table
//! - **[`store`]** / **[`manager`]**: canonical documents, dirty tracking and
//!   extract/persist/regenerate/restore orchestration
//! - **[`commands`]**: top-level subcommands (`extract`, `build`, `restore`, …)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

/// Declare a lazily compiled `static` [`regex::Regex`] from a literal pattern.
///
/// Patterns are string literals exercised by unit tests, so compilation
/// cannot fail at runtime.
macro_rules! static_regex {
    ($($vis:vis $name:ident = $pattern:expr;)+) => {
        $(
            #[allow(clippy::expect_used)]
            $vis static $name: once_cell::sync::Lazy<regex::Regex> =
                once_cell::sync::Lazy::new(|| {
                    regex::Regex::new($pattern).expect("static pattern is valid")
                });
        )+
    };
}

pub(crate) use static_regex;

pub mod categories;
pub mod cli;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod expr;
pub mod extract;
pub mod logging;
pub mod manager;
pub mod model;
pub mod parse;
pub mod preprocess;
pub mod project;
pub mod resources;
pub mod store;
