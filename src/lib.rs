//! Build a TypeScript project with `tsc --build` and copy the files the
//! compiler ignores (templates, JSON, static assets) from each referenced
//! project's source tree into its output directories.
//!
//! A project opts in with a `tsbconfig.json` next to its `tsconfig.json`:
//!
//! ```json
//! {
//!   "copyFiles": [
//!     { "files": ["src/templates/*.txt"], "outDirectories": ["dist"], "up": 1 }
//!   ]
//! }
//! ```
//!
//! With the configuration above, `src/templates/a.txt` is copied to
//! `dist/templates/a.txt`: `up` strips that many leading directories from
//! the matched path before it is joined to each output directory.
//!
//! A run goes through four stages:
//!
//! 1. [`tsconfig::resolve_references`] asks the compiler for the effective
//!    configuration of the root project and follows `references`
//!    transitively, visiting each project once.
//! 2. [`tsb_config::CopyConfig::from_directory`] loads and validates the copy
//!    configuration of every project. Validation is complete before any file
//!    is touched.
//! 3. [`plan::plan`] expands a rule's globs into (from, to) pairs.
//! 4. [`copy::execute`] creates the destination directories, then copies;
//!    in clean mode [`clean::clean`] removes the output directories instead.
//!
//! The compiler is only ever reached through [`command::CommandRunner`].

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]

pub mod build;
pub mod clean;
pub mod cli;
pub mod command;
pub mod copy;
pub mod error;
mod find_up;
pub mod io;
pub mod logging;
pub mod path;
pub mod plan;
pub mod tsb_config;
pub mod tsconfig;
