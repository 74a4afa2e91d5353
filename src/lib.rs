//! Sunburst layout and styling engine
//!
//! Turns a hierarchy into ring slices (radial partition), assigns colors by
//! category, merges style layers and places labels. The engine in `domain`
//! and `application` is pure; `infrastructure`, `config` and `cli` provide
//! file loading and the command line tool.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
