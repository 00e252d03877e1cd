//! # CLI Command Implementations
//!
//! One file per subcommand of `repo-roots`. Each contains an `Args` struct
//! derived with `clap` and an `execute` function that calls into the
//! `repo_roots` library.

pub mod cache;
pub mod completions;
pub mod roots;
