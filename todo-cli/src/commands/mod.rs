//! CLI command implementations.
//!
//! Commands write their user-facing output to the given writer; `main`
//! passes standard output.

pub mod clear;
pub mod create;
pub mod get;
pub mod init;
pub mod list;
pub mod sync;
