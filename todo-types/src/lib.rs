//! # todo-types
//!
//! Domain types shared by every todo-sync crate.
//!
//! - [`TodoId`], [`UserId`] - positive integer identifiers
//! - [`Title`], [`Todo`], [`NewTodo`] - the todo record and its inputs
//! - [`ConcurrencyPolicy`] - how many items a sync may run at once
//! - [`TodoError`], [`ValidationError`] - the closed set of failure kinds
//!
//! Every constructor validates, so a value of these types is always valid.
//! Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod concurrency;
mod error;
mod ids;
mod todo;

pub use concurrency::ConcurrencyPolicy;
pub use error::{TodoError, ValidationError};
pub use ids::{TodoId, UserId};
pub use todo::{NewTodo, Title, Todo, MAX_TITLE_LEN};
