//! Delete every todo.

use anyhow::{Context, Result};
use std::io::Write;
use todo_store::TodoStore;

/// Run the clear command.
pub async fn run<S, W>(store: &S, out: &mut W) -> Result<()>
where
    S: TodoStore + ?Sized,
    W: Write,
{
    let deleted = store.clear().await.context("Failed to clear todos")?;
    writeln!(out, "Deleted {} todos", deleted)?;
    Ok(())
}
