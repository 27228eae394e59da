//! List every todo.

use anyhow::{Context, Result};
use std::io::Write;
use todo_store::TodoStore;

const SEPARATOR: &str = "---";

/// Run the list command.
pub async fn run<S, W>(store: &S, out: &mut W) -> Result<()>
where
    S: TodoStore + ?Sized,
    W: Write,
{
    let todos = store.list_all().await.context("Failed to list todos")?;
    if todos.is_empty() {
        writeln!(out, "No todos")?;
        return Ok(());
    }

    for todo in &todos {
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "{}", todo)?;
    }
    writeln!(out, "{}", SEPARATOR)?;
    Ok(())
}
