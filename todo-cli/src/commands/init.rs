//! Prepare the database and seed sample todos.

use anyhow::{Context, Result};
use std::io::Write;
use todo_store::TodoStore;

/// Run the init command.
pub async fn run<S, W>(store: &S, out: &mut W) -> Result<()>
where
    S: TodoStore + ?Sized,
    W: Write,
{
    let seeded = store
        .initialize()
        .await
        .context("Failed to initialize database")?;

    if seeded > 0 {
        writeln!(out, "Database initialized with {} sample todos", seeded)?;
    } else {
        writeln!(out, "Database already initialized")?;
    }
    Ok(())
}
