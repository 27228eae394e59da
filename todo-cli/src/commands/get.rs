//! Show one todo.

use anyhow::Result;
use std::io::Write;
use todo_store::TodoStore;
use todo_types::TodoId;

/// Run the get command. A missing todo is reported, not an error.
pub async fn run<S, W>(store: &S, id: TodoId, out: &mut W) -> Result<()>
where
    S: TodoStore + ?Sized,
    W: Write,
{
    match store.get_by_id(id).await {
        Ok(stored) => {
            writeln!(out, "{}", stored.todo)?;
            writeln!(out, "  created: {}", stored.created_at)?;
            writeln!(out, "  updated: {}", stored.updated_at)?;
        }
        Err(e) if e.is_not_found() => writeln!(out, "Todo {} not found", id)?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
