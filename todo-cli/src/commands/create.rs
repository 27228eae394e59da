//! Create a todo from command-line input.

use anyhow::{Context, Result};
use std::io::Write;
use todo_store::TodoStore;
use todo_types::{NewTodo, UserId, ValidationError};

/// Validate raw arguments into a [`NewTodo`] before touching the store.
pub fn parse(user_id: &str, title: &str, completed: bool) -> Result<NewTodo, ValidationError> {
    let user_id: UserId = user_id.parse()?;
    NewTodo::new(user_id.value(), title, completed)
}

/// Run the create command.
pub async fn run<S, W>(store: &S, new: NewTodo, out: &mut W) -> Result<()>
where
    S: TodoStore + ?Sized,
    W: Write,
{
    let todo = store.create(new).await.context("Failed to create todo")?;
    writeln!(out, "Created {}", todo)?;
    Ok(())
}
