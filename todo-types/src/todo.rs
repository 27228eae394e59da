//! The todo record and its inputs.

use crate::error::ValidationError;
use crate::ids::{TodoId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// A todo title: between 1 and 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and wrap a title.
    pub fn new(title: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        let len = title.chars().count();
        if len == 0 {
            return Err(ValidationError::EmptyTitle);
        }
        if len > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong { len });
        }
        Ok(Self(title))
    }

    /// Borrow the title text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Title {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo item.
///
/// Field names follow the remote API (`userId`, `id`, `title`, `completed`).
/// Decoding validates every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Owner of the item.
    pub user_id: UserId,
    /// Identity of the item.
    pub id: TodoId,
    /// What needs doing.
    pub title: Title,
    /// Whether it is done.
    pub completed: bool,
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { "x" } else { " " };
        write!(
            f,
            "[{}] #{} {} (user {})",
            mark, self.id, self.title, self.user_id
        )
    }
}

/// Input for creating a todo; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// Owner of the item.
    pub user_id: UserId,
    /// What needs doing.
    pub title: Title,
    /// Whether it is done (defaults to false on the command line).
    pub completed: bool,
}

impl NewTodo {
    /// Validate raw inputs into a new todo.
    pub fn new(user_id: i64, title: &str, completed: bool) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: UserId::try_from(user_id)?,
            title: Title::new(title)?,
            completed,
        })
    }
}
