//! SQLite storage backend for todo-sync.

use super::{StoredTodo, TodoStore};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use todo_types::{NewTodo, Title, Todo, TodoError, TodoId, UserId};

/// Rows inserted by `initialize` into an empty table: (user_id, title, completed).
const SAMPLE_TODOS: &[(i64, &str, bool)] = &[
    (1, "delectus aut autem", false),
    (1, "quis ut nam facilis et officia qui", false),
    (1, "fugiat veniam minus", false),
    (1, "et porro tempora", true),
    (2, "laboriosam mollitia et enim quasi adipisci quia provident illum", false),
];

const SELECT_COLUMNS: &str = "id, user_id, title, completed, created_at, updated_at";

/// SQLite-based todo storage.
///
/// Uses WAL mode for concurrent reads/writes.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub async fn open(path: &Path) -> Result<Self, TodoError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .map_err(db_error)?;

        let store = Self { pool };
        store.create_schema().await?;
        tracing::debug!("Opened todo database at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub async fn in_memory() -> Result<Self, TodoError> {
        let options = SqliteConnectOptions::from_str(":memory:").map_err(db_error)?;

        // One connection: every pooled connection would get its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(db_error)?;

        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> Result<(), TodoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL CHECK (user_id > 0),
                title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 255),
                completed INTEGER NOT NULL DEFAULT 0 CHECK (completed IN (0, 1)),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn initialize(&self) -> Result<usize, TodoError> {
        self.create_schema().await?;

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;
        if count > 0 {
            tracing::debug!("Table already holds {} todos, skipping seed", count);
            return Ok(0);
        }

        let now = Self::current_timestamp();
        for (user_id, title, completed) in SAMPLE_TODOS {
            sqlx::query(
                r#"
                INSERT INTO todos (user_id, title, completed, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?4)
                "#,
            )
            .bind(*user_id)
            .bind(*title)
            .bind(*completed)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        tracing::info!("Seeded {} sample todos", SAMPLE_TODOS.len());
        Ok(SAMPLE_TODOS.len())
    }

    async fn get_by_id(&self, id: TodoId) -> Result<StoredTodo, TodoError> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {} FROM todos WHERE id = ?1",
            SELECT_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        match row {
            Some(r) => r.try_into(),
            None => Err(TodoError::NotFound(id)),
        }
    }

    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        let rows = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {} FROM todos ORDER BY id ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter()
            .map(|row| StoredTodo::try_from(row).map(|stored| stored.todo))
            .collect()
    }

    async fn create(&self, new: NewTodo) -> Result<Todo, TodoError> {
        let now = Self::current_timestamp();

        let row = sqlx::query_as::<_, TodoRow>(&format!(
            r#"
            INSERT INTO todos (user_id, title, completed, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(new.user_id.value())
        .bind(new.title.as_str())
        .bind(new.completed)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        let stored = StoredTodo::try_from(row)?;
        Ok(stored.todo)
    }

    async fn clear(&self) -> Result<u64, TodoError> {
        let result = sqlx::query("DELETE FROM todos")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }

    async fn upsert(&self, todo: &Todo) -> Result<Todo, TodoError> {
        let now = Self::current_timestamp();

        let row = sqlx::query_as::<_, TodoRow>(&format!(
            r#"
            INSERT INTO todos (id, user_id, title, completed, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                title = excluded.title,
                completed = excluded.completed,
                updated_at = excluded.updated_at
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(todo.id.value())
        .bind(todo.user_id.value())
        .bind(todo.title.as_str())
        .bind(todo.completed)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        let stored = StoredTodo::try_from(row)?;
        Ok(stored.todo)
    }
}

fn db_error(e: sqlx::Error) -> TodoError {
    TodoError::Store(e.to_string())
}

/// Internal row type for SQLite queries.
#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i64,
    user_id: i64,
    title: String,
    completed: bool,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<TodoRow> for StoredTodo {
    type Error = TodoError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let invalid = |e: todo_types::ValidationError| {
            TodoError::Store(format!("invalid row {}: {}", row.id, e))
        };
        Ok(StoredTodo {
            todo: Todo {
                user_id: UserId::try_from(row.user_id).map_err(invalid)?,
                id: TodoId::try_from(row.id).map_err(invalid)?,
                title: Title::new(row.title).map_err(invalid)?,
                completed: row.completed,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
