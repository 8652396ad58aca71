//! Book persistence over SQLite.
//!
//! Every mutating call is a single autocommit statement: it is durable when
//! the call returns, and a failure leaves nothing behind.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::SqlitePool;
use thiserror::Error;

use super::models::{Book, BookPayload};

/// DDL for the `book` table
pub const CREATE_BOOK_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS book (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        title   TEXT NOT NULL,
        author  TEXT NOT NULL,
        preview TEXT
    );
"#;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Book #{0} does not exist")]
    NotFound(String),

    /// The row was rejected by a table constraint (e.g. a null title)
    #[error("constraint violation: {0}")]
    Constraint(#[source] sqlx::Error),

    /// The store could not be reached or failed mid-statement
    #[error("book store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        let constraint = match &error {
            sqlx::Error::Database(db_error) => match db_error.kind() {
                ErrorKind::NotNullViolation
                | ErrorKind::UniqueViolation
                | ErrorKind::CheckViolation
                | ErrorKind::ForeignKeyViolation => true,
                _ => db_error
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .is_some_and(|code| code & 0xff == SQLITE_CONSTRAINT),
            },
            _ => false,
        };

        if constraint {
            Self::Constraint(error)
        } else {
            Self::Unavailable(error)
        }
    }
}

const SQLITE_CONSTRAINT: i32 = 19;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new book and return it with its assigned id
    async fn create(&self, payload: &BookPayload) -> StoreResult<Book>;

    /// `id` is bound as text; the INTEGER column's affinity converts
    /// numeric-looking values (`1`, `01`, `1.0`) and anything else matches nothing.
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>>;

    /// All books in ascending id order
    async fn find_all(&self) -> StoreResult<Vec<Book>>;

    /// Overwrite all mutable fields of an existing book
    async fn update(&self, id: &str, payload: &BookPayload) -> StoreResult<()>;

    async fn delete(&self, id: &str) -> StoreResult<()>;
}

/// [`BookStore`] backed by a shared SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn create(&self, payload: &BookPayload) -> StoreResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO book (title, author, preview)
            VALUES (?, ?, ?)
            RETURNING id, title, author, preview
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(&payload.preview)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(book_id = book.id, "book created");
        Ok(book)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, preview FROM book WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, preview FROM book ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn update(&self, id: &str, payload: &BookPayload) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE book SET title = ?, author = ?, preview = ? WHERE id = ?",
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(&payload.preview)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        tracing::debug!(book_id = %id, "book updated");
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM book WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        tracing::debug!(book_id = %id, "book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_db::Database;

    async fn store() -> SqliteBookStore {
        let db = Database::connect_in_memory().await.unwrap();
        sqlx::raw_sql(CREATE_BOOK_TABLE)
            .execute(db.pool())
            .await
            .unwrap();
        SqliteBookStore::new(db.pool().clone())
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let store = store().await;
        let created = store
            .create(&BookPayload::new("Dune", "Herbert", Some("desert planet")))
            .await
            .unwrap();

        let found = store.find_by_id(&created.id.to_string()).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.title, "Dune");
        assert_eq!(found.author, "Herbert");
        assert_eq!(found.preview.as_deref(), Some("desert planet"));
    }

    #[tokio::test]
    async fn ids_are_unique_and_listed_in_insertion_order() {
        let store = store().await;
        let mut ids = Vec::new();
        for n in 0..5 {
            let title = format!("Volume {n}");
            let book = store
                .create(&BookPayload::new(&title, "Anon", None))
                .await
                .unwrap();
            ids.push(book.id);
        }

        let listed: Vec<i64> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn null_title_is_a_constraint_violation() {
        let store = store().await;
        let payload = BookPayload {
            author: Some("Herbert".to_string()),
            ..BookPayload::default()
        };

        let err = store.create(&payload).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)), "got {err:?}");
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_every_field() {
        let store = store().await;
        let book = store
            .create(&BookPayload::new("Dune", "Herbert", Some("desert planet")))
            .await
            .unwrap();

        store
            .update(&book.id.to_string(), &BookPayload::new("Dune Messiah", "Frank Herbert", None))
            .await
            .unwrap();

        let updated = store.find_by_id(&book.id.to_string()).await.unwrap().unwrap();
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.author, "Frank Herbert");
        assert_eq!(updated.preview, None);
    }

    #[tokio::test]
    async fn update_with_missing_author_fails_and_keeps_row() {
        let store = store().await;
        let book = store
            .create(&BookPayload::new("Dune", "Herbert", None))
            .await
            .unwrap();

        let payload = BookPayload {
            title: Some("Renamed".to_string()),
            ..BookPayload::default()
        };
        let err = store.update(&book.id.to_string(), &payload).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)), "got {err:?}");

        let unchanged = store.find_by_id(&book.id.to_string()).await.unwrap().unwrap();
        assert_eq!(unchanged, book);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = store().await;
        assert!(store.find_by_id("999").await.unwrap().is_none());

        let err = store
            .update("999", &BookPayload::new("a", "b", None))
            .await
            .unwrap_err();
        assert!(matches!(&err, StoreError::NotFound(id) if id == "999"));

        let err = store.delete("999").await.unwrap_err();
        assert!(matches!(&err, StoreError::NotFound(id) if id == "999"));
        assert_eq!(err.to_string(), "Book #999 does not exist");
    }

    #[tokio::test]
    async fn numeric_text_ids_match_by_column_affinity() {
        let store = store().await;
        let book = store
            .create(&BookPayload::new("Dune", "Herbert", None))
            .await
            .unwrap();
        assert_eq!(book.id, 1);

        for raw in ["1", "01", "+1", "1.0", " 1"] {
            let found = store.find_by_id(raw).await.unwrap();
            assert_eq!(found.as_ref(), Some(&book), "id {raw:?}");
        }
        for raw in ["abc", "1.5", "1abc", ""] {
            assert!(store.find_by_id(raw).await.unwrap().is_none(), "id {raw:?}");
        }

        store
            .update("1.0", &BookPayload::new("Dune", "Frank Herbert", None))
            .await
            .unwrap();
        store.delete("01").await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let store = store().await;
        let book = store
            .create(&BookPayload::new("Dune", "Herbert", None))
            .await
            .unwrap();

        store.delete(&book.id.to_string()).await.unwrap();
        assert!(store.find_by_id(&book.id.to_string()).await.unwrap().is_none());
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn closed_pool_is_unavailable() {
        let store = store().await;
        store.pool.close().await;

        let err = store.find_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)), "got {err:?}");
    }
}
