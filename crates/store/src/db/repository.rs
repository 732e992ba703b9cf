//! Generic repository shared by every aggregate.
//!
//! Each table is described once by an [`Entity`] implementation (table name,
//! writable columns, bind order and per-entity hooks). [`Repository`] turns
//! that description into get-by-id, list, save and delete operations, so the
//! per-aggregate modules only add typed finders.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{PgConnection, PgPool, Postgres};

use super::{RepositoryError, map_db_error};

/// Query type handed to [`Entity::bind_columns`].
pub type EntityQuery<'q, E> = QueryAs<'q, Postgres, E, PgArguments>;

/// A record persisted in its own table.
///
/// Rows are decoded with `sqlx::FromRow` from `SELECT *`, so every column of
/// the table that the struct names must exist. Identity and audit columns
/// (`id`, `created_at`, `updated_at`, `deleted_at`) are managed by the
/// repository and must not appear in [`Entity::COLUMNS`].
pub trait Entity: for<'r> sqlx::FromRow<'r, PgRow> + Send + Sync + Unpin + Sized + 'static {
    /// Typed primary key.
    type Id: Copy
        + Send
        + Sync
        + fmt::Debug
        + fmt::Display
        + for<'q> sqlx::Encode<'q, Postgres>
        + sqlx::Type<Postgres>
        + 'static;

    /// Table name.
    const TABLE: &'static str;

    /// Writable columns, in the order [`Entity::bind_columns`] binds them.
    const COLUMNS: &'static [&'static str];

    /// Identity, or `None` if the record has never been persisted.
    fn id(&self) -> Option<Self::Id>;

    /// Bind one value per entry of [`Entity::COLUMNS`], in order.
    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self>;

    /// Runs before the first insert.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the save.
    fn before_insert(&mut self) -> Result<(), RepositoryError> {
        Ok(())
    }

    /// Runs before an overwrite, with the currently stored (and locked) row.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the save.
    fn before_update(&mut self, _stored: &Self) -> Result<(), RepositoryError> {
        Ok(())
    }

    /// Writes dependent rows inside the save transaction.
    ///
    /// `saved` is the row returned by the insert/update; `input` is what the
    /// caller passed in, still carrying any nested collections.
    fn after_save(
        _conn: &mut PgConnection,
        _saved: &mut Self,
        _input: Self,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async { Ok(()) }
    }

    /// Runs inside the delete transaction with the row as it was returned by
    /// the delete (stamped for a soft delete, gone for a hard one).
    ///
    /// Returning an error rolls the delete back.
    fn after_delete(
        _conn: &mut PgConnection,
        _deleted: &Self,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async { Ok(()) }
    }

    /// Populates nested collections after a read.
    fn load_relations(
        _pool: &PgPool,
        _entities: &mut [Self],
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async { Ok(()) }
    }
}

/// Repository for any [`Entity`].
pub struct Repository<'a, E> {
    pool: &'a PgPool,
    entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> Repository<'a, E> {
    /// Create a new repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            entity: PhantomData,
        }
    }

    /// The pool this repository runs against.
    #[must_use]
    pub const fn pool(&self) -> &'a PgPool {
        self.pool
    }

    /// Get an entity by its ID.
    ///
    /// This is a raw identity lookup: soft-deleted rows are returned with
    /// their deletion timestamp set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: E::Id) -> Result<E, RepositoryError> {
        let sql = select_by_id_sql(E::TABLE, false);
        let mut entity = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        E::load_relations(self.pool, std::slice::from_mut(&mut entity)).await?;

        Ok(entity)
    }

    /// Get all entities that are not soft-deleted, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_all(&self) -> Result<Vec<E>, RepositoryError> {
        let sql = select_all_sql(E::TABLE);
        let entities = sqlx::query_as::<_, E>(&sql).fetch_all(self.pool).await?;

        self.with_relations(entities).await
    }

    /// Get all live entities whose `column` equals `value`, ordered by ID.
    pub(crate) async fn find_by<V>(
        &self,
        column: &'static str,
        value: V,
    ) -> Result<Vec<E>, RepositoryError>
    where
        V: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
    {
        let sql = select_by_column_sql(E::TABLE, column);
        let entities = sqlx::query_as::<_, E>(&sql)
            .bind(value)
            .fetch_all(self.pool)
            .await?;

        self.with_relations(entities).await
    }

    /// Get the single live entity whose `column` equals `value`.
    pub(crate) async fn find_one_by<V>(
        &self,
        column: &'static str,
        value: V,
    ) -> Result<Option<E>, RepositoryError>
    where
        V: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
    {
        Ok(self.find_by(column, value).await?.into_iter().next())
    }

    /// Load nested collections for rows fetched by a custom query.
    pub(crate) async fn with_relations(&self, mut entities: Vec<E>) -> Result<Vec<E>, RepositoryError> {
        if !entities.is_empty() {
            E::load_relations(self.pool, &mut entities).await?;
        }
        Ok(entities)
    }

    /// Insert or overwrite an entity.
    ///
    /// Without an ID the entity is inserted and returned with its new ID.
    /// With an ID the stored row is locked (`SELECT ... FOR UPDATE`), the
    /// update hook runs against it, and every writable column is overwritten.
    /// The existence check and the write share one transaction, so a
    /// concurrent save of the same row waits instead of racing; the last
    /// writer wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ID does not exist (no row is created).
    /// Returns `RepositoryError::Validation` if a hook rejects the entity.
    /// Returns `RepositoryError::Conflict` on unique or foreign-key violations.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn save(&self, mut entity: E) -> Result<E, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut saved = if let Some(id) = entity.id() {
            let sql = select_by_id_sql(E::TABLE, true);
            let stored = sqlx::query_as::<_, E>(&sql)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

            entity.before_update(&stored)?;

            let sql = update_sql(E::TABLE, E::COLUMNS);
            entity
                .bind_columns(sqlx::query_as::<_, E>(&sql))
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?
        } else {
            entity.before_insert()?;

            let sql = insert_sql(E::TABLE, E::COLUMNS);
            entity
                .bind_columns(sqlx::query_as::<_, E>(&sql))
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?
        };

        E::after_save(&mut tx, &mut saved, entity).await?;
        tx.commit().await?;

        tracing::debug!(table = E::TABLE, id = ?saved.id(), "Saved entity");
        Ok(saved)
    }

    /// Delete an entity.
    ///
    /// A hard delete removes the row. A soft delete stamps `deleted_at`
    /// (keeping the first stamp if the row was already soft-deleted). The
    /// delete and [`Entity::after_delete`] share one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this ID.
    /// Returns `RepositoryError::Conflict` if other rows still reference it (hard delete).
    /// Returns `RepositoryError::Validation` if the delete hook rejects it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: E::Id, hard: bool) -> Result<(), RepositoryError> {
        let sql = if hard {
            hard_delete_sql(E::TABLE)
        } else {
            soft_delete_sql(E::TABLE)
        };

        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
            .ok_or(RepositoryError::NotFound)?;

        E::after_delete(&mut tx, &deleted).await?;
        tx.commit().await?;

        tracing::debug!(table = E::TABLE, %id, hard, "Deleted entity");
        Ok(())
    }
}

// =============================================================================
// SQL builders
// =============================================================================

fn placeholders(range: std::ops::RangeInclusive<usize>) -> String {
    range.map(|n| format!("${n}")).collect::<Vec<_>>().join(", ")
}

fn select_by_id_sql(table: &str, lock: bool) -> String {
    let suffix = if lock { " FOR UPDATE" } else { "" };
    format!("SELECT * FROM {table} WHERE id = $1{suffix}")
}

fn select_all_sql(table: &str) -> String {
    format!("SELECT * FROM {table} WHERE deleted_at IS NULL ORDER BY id")
}

fn select_by_column_sql(table: &str, column: &str) -> String {
    format!("SELECT * FROM {table} WHERE {column} = $1 AND deleted_at IS NULL ORDER BY id")
}

pub(super) fn insert_sql(table: &str, columns: &[&str]) -> String {
    format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING *",
        columns.join(", "),
        placeholders(1..=columns.len()),
    )
}

fn update_sql(table: &str, columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ${}", i + 1))
        .collect();
    format!(
        "UPDATE {table} SET {}, updated_at = now() WHERE id = ${} RETURNING *",
        assignments.join(", "),
        columns.len() + 1,
    )
}

fn soft_delete_sql(table: &str) -> String {
    format!(
        "UPDATE {table} SET deleted_at = COALESCE(deleted_at, now()), updated_at = now() \
         WHERE id = $1 RETURNING *"
    )
}

fn hard_delete_sql(table: &str) -> String {
    format!("DELETE FROM {table} WHERE id = $1 RETURNING *")
}
