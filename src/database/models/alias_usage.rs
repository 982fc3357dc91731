use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite};

/// Alias generation counter for one user on one calendar day.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AliasUsage {
    pub id: i64,
    pub user_id: i64,
    pub usage_date: NaiveDate,
    pub count: i64,
}

impl AliasUsage {
    pub async fn find(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        usage_date: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AliasUsage>(
            "SELECT id, user_id, usage_date, count FROM gmail_alias_usage WHERE user_id = ? AND usage_date = ?"
        )
        .bind(user_id)
        .bind(usage_date)
        .fetch_optional(pool)
        .await
    }

    /// Upserts the `(user_id, usage_date)` row, adding `by` to its count in a
    /// single statement. Returns the count after the write.
    ///
    /// The statement is stepped to completion before returning; outside a
    /// transaction SQLite only commits once it finishes.
    pub async fn add<'e, E>(
        executor: E,
        user_id: i64,
        usage_date: NaiveDate,
        by: i64,
    ) -> Result<i64, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO gmail_alias_usage (user_id, usage_date, count)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id, usage_date)
            DO UPDATE SET count = count + excluded.count
            RETURNING count
            "#,
        )
        .bind(user_id)
        .bind(usage_date)
        .bind(by)
        .fetch_all(executor)
        .await?
        .into_iter()
        .next()
        .ok_or(sqlx::Error::RowNotFound)
    }

    /// Overwrites the count of an existing row.
    pub async fn set_count<'e, E>(
        executor: E,
        user_id: i64,
        usage_date: NaiveDate,
        count: i64,
    ) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE gmail_alias_usage SET count = ? WHERE user_id = ? AND usage_date = ?")
            .bind(count)
            .bind(user_id)
            .bind(usage_date)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Most recent days first
    pub async fn history(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AliasUsage>(
            "SELECT id, user_id, usage_date, count FROM gmail_alias_usage WHERE user_id = ? ORDER BY usage_date DESC LIMIT ?"
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Aliases issued to all users on `usage_date`.
    pub async fn total_for_date(
        pool: &sqlx::SqlitePool,
        usage_date: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(count), 0) FROM gmail_alias_usage WHERE usage_date = ?"
        )
        .bind(usage_date)
        .fetch_one(pool)
        .await
    }
}
