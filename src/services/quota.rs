//! Per-user daily alias quota backed by the `gmail_alias_usage` table.
//!
//! "Today" is always supplied by the caller so day boundaries are decided in
//! one place (see [`crate::utils::datetime::today_at`]).

use chrono::NaiveDate;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::aliases::MAX_QUOTA;
use crate::database::models::AliasUsage;
use crate::utils::logging::{log_database_error, log_quota_operation};

const TABLE: &str = "gmail_alias_usage";

/// Quota ledger failures
#[derive(Error, Debug)]
pub enum QuotaError {
    /// The store could not be reached; nothing was recorded
    #[error("Quota store unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    /// Usage can only grow
    #[error("Usage increments must be positive")]
    ZeroIncrement,
}

impl QuotaError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuotaError::StorageUnavailable(_))
    }
}

/// Daily usage counters keyed by `(user_id, date)`.
#[derive(Clone)]
pub struct QuotaLedger {
    pool: SqlitePool,
    daily_limit: u32,
}

impl QuotaLedger {
    pub fn new(pool: SqlitePool, daily_limit: u32) -> Self {
        Self { pool, daily_limit }
    }

    /// Ledger with the default limit of [`MAX_QUOTA`] per day.
    pub fn with_default_limit(pool: SqlitePool) -> Self {
        Self::new(pool, MAX_QUOTA)
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Units recorded for `(user_id, today)`, 0 when no row exists yet.
    pub async fn usage(&self, user_id: i64, today: NaiveDate) -> Result<u32, QuotaError> {
        let record = AliasUsage::find(&self.pool, user_id, today)
            .await
            .inspect_err(|e| log_database_error("SELECT", TABLE, &e.to_string(), Some(&format!("user {user_id}"))))?;

        Ok(record.map_or(0, |r| to_units(r.count)))
    }

    /// `max(0, daily_limit - usage)`; never negative even after over-commit.
    pub async fn remaining(&self, user_id: i64, today: NaiveDate) -> Result<u32, QuotaError> {
        let used = self.usage(user_id, today).await?;
        Ok(self.daily_limit.saturating_sub(used))
    }

    /// Adds `by` to the day's usage with a single atomic upsert.
    ///
    /// The limit is not checked here: usage may exceed it, and [`remaining`]
    /// then reports 0 until the next day.
    ///
    /// [`remaining`]: QuotaLedger::remaining
    pub async fn increment(&self, user_id: i64, today: NaiveDate, by: u32) -> Result<(), QuotaError> {
        if by == 0 {
            return Err(QuotaError::ZeroIncrement);
        }

        let total = AliasUsage::add(&self.pool, user_id, today, i64::from(by))
            .await
            .inspect_err(|e| log_database_error("UPSERT", TABLE, &e.to_string(), Some(&format!("user {user_id}"))))?;

        log_quota_operation("increment", user_id, today, &format!("+{by} -> {total}"));
        Ok(())
    }

    /// Atomically records up to `wanted` units without crossing the limit and
    /// returns how many were granted.
    ///
    /// The transaction opens with the upsert, so it holds the SQLite write lock
    /// before anything is read and concurrent claims on the same key
    /// serialize. A grant of 0 leaves the store untouched.
    pub async fn claim(&self, user_id: i64, today: NaiveDate, wanted: u32) -> Result<u32, QuotaError> {
        if wanted == 0 {
            return Ok(0);
        }

        let wanted_units = i64::from(wanted);
        let mut tx = self.pool.begin().await?;

        let total = AliasUsage::add(&mut *tx, user_id, today, wanted_units)
            .await
            .inspect_err(|e| log_database_error("UPSERT", TABLE, &e.to_string(), Some(&format!("claim by user {user_id}"))))?;

        let before = total - wanted_units;
        let room = (i64::from(self.daily_limit) - before).max(0);
        let granted = wanted_units.min(room);

        if granted == 0 {
            tx.rollback().await?;
            log_quota_operation("claim", user_id, today, &format!("wanted {wanted}, quota exhausted at {before}"));
            return Ok(0);
        }

        if granted < wanted_units {
            AliasUsage::set_count(&mut *tx, user_id, today, before + granted).await?;
        }

        tx.commit().await?;

        log_quota_operation(
            "claim",
            user_id,
            today,
            &format!("wanted {wanted}, granted {granted}, usage {}", before + granted),
        );
        Ok(to_units(granted))
    }
}

fn to_units(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}
