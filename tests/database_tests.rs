use anyhow::Result;
use chrono::NaiveDate;
use gmail_alias_bot::database::{connection::DatabaseManager, models::*};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
}

#[tokio::test]
async fn test_usage_row_created_on_first_add() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user_id = 67890i64;

    assert!(AliasUsage::find(&db.pool, user_id, day(25)).await?.is_none());

    let count = AliasUsage::add(&db.pool, user_id, day(25), 3).await?;
    assert_eq!(count, 3);

    let usage = AliasUsage::find(&db.pool, user_id, day(25)).await?.unwrap();
    assert_eq!(usage.user_id, user_id);
    assert_eq!(usage.usage_date, day(25));
    assert_eq!(usage.count, 3);

    Ok(())
}

#[tokio::test]
async fn test_add_accumulates_into_one_row() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    AliasUsage::add(&db.pool, 1, day(25), 2).await?;
    let first = AliasUsage::find(&db.pool, 1, day(25)).await?.unwrap();
    let count = AliasUsage::add(&db.pool, 1, day(25), 5).await?;
    assert_eq!(count, 7);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gmail_alias_usage WHERE user_id = 1")
        .fetch_one(&db.pool)
        .await?;
    assert_eq!(rows, 1);
    assert_eq!(AliasUsage::find(&db.pool, 1, day(25)).await?.unwrap().id, first.id);

    Ok(())
}

#[tokio::test]
async fn test_set_count_overwrites() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    AliasUsage::add(&db.pool, 1, day(25), 9).await?;
    AliasUsage::set_count(&db.pool, 1, day(25), 4).await?;
    assert_eq!(AliasUsage::find(&db.pool, 1, day(25)).await?.unwrap().count, 4);

    // No row, nothing to overwrite
    AliasUsage::set_count(&db.pool, 2, day(25), 4).await?;
    assert!(AliasUsage::find(&db.pool, 2, day(25)).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_negative_count_rejected_by_schema() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let result = AliasUsage::add(&db.pool, 1, day(25), -1).await;
    assert!(result.is_err());
    assert!(AliasUsage::find(&db.pool, 1, day(25)).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_history_newest_first() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    for (d, n) in [(20, 1), (22, 4), (21, 2), (25, 10)] {
        AliasUsage::add(&db.pool, 1, day(d), n).await?;
    }
    AliasUsage::add(&db.pool, 2, day(23), 8).await?;

    let history = AliasUsage::history(&db.pool, 1, 3).await?;
    let dates: Vec<NaiveDate> = history.iter().map(|u| u.usage_date).collect();
    assert_eq!(dates, vec![day(25), day(22), day(21)]);
    assert!(history.iter().all(|u| u.user_id == 1));

    Ok(())
}

#[tokio::test]
async fn test_total_for_date_across_users() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert_eq!(AliasUsage::total_for_date(&db.pool, day(25)).await?, 0);

    AliasUsage::add(&db.pool, 1, day(25), 3).await?;
    AliasUsage::add(&db.pool, 2, day(25), 6).await?;
    AliasUsage::add(&db.pool, 2, day(24), 10).await?;

    assert_eq!(AliasUsage::total_for_date(&db.pool, day(25)).await?, 9);
    assert_eq!(AliasUsage::total_for_date(&db.pool, day(24)).await?, 10);

    Ok(())
}

#[tokio::test]
async fn test_database_ping() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    db.ping().await?;

    db.pool.close().await;
    assert!(db.ping().await.is_err());

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_add_is_committed_before_returning() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    for user_id in 1..=300i64 {
        let count = AliasUsage::add(&db.pool, user_id, day(25), 2).await?;
        let stored = AliasUsage::find(&db.pool, user_id, day(25)).await?;
        assert_eq!(stored.map(|u| u.count), Some(count), "user {user_id}");
    }

    Ok(())
}
