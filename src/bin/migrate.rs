//! Operator tool for the quota store: migrations, schema check, usage lookup.

use anyhow::{anyhow, Result};
use gmail_alias_bot::config::Config;
use gmail_alias_bot::database::{connection::DatabaseManager, models::AliasUsage};
use gmail_alias_bot::utils::datetime::{format_usage_date, parse_usage_date};
use std::env;
use std::io;
use std::path::Path;

const HISTORY_DAYS: i64 = 14;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "usage" => show_usage(&args[2..]).await,
        "reset" => reset_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

fn sqlite_path(database_url: &str) -> Option<&str> {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
}

async fn connect() -> Result<DatabaseManager> {
    let database_url = Config::database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    if let Some(parent) = sqlite_path(&database_url).and_then(|path| Path::new(path).parent()) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            println!("📁 Creating directory: {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }

    DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Gmail Alias Bot - Database Migration Tool");
    println!("============================================");

    let db_manager = connect().await?;

    println!("🚀 Running database migrations...");
    if let Err(e) = db_manager.run_migrations().await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }

    println!("✅ Migrations completed successfully!");
    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let db_manager = connect().await?;

    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
    .fetch_all(&db_manager.pool)
    .await?;

    println!("✅ Database connection successful!");
    println!("📋 Found tables:");
    for table in &tables {
        println!("  • {table}");
    }

    if !tables.iter().any(|t| t == "gmail_alias_usage") {
        println!("⚠️  gmail_alias_usage is missing");
        println!("💡 Try running 'migrate up' to create the schema");
    }

    Ok(())
}

async fn show_usage(args: &[String]) -> Result<()> {
    let user_id: i64 = args
        .first()
        .ok_or_else(|| anyhow!("usage requires a Telegram user id"))?
        .parse()
        .map_err(|_| anyhow!("Telegram user id must be an integer"))?;

    let db_manager = connect().await?;

    match args.get(1) {
        Some(date) => {
            let date = parse_usage_date(date)?;
            let count = AliasUsage::find(&db_manager.pool, user_id, date)
                .await?
                .map_or(0, |record| record.count);
            println!("👤 User {user_id} on {}: {count} aliases", format_usage_date(date));
        }
        None => {
            let history = AliasUsage::history(&db_manager.pool, user_id, HISTORY_DAYS).await?;
            if history.is_empty() {
                println!("👤 User {user_id} has no recorded alias usage");
            } else {
                println!("👤 User {user_id}, last {} active days:", history.len());
                for record in history {
                    println!("  • {}: {}", format_usage_date(record.usage_date), record.count);
                }
            }
        }
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL quota data in the database!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = Config::database_url_from_env();
    let db_path = sqlite_path(&database_url)
        .ok_or_else(|| anyhow!("Reset is only supported for SQLite databases"))?;

    if Path::new(db_path).exists() {
        std::fs::remove_file(db_path)?;
        println!("🗑️  Deleted database file: {db_path}");
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");
    Ok(())
}

fn mask_url(url: &str) -> String {
    match sqlite_path(url).and_then(|path| Path::new(path).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🔧 Gmail Alias Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up              Run pending database migrations (default)");
    println!("    check                    Check database connection and list tables");
    println!("    usage <user_id> [date]   Show a user's alias usage (date as YYYY-MM-DD)");
    println!("    reset                    Delete the SQLite database and recreate it");
    println!("    help                     Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL             Database connection URL (default: sqlite:./data/aliases.db)");
}
