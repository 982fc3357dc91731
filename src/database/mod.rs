/// SQLite connection pool and migrations
pub mod connection;
/// Row models and their queries
pub mod models;
