//! # Gmail Alias Bot
//!
//! A Telegram bot that turns one email address into several aliases that
//! land in the same inbox, limited by a per-user daily quota.
//!
//! ## Features
//! - Address validation and canonicalization (tag stripping, Gmail dot folding)
//! - Subaddress-tag and dot-insertion alias strategies with uniqueness guarantees
//! - Daily quota per user with atomic, race-free accounting in SQLite
//! - Health endpoints for the quota store

/// Alias validation, canonicalization and generation
pub mod aliases;
/// Bot command handlers and message processing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Quota ledger, alias request flow and health service
pub mod services;
/// Utility functions for dates, validation, feedback and formatting
pub mod utils;
