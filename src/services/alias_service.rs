//! Request flow tying the alias generator to the daily quota:
//! validate, check remaining, generate, claim, deliver.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::aliases::{AliasCandidate, AliasError, AliasGenerator, MAX_QUOTA};
use crate::services::quota::{QuotaError, QuotaLedger};

/// Why a request produced no aliases
#[derive(Error, Debug)]
pub enum RequestError {
    #[error(transparent)]
    Alias(#[from] AliasError),

    /// Nothing left for today
    #[error("Daily alias quota exhausted")]
    QuotaExhausted,

    #[error(transparent)]
    Storage(#[from] QuotaError),
}

/// Aliases delivered for one request
#[derive(Debug, Clone)]
pub struct AliasBatch {
    pub aliases: Vec<AliasCandidate>,
    /// Quota left after this batch was recorded
    pub remaining: u32,
    /// Whether the domain honours dot and tag aliases
    pub folding_domain: bool,
}

/// Alias generator and quota ledger behind one request call.
pub struct AliasService {
    generator: AliasGenerator,
    ledger: QuotaLedger,
}

impl AliasService {
    pub fn new(generator: AliasGenerator, ledger: QuotaLedger) -> Self {
        Self { generator, ledger }
    }

    pub fn generator(&self) -> &AliasGenerator {
        &self.generator
    }

    pub fn ledger(&self) -> &QuotaLedger {
        &self.ledger
    }

    pub async fn remaining(&self, user_id: i64, today: NaiveDate) -> Result<u32, QuotaError> {
        self.ledger.remaining(user_id, today).await
    }

    /// Largest count a request may ask for right now.
    pub fn max_request(&self, remaining: u32) -> u32 {
        remaining.min(MAX_QUOTA)
    }

    /// Generates up to `count` aliases for `address` and charges them to
    /// `user_id`'s quota for `today`.
    ///
    /// `count` must lie in `1..=min(remaining, MAX_QUOTA)`. When a concurrent
    /// request consumed part of the quota in the meantime, the batch is cut
    /// to what the ledger granted; usage never grows past the daily limit
    /// through this path.
    pub async fn request(
        &self,
        user_id: i64,
        today: NaiveDate,
        address: &str,
        count: u32,
    ) -> Result<AliasBatch, RequestError> {
        let (parsed, folding_domain) = self.generator.check_input(address)?;

        let remaining = self.ledger.remaining(user_id, today).await?;
        if remaining == 0 {
            return Err(RequestError::QuotaExhausted);
        }

        let max = self.max_request(remaining);
        if count == 0 || count > max {
            return Err(AliasError::InvalidCount { requested: count, max }.into());
        }

        let mut aliases = self
            .generator
            .generate_for(&parsed, count, today, &mut rand::thread_rng())?;
        debug!("Generated {} candidates for user {}", aliases.len(), user_id);

        let granted = self.ledger.claim(user_id, today, count).await?;
        if granted == 0 {
            return Err(RequestError::QuotaExhausted);
        }
        aliases.truncate(granted as usize);

        let remaining = self.ledger.remaining(user_id, today).await?;
        info!(
            "Delivered {} of {} requested aliases to user {} ({} left today)",
            granted, count, user_id, remaining
        );

        Ok(AliasBatch {
            aliases,
            remaining,
            folding_domain,
        })
    }
}
