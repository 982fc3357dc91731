//! Alias generation: subaddress tags plus dot-insertion variants.

use chrono::NaiveDate;
use rand::Rng;
use std::collections::HashSet;

use super::address::{validate, AliasCandidate, AliasKind, CanonicalIdentity, EmailAddress};
use super::error::AliasError;

/// Maximum aliases per request, and the default daily quota.
pub const MAX_QUOTA: u32 = 10;

/// Domains that ignore dots and `+tags` when routing mail.
pub const DEFAULT_FOLDING_DOMAINS: [&str; 2] = ["gmail.com", "googlemail.com"];

const TAG_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const TAG_RANDOM_LEN: usize = 2;

/// Construction-time settings for [`AliasGenerator`]
#[derive(Debug, Clone)]
pub struct AliasPolicy {
    pub folding_domains: HashSet<String>,
}

impl Default for AliasPolicy {
    fn default() -> Self {
        Self {
            folding_domains: DEFAULT_FOLDING_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl AliasPolicy {
    pub fn is_alias_folding_domain(&self, domain: &str) -> bool {
        self.folding_domains.contains(&domain.trim().to_lowercase())
    }
}

/// Dot-insertion strategies, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotStrategy {
    EveryTwo,
    EveryThree,
    Midpoint,
    FullyDotted,
    RandomTwoPoint,
}

impl DotStrategy {
    pub const ALL: [DotStrategy; 5] = [
        DotStrategy::EveryTwo,
        DotStrategy::EveryThree,
        DotStrategy::Midpoint,
        DotStrategy::FullyDotted,
        DotStrategy::RandomTwoPoint,
    ];

    /// Applies the strategy, or returns `None` when `local_base` is outside
    /// the length range the strategy works on.
    pub fn apply<R: Rng + ?Sized>(self, local_base: &str, rng: &mut R) -> Option<String> {
        let chars: Vec<char> = local_base.chars().collect();
        let len = chars.len();

        match self {
            DotStrategy::EveryTwo if len >= 4 => Some(dot_every(&chars, 2)),
            DotStrategy::EveryThree if len >= 6 => Some(dot_every(&chars, 3)),
            DotStrategy::Midpoint if len >= 4 => Some(insert_dots(&chars, &[len / 2])),
            DotStrategy::FullyDotted if len <= 6 => Some(dot_every(&chars, 1)),
            DotStrategy::RandomTwoPoint if len >= 4 => {
                // interior positions only: 1..len
                let mut positions: Vec<usize> = rand::seq::index::sample(rng, len - 1, 2)
                    .into_iter()
                    .map(|i| i + 1)
                    .collect();
                positions.sort_unstable();
                Some(insert_dots(&chars, &positions))
            }
            _ => None,
        }
    }
}

fn dot_every(chars: &[char], size: usize) -> String {
    chars
        .chunks(size)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(".")
}

fn insert_dots(chars: &[char], positions: &[usize]) -> String {
    let mut out = String::with_capacity(chars.len() + positions.len());
    for (i, c) in chars.iter().enumerate() {
        if positions.contains(&i) {
            out.push('.');
        }
        out.push(*c);
    }
    out
}

/// Lazily yields each strategy's variant that differs from `local_base`.
pub fn dot_variants<'a, R: Rng + ?Sized>(
    local_base: &'a str,
    rng: &'a mut R,
) -> impl Iterator<Item = String> + 'a {
    DotStrategy::ALL
        .into_iter()
        .filter_map(move |strategy| strategy.apply(local_base, &mut *rng))
        .filter(move |variant| variant != local_base)
}

/// `YYMMDD` of `today` followed by two random `[a-z0-9]` characters.
pub fn generate_tag<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> String {
    let mut tag = today.format("%y%m%d").to_string();
    for _ in 0..TAG_RANDOM_LEN {
        let idx = rng.gen_range(0..TAG_CHARSET.len());
        tag.push(char::from(TAG_CHARSET[idx]));
    }
    tag
}

/// Accumulates unique candidates for one generation call.
struct CandidateSet<'a> {
    identity: &'a CanonicalIdentity,
    original: String,
    excluded_tags: HashSet<String>,
    seen: HashSet<String>,
    candidates: Vec<AliasCandidate>,
}

impl<'a> CandidateSet<'a> {
    fn new(identity: &'a CanonicalIdentity, requester: &EmailAddress) -> Self {
        Self {
            identity,
            original: requester.to_string().to_lowercase(),
            excluded_tags: requester.tag().map(str::to_lowercase).into_iter().collect(),
            seen: HashSet::new(),
            candidates: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.candidates.len()
    }

    fn push(&mut self, local_variant: String, kind: AliasKind) -> bool {
        let candidate = AliasCandidate {
            local_variant,
            domain: self.identity.domain.clone(),
            kind,
        };
        if candidate.local_variant == self.identity.local_base
            || candidate.address() == self.original
            || !self.seen.insert(candidate.local_variant.clone())
        {
            return false;
        }
        self.candidates.push(candidate);
        true
    }

    fn push_fresh_tag<R: Rng + ?Sized>(&mut self, today: NaiveDate, rng: &mut R) {
        loop {
            let tag = generate_tag(today, rng);
            if self.excluded_tags.contains(&tag) {
                continue;
            }
            let local_variant = format!("{}+{}", self.identity.local_base, tag);
            if self.push(local_variant, AliasKind::Tagged(tag)) {
                return;
            }
        }
    }
}

/// Expands one address into distinct aliases that reach the same inbox.
#[derive(Debug, Clone, Default)]
pub struct AliasGenerator {
    policy: AliasPolicy,
}

impl AliasGenerator {
    pub fn new(policy: AliasPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AliasPolicy {
        &self.policy
    }

    pub fn validate(&self, address: &str) -> Result<EmailAddress, AliasError> {
        validate(address)
    }

    pub fn canonicalize(&self, address: &EmailAddress) -> CanonicalIdentity {
        CanonicalIdentity::from_address(address, &self.policy.folding_domains)
    }

    pub fn is_alias_folding_domain(&self, domain: &str) -> bool {
        self.policy.is_alias_folding_domain(domain)
    }

    /// Validates user input and reports whether its domain folds aliases.
    pub fn check_input(&self, address: &str) -> Result<(EmailAddress, bool), AliasError> {
        let parsed = validate(address)?;
        let folding = self.is_alias_folding_domain(parsed.domain());
        Ok((parsed, folding))
    }

    /// Generates `count` aliases using the thread-local random source.
    pub fn generate(
        &self,
        address: &str,
        count: u32,
        today: NaiveDate,
    ) -> Result<Vec<AliasCandidate>, AliasError> {
        self.generate_with_rng(address, count, today, &mut rand::thread_rng())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        address: &str,
        count: u32,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<AliasCandidate>, AliasError> {
        check_count(count)?;
        let parsed = validate(address)?;
        self.generate_for(&parsed, count, today, rng)
    }

    /// Generation for an already validated address.
    ///
    /// Roughly half the aliases (rounded up) are tag variants. The rest come
    /// from the dot strategies while they last, then from more tags. Dot
    /// strategies are skipped when the canonical local part already holds a
    /// dot, which only happens on non-folding domains.
    pub fn generate_for<R: Rng + ?Sized>(
        &self,
        address: &EmailAddress,
        count: u32,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<AliasCandidate>, AliasError> {
        check_count(count)?;

        let identity = self.canonicalize(address);
        let wanted = count as usize;
        let plus_count = wanted.div_ceil(2);
        let mut set = CandidateSet::new(&identity, address);

        while set.len() < plus_count {
            set.push_fresh_tag(today, rng);
        }

        if !identity.local_base.contains('.') {
            for variant in dot_variants(&identity.local_base, &mut *rng) {
                if set.len() >= wanted {
                    break;
                }
                set.push(variant, AliasKind::Dotted);
            }
        }

        while set.len() < wanted {
            set.push_fresh_tag(today, rng);
        }

        let mut candidates = set.candidates;
        candidates.truncate(wanted);
        Ok(candidates)
    }
}

fn check_count(count: u32) -> Result<(), AliasError> {
    if count == 0 || count > MAX_QUOTA {
        return Err(AliasError::InvalidCount {
            requested: count,
            max: MAX_QUOTA,
        });
    }
    Ok(())
}
