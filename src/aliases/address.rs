//! Email address value types and canonicalization.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

use super::error::{AliasError, InvalidReason};

/// Longest local part accepted by [`validate`]
pub const MAX_LOCAL_PART_LEN: usize = 64;
/// Longest domain accepted by [`validate`]
pub const MAX_DOMAIN_LEN: usize = 255;

#[allow(clippy::expect_used)]
static ADDRESS_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("address pattern is a valid regex")
});

/// A syntactically valid `local@domain` address, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    local_part: String,
    domain: String,
}

impl EmailAddress {
    /// Everything before `@`, case and tag preserved.
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// Everything after `@`, as typed.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The `+tag` of the local part without the `+`, if any.
    pub fn tag(&self) -> Option<&str> {
        self.local_part.split_once('+').map(|(_, tag)| tag)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

/// Checks that `address` is a plausible email address and splits it.
///
/// Surrounding whitespace is ignored. The local part must keep at least one
/// non-dot character before any `+tag`, so canonicalization never yields an
/// empty name.
pub fn validate(address: &str) -> Result<EmailAddress, AliasError> {
    let address = address.trim();

    if !ADDRESS_SHAPE.is_match(address) {
        return Err(AliasError::MalformedAddress(InvalidReason::Shape));
    }

    let (local_part, domain) = address
        .split_once('@')
        .ok_or(AliasError::MalformedAddress(InvalidReason::Shape))?;

    if local_part.len() > MAX_LOCAL_PART_LEN {
        return Err(AliasError::MalformedAddress(InvalidReason::LocalPartTooLong));
    }

    if domain.len() > MAX_DOMAIN_LEN {
        return Err(AliasError::MalformedAddress(InvalidReason::DomainTooLong));
    }

    let name = local_part.split('+').next().unwrap_or_default();
    if name.chars().all(|c| c == '.') {
        return Err(AliasError::MalformedAddress(InvalidReason::EmptyLocalBase));
    }

    Ok(EmailAddress {
        local_part: local_part.to_string(),
        domain: domain.to_string(),
    })
}

/// Normalized `(local_base, domain)` pair used as the generation seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalIdentity {
    pub local_base: String,
    pub domain: String,
}

impl CanonicalIdentity {
    /// Lower-cases, drops the `+tag` and, on folding domains, every dot.
    pub fn from_address(address: &EmailAddress, folding_domains: &HashSet<String>) -> Self {
        let domain = address.domain.to_lowercase();
        let local = address.local_part.to_lowercase();

        let mut local_base = match local.split_once('+') {
            Some((name, _)) => name.to_string(),
            None => local,
        };

        if folding_domains.contains(&domain) {
            local_base.retain(|c| c != '.');
        }

        Self { local_base, domain }
    }

    /// Renders the identity back into an address so it can be canonicalized again.
    pub fn to_address(&self) -> EmailAddress {
        EmailAddress {
            local_part: self.local_base.clone(),
            domain: self.domain.clone(),
        }
    }
}

impl fmt::Display for CanonicalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_base, self.domain)
    }
}

/// How an alias differs from its canonical identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AliasKind {
    /// `local_base+tag`
    Tagged(String),
    /// `local_base` with dots inserted
    Dotted,
}

/// One generated alias. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasCandidate {
    /// Local part of the alias, tag included
    pub local_variant: String,
    /// Lower-cased domain of the canonical identity
    pub domain: String,
    /// Which strategy produced it
    pub kind: AliasKind,
}

impl AliasCandidate {
    /// Full `local@domain` string shown to the user.
    pub fn address(&self) -> String {
        format!("{}@{}", self.local_variant, self.domain)
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            AliasKind::Tagged(tag) => Some(tag),
            AliasKind::Dotted => None,
        }
    }

    /// Local part with the tag and every dot removed.
    pub fn stripped_local(&self) -> String {
        let name = self.local_variant.split('+').next().unwrap_or_default();
        name.chars().filter(|c| *c != '.').collect()
    }
}

impl fmt::Display for AliasCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_variant, self.domain)
    }
}
