//! Error types for alias validation and generation

use thiserror::Error;

/// Why an address failed validation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Not a `local@domain.tld` shape
    #[error("address must look like name@example.com")]
    Shape,

    /// Local part exceeds 64 characters
    #[error("the part before @ is longer than 64 characters")]
    LocalPartTooLong,

    /// Domain exceeds 255 characters
    #[error("the domain is longer than 255 characters")]
    DomainTooLong,

    /// Nothing left of the local part once the tag is removed
    #[error("the part before @ has no name before the + tag")]
    EmptyLocalBase,
}

/// Alias generation errors. Both variants are recoverable by re-prompting the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AliasError {
    /// Input does not parse as an email address
    #[error("Malformed address: {0}")]
    MalformedAddress(InvalidReason),

    /// Requested count outside `1..=max`
    #[error("Count must be between 1 and {max}, got {requested}")]
    InvalidCount { requested: u32, max: u32 },
}
