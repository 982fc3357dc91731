//! Gmail alias generation: address validation, canonicalization and the
//! tag / dot-insertion variant strategies.

pub mod address;
pub mod error;
pub mod generator;

pub use address::{validate, AliasCandidate, AliasKind, CanonicalIdentity, EmailAddress};
pub use error::{AliasError, InvalidReason};
pub use generator::{
    dot_variants, generate_tag, AliasGenerator, AliasPolicy, DotStrategy, DEFAULT_FOLDING_DOMAINS,
    MAX_QUOTA,
};
