pub mod alias_usage;

pub use alias_usage::*;
