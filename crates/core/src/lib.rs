//! Pure domain logic for the asset marketplace.
//!
//! Nothing in this crate performs I/O. Valuation, verification, moderation
//! transitions, and slug derivation are all plain functions over values
//! handed in by the caller, so the db and api layers can share them.

pub mod actor;
pub mod asset;
pub mod audit;
pub mod error;
pub mod moderation;
pub mod roles;
pub mod slug;
pub mod types;
pub mod valuation;
pub mod verification;
