//! Domain model structs and DTOs.
//!
//! - `FromRow` + `Serialize` entity structs matching the database rows
//! - `Deserialize` + `Validate` create / update DTOs
//! - Listing filters and the resolved query passed to the store

pub mod asset;
