//! Repository layer.
//!
//! Each PostgreSQL repository is a zero-sized struct providing async
//! operations that accept `&PgPool` as the first argument. [`PgAssetStore`]
//! composes them behind [`crate::store::AssetStore`]; [`InMemoryAssetStore`]
//! implements the same trait without a database.

pub mod asset_repo;
pub mod audit_repo;
pub mod media_repo;
pub mod memory;
pub mod moderation_repo;
pub mod performance_repo;
pub mod pg_store;
pub mod verification_repo;

pub use asset_repo::AssetRepo;
pub use audit_repo::AuditRepo;
pub use media_repo::MediaRepo;
pub use memory::InMemoryAssetStore;
pub use moderation_repo::ModerationRepo;
pub use performance_repo::PerformanceRepo;
pub use pg_store::PgAssetStore;
pub use verification_repo::VerificationRepo;
