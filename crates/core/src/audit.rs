//! Audit trail action names.
//!
//! Lives in `core` so the store implementations and the orchestrator agree
//! on the strings written to `asset_audit_log.action`.

/// Known action types for asset audit entries.
pub mod action_types {
    /// Guarded approve/reject through the moderation workflow.
    pub const MODERATE: &str = "moderate";
    /// Approved asset made public.
    pub const PUBLISH: &str = "publish";
    /// Admin set the status directly, outside the transition table.
    pub const STATUS_OVERRIDE: &str = "status_override";
}
