//! Asset moderation workflow.
//!
//! Guarded transitions:
//!
//! ```text
//! DRAFT --submit(owner)--> SUBMITTED --begin_review(system)--> PENDING_REVIEW
//! PENDING_REVIEW --approve(admin)--> APPROVED --publish(admin)--> PUBLISHED
//! PENDING_REVIEW --reject(admin)--> REJECTED
//! ```
//!
//! Every function here is a pure check that returns the next status or an
//! error; nothing is mutated, so a rejected request cannot leave partial
//! state behind. The admin override ([`override_status`]) is a separate
//! entry point that skips the table and must be audited by the caller.

use serde::{Deserialize, Serialize};

use crate::actor::ActorContext;
use crate::asset::AssetStatus;
use crate::error::CoreError;
use crate::types::DbId;

pub const ACTION_APPROVE: &str = "APPROVE";
pub const ACTION_REJECT: &str = "REJECT";

/// All valid moderation actions.
pub const VALID_ACTIONS: &[&str] = &[ACTION_APPROVE, ACTION_REJECT];

/// Decision an admin can take on an asset awaiting review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl ModerationAction {
    /// Parse an action name. Case-insensitive; anything else is an
    /// `InvalidAction`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_uppercase().as_str() {
            ACTION_APPROVE => Ok(Self::Approve),
            ACTION_REJECT => Ok(Self::Reject),
            _ => Err(CoreError::InvalidAction(format!(
                "Unknown moderation action '{s}'. Must be one of: {}",
                VALID_ACTIONS.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => ACTION_APPROVE,
            Self::Reject => ACTION_REJECT,
        }
    }

    /// Status the asset moves to when this action is applied.
    pub fn target_status(&self) -> AssetStatus {
        match self {
            Self::Approve => AssetStatus::Approved,
            Self::Reject => AssetStatus::Rejected,
        }
    }
}

/// Named edges of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Submit,
    BeginReview,
    Approve,
    Reject,
    Publish,
}

impl Transition {
    fn name(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::BeginReview => "begin review",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Publish => "publish",
        }
    }
}

impl From<ModerationAction> for Transition {
    fn from(action: ModerationAction) -> Self {
        match action {
            ModerationAction::Approve => Self::Approve,
            ModerationAction::Reject => Self::Reject,
        }
    }
}

/// The transition table, ignoring who is asking.
pub fn next_status(current: AssetStatus, transition: Transition) -> Result<AssetStatus, CoreError> {
    use AssetStatus::*;

    let next = match (current, transition) {
        (Draft, Transition::Submit) => Submitted,
        (Submitted, Transition::BeginReview) => PendingReview,
        (PendingReview, Transition::Approve) => Approved,
        (PendingReview, Transition::Reject) => Rejected,
        (Approved, Transition::Publish) => Published,
        _ => {
            return Err(CoreError::InvalidAction(format!(
                "Cannot {} an asset in status {current}",
                transition.name()
            )))
        }
    };
    Ok(next)
}

/// Owner (or admin) submits a draft for review.
pub fn submit(
    current: AssetStatus,
    owner_id: DbId,
    actor: &ActorContext,
) -> Result<AssetStatus, CoreError> {
    if !actor.is_owner_or_admin(owner_id) {
        return Err(CoreError::Forbidden(
            "Only the owner can submit this asset".into(),
        ));
    }
    next_status(current, Transition::Submit)
}

/// System step that immediately follows a submission.
pub fn begin_review(current: AssetStatus) -> Result<AssetStatus, CoreError> {
    next_status(current, Transition::BeginReview)
}

/// Admin approves or rejects an asset awaiting review.
///
/// The raw action string is parsed here so that an unknown action and a
/// wrong source status both surface as `InvalidAction`.
pub fn moderate(
    current: AssetStatus,
    action: &str,
    actor: &ActorContext,
) -> Result<(ModerationAction, AssetStatus), CoreError> {
    if !actor.is_admin {
        return Err(CoreError::Forbidden("Admin role required".into()));
    }
    let action = ModerationAction::parse(action)?;
    if current != AssetStatus::PendingReview {
        return Err(CoreError::InvalidAction(format!(
            "Asset must be {} to {}, but is {current}",
            AssetStatus::PendingReview,
            action.as_str()
        )));
    }
    let next = next_status(current, action.into())?;
    Ok((action, next))
}

/// Admin publishes an approved asset.
pub fn publish(current: AssetStatus, actor: &ActorContext) -> Result<AssetStatus, CoreError> {
    if !actor.is_admin {
        return Err(CoreError::Forbidden("Admin role required".into()));
    }
    next_status(current, Transition::Publish)
}

/// A status change made through the unguarded admin override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusOverride {
    pub from: AssetStatus,
    pub to: AssetStatus,
    /// Whether the same change was also reachable through the guarded table.
    pub bypassed_guard: bool,
}

/// Admin sets any status directly. Only the actor is checked.
pub fn override_status(
    current: AssetStatus,
    target: AssetStatus,
    actor: &ActorContext,
) -> Result<StatusOverride, CoreError> {
    if !actor.is_admin {
        return Err(CoreError::Forbidden("Admin role required".into()));
    }
    let bypassed_guard = !is_guarded_edge(current, target);
    Ok(StatusOverride {
        from: current,
        to: target,
        bypassed_guard,
    })
}

fn is_guarded_edge(from: AssetStatus, to: AssetStatus) -> bool {
    [
        Transition::Submit,
        Transition::BeginReview,
        Transition::Approve,
        Transition::Reject,
        Transition::Publish,
    ]
    .iter()
    .any(|t| next_status(from, *t).ok() == Some(to))
}

/// Owners may edit their listing only while it is still a draft.
pub fn owner_can_edit(status: AssetStatus) -> bool {
    status == AssetStatus::Draft
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
