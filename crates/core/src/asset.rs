//! Asset classification and lifecycle status enums.
//!
//! Both enums are persisted as their upper-case string form (the same form
//! used on the wire), so `as_str` / `from_str_value` are the single source
//! of truth for the database representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "DRAFT";
pub const STATUS_SUBMITTED: &str = "SUBMITTED";
pub const STATUS_PENDING_REVIEW: &str = "PENDING_REVIEW";
pub const STATUS_APPROVED: &str = "APPROVED";
pub const STATUS_REJECTED: &str = "REJECTED";
pub const STATUS_PUBLISHED: &str = "PUBLISHED";

/// All valid status strings, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_SUBMITTED,
    STATUS_PENDING_REVIEW,
    STATUS_APPROVED,
    STATUS_REJECTED,
    STATUS_PUBLISHED,
];

/// Lifecycle status of a listed asset. See [`crate::moderation`] for the
/// legal transitions between these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Draft,
    Submitted,
    PendingReview,
    Approved,
    Rejected,
    Published,
}

impl AssetStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_DRAFT => Ok(Self::Draft),
            STATUS_SUBMITTED => Ok(Self::Submitted),
            STATUS_PENDING_REVIEW => Ok(Self::PendingReview),
            STATUS_APPROVED => Ok(Self::Approved),
            STATUS_REJECTED => Ok(Self::Rejected),
            STATUS_PUBLISHED => Ok(Self::Published),
            _ => Err(CoreError::Validation(format!(
                "Invalid asset status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::Submitted => STATUS_SUBMITTED,
            Self::PendingReview => STATUS_PENDING_REVIEW,
            Self::Approved => STATUS_APPROVED,
            Self::Rejected => STATUS_REJECTED,
            Self::Published => STATUS_PUBLISHED,
        }
    }

    /// Only published assets are visible to the general public.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AssetStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_value(&value)
    }
}

// ---------------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------------

pub const TYPE_SAAS: &str = "SAAS";
pub const TYPE_WEBSITE: &str = "WEBSITE";
pub const TYPE_MARKETPLACE: &str = "MARKETPLACE";
pub const TYPE_NEWSLETTER: &str = "NEWSLETTER";
pub const TYPE_APP: &str = "APP";
pub const TYPE_OTHER: &str = "OTHER";

/// All valid asset type strings.
pub const VALID_TYPES: &[&str] = &[
    TYPE_SAAS,
    TYPE_WEBSITE,
    TYPE_MARKETPLACE,
    TYPE_NEWSLETTER,
    TYPE_APP,
    TYPE_OTHER,
];

/// Kind of business being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Saas,
    Website,
    Marketplace,
    Newsletter,
    App,
    Other,
}

impl AssetType {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            TYPE_SAAS => Ok(Self::Saas),
            TYPE_WEBSITE => Ok(Self::Website),
            TYPE_MARKETPLACE => Ok(Self::Marketplace),
            TYPE_NEWSLETTER => Ok(Self::Newsletter),
            TYPE_APP => Ok(Self::App),
            TYPE_OTHER => Ok(Self::Other),
            _ => Err(CoreError::Validation(format!(
                "Invalid asset type '{s}'. Must be one of: {}",
                VALID_TYPES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saas => TYPE_SAAS,
            Self::Website => TYPE_WEBSITE,
            Self::Marketplace => TYPE_MARKETPLACE,
            Self::Newsletter => TYPE_NEWSLETTER,
            Self::App => TYPE_APP,
            Self::Other => TYPE_OTHER,
        }
    }

    /// Types that are expected to be reachable at a public URL.
    pub fn expects_website(&self) -> bool {
        matches!(self, Self::Saas | Self::Website | Self::App)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AssetType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_roundtrip_for_every_variant() {
        for s in VALID_STATUSES {
            assert_eq!(AssetStatus::from_str_value(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn unknown_status_rejected() {
        let err = AssetStatus::from_str_value("LIVE").unwrap_err();
        assert!(err.to_string().contains("Invalid asset status"));
    }

    #[test]
    fn lowercase_status_rejected() {
        assert!(AssetStatus::from_str_value("draft").is_err());
    }

    #[test]
    fn only_published_is_public() {
        assert!(AssetStatus::Published.is_public());
        assert!(!AssetStatus::Approved.is_public());
        assert!(!AssetStatus::Draft.is_public());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&AssetStatus::PendingReview).unwrap();
        assert_eq!(json, "\"PENDING_REVIEW\"");
        let parsed: AssetType = serde_json::from_str("\"SAAS\"").unwrap();
        assert_eq!(parsed, AssetType::Saas);
    }

    #[test]
    fn website_expected_for_saas_website_app() {
        assert!(AssetType::Saas.expects_website());
        assert!(AssetType::Website.expects_website());
        assert!(AssetType::App.expects_website());
        assert!(!AssetType::Newsletter.expects_website());
        assert!(!AssetType::Marketplace.expects_website());
        assert!(!AssetType::Other.expects_website());
    }
}
