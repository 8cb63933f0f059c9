//! Data-quality and pricing-sanity flags for a listed asset.
//!
//! [`run_checks`] evaluates every rule independently against a snapshot of
//! the asset and returns all flags that fire, always in the same order.
//! The result replaces whatever was stored before; flags never accumulate.

use serde::{Deserialize, Serialize};

use crate::asset::AssetType;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Asking price above `suggested_max * ABOVE_SUGGESTED_FACTOR` is flagged.
pub const ABOVE_SUGGESTED_FACTOR: f64 = 1.5;

/// Asking price below `suggested_min * BELOW_SUGGESTED_FACTOR` is flagged.
pub const BELOW_SUGGESTED_FACTOR: f64 = 0.5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Stable identifier of a verification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagCode {
    PriceAboveSuggested,
    PriceBelowSuggested,
    MissingFinancials,
    MissingProof,
    MissingWebsite,
}

impl FlagCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAboveSuggested => "PRICE_ABOVE_SUGGESTED",
            Self::PriceBelowSuggested => "PRICE_BELOW_SUGGESTED",
            Self::MissingFinancials => "MISSING_FINANCIALS",
            Self::MissingProof => "MISSING_PROOF",
            Self::MissingWebsite => "MISSING_WEBSITE",
        }
    }

    /// Fixed severity for each rule.
    pub fn severity(&self) -> Severity {
        match self {
            Self::PriceAboveSuggested => Severity::Medium,
            Self::PriceBelowSuggested => Severity::Low,
            Self::MissingFinancials => Severity::High,
            Self::MissingProof => Severity::Medium,
            Self::MissingWebsite => Severity::Low,
        }
    }
}

/// How prominently a flag should be surfaced. Does not affect workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A single emitted flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationFlag {
    pub code: FlagCode,
    pub message: String,
    pub severity: Severity,
}

impl VerificationFlag {
    fn new(code: FlagCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: code.severity(),
        }
    }
}

/// The slice of asset state the rules look at.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationSnapshot {
    pub asset_type: AssetType,
    pub asking_price: f64,
    pub suggested_min_price: Option<f64>,
    pub suggested_max_price: Option<f64>,
    pub monthly_revenue: Option<f64>,
    pub monthly_profit: Option<f64>,
    pub mrr: Option<f64>,
    pub media_count: i64,
    pub website_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Evaluate every rule against `snapshot`, in declaration order.
pub fn run_checks(snapshot: &VerificationSnapshot) -> Vec<VerificationFlag> {
    let mut flags = Vec::new();

    if let Some(max) = snapshot.suggested_max_price {
        if snapshot.asking_price > max * ABOVE_SUGGESTED_FACTOR {
            flags.push(VerificationFlag::new(
                FlagCode::PriceAboveSuggested,
                format!(
                    "Asking price {:.2} is more than {ABOVE_SUGGESTED_FACTOR}x the suggested maximum of {max:.2}",
                    snapshot.asking_price
                ),
            ));
        }
    }

    if let Some(min) = snapshot.suggested_min_price {
        if snapshot.asking_price < min * BELOW_SUGGESTED_FACTOR {
            flags.push(VerificationFlag::new(
                FlagCode::PriceBelowSuggested,
                format!(
                    "Asking price {:.2} is less than {BELOW_SUGGESTED_FACTOR}x the suggested minimum of {min:.2}",
                    snapshot.asking_price
                ),
            ));
        }
    }

    if snapshot.monthly_revenue.is_none()
        && snapshot.monthly_profit.is_none()
        && snapshot.mrr.is_none()
    {
        flags.push(VerificationFlag::new(
            FlagCode::MissingFinancials,
            "No revenue, profit or MRR figures have been provided",
        ));
    }

    if snapshot.media_count == 0 {
        flags.push(VerificationFlag::new(
            FlagCode::MissingProof,
            "No screenshots or proof documents have been attached",
        ));
    }

    let has_website = snapshot
        .website_url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty());
    if snapshot.asset_type.expects_website() && !has_website {
        flags.push(VerificationFlag::new(
            FlagCode::MissingWebsite,
            format!("{} listings should include a public website URL", snapshot.asset_type),
        ));
    }

    flags
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// A snapshot that triggers no rules.
    fn clean() -> VerificationSnapshot {
        VerificationSnapshot {
            asset_type: AssetType::Saas,
            asking_price: 500_000.0,
            suggested_min_price: Some(479_400.0),
            suggested_max_price: Some(648_600.0),
            monthly_revenue: Some(10_000.0),
            monthly_profit: Some(2_500.0),
            mrr: Some(10_000.0),
            media_count: 3,
            website_url: Some("https://example.com".to_string()),
        }
    }

    fn codes(flags: &[VerificationFlag]) -> Vec<FlagCode> {
        flags.iter().map(|f| f.code).collect()
    }

    #[test]
    fn clean_snapshot_has_no_flags() {
        assert!(run_checks(&clean()).is_empty());
    }

    #[test]
    fn price_far_above_suggested_is_flagged() {
        let snap = VerificationSnapshot {
            asking_price: 1_000_000.0,
            suggested_min_price: Some(200_000.0),
            suggested_max_price: Some(300_000.0),
            ..clean()
        };
        let flags = run_checks(&snap);
        assert_eq!(codes(&flags), vec![FlagCode::PriceAboveSuggested]);
        assert_eq!(flags[0].severity, Severity::Medium);
    }

    #[test]
    fn price_exactly_at_threshold_not_flagged() {
        let snap = VerificationSnapshot {
            asking_price: 450_000.0,
            suggested_min_price: Some(200_000.0),
            suggested_max_price: Some(300_000.0),
            ..clean()
        };
        assert!(run_checks(&snap).is_empty());
    }

    #[test]
    fn price_far_below_suggested_is_flagged() {
        let snap = VerificationSnapshot {
            asking_price: 100_000.0,
            ..clean()
        };
        let flags = run_checks(&snap);
        assert_eq!(codes(&flags), vec![FlagCode::PriceBelowSuggested]);
        assert_eq!(flags[0].severity, Severity::Low);
    }

    #[test]
    fn no_suggested_range_skips_price_rules() {
        let snap = VerificationSnapshot {
            asking_price: 99_000_000.0,
            suggested_min_price: None,
            suggested_max_price: None,
            ..clean()
        };
        assert!(run_checks(&snap).is_empty());
    }

    #[test]
    fn missing_financials_is_high_severity() {
        let snap = VerificationSnapshot {
            suggested_min_price: None,
            suggested_max_price: None,
            monthly_revenue: None,
            monthly_profit: None,
            mrr: None,
            ..clean()
        };
        let flags = run_checks(&snap);
        assert_eq!(codes(&flags), vec![FlagCode::MissingFinancials]);
        assert_eq!(flags[0].severity, Severity::High);
    }

    #[test]
    fn any_one_financial_field_is_enough() {
        let snap = VerificationSnapshot {
            monthly_revenue: None,
            monthly_profit: Some(100.0),
            mrr: None,
            ..clean()
        };
        assert!(!codes(&run_checks(&snap)).contains(&FlagCode::MissingFinancials));
    }

    #[test]
    fn no_media_is_missing_proof() {
        let snap = VerificationSnapshot {
            media_count: 0,
            ..clean()
        };
        assert_eq!(codes(&run_checks(&snap)), vec![FlagCode::MissingProof]);
    }

    #[test]
    fn missing_website_only_for_url_types() {
        let saas = VerificationSnapshot {
            website_url: None,
            ..clean()
        };
        assert_eq!(codes(&run_checks(&saas)), vec![FlagCode::MissingWebsite]);

        let newsletter = VerificationSnapshot {
            asset_type: AssetType::Newsletter,
            website_url: None,
            ..clean()
        };
        assert!(run_checks(&newsletter).is_empty());
    }

    #[test]
    fn blank_website_counts_as_missing() {
        let snap = VerificationSnapshot {
            asset_type: AssetType::App,
            website_url: Some("   ".to_string()),
            ..clean()
        };
        assert_eq!(codes(&run_checks(&snap)), vec![FlagCode::MissingWebsite]);
    }

    #[test]
    fn flags_emitted_in_declaration_order() {
        let snap = VerificationSnapshot {
            asset_type: AssetType::Website,
            asking_price: 10_000_000.0,
            suggested_min_price: Some(100.0),
            suggested_max_price: Some(200.0),
            monthly_revenue: None,
            monthly_profit: None,
            mrr: None,
            media_count: 0,
            website_url: None,
        };
        assert_eq!(
            codes(&run_checks(&snap)),
            vec![
                FlagCode::PriceAboveSuggested,
                FlagCode::MissingFinancials,
                FlagCode::MissingProof,
                FlagCode::MissingWebsite,
            ]
        );
    }

    #[test]
    fn running_twice_yields_identical_flags() {
        let snap = VerificationSnapshot {
            media_count: 0,
            website_url: None,
            ..clean()
        };
        assert_eq!(run_checks(&snap), run_checks(&snap));
    }

    #[test]
    fn flag_code_serializes_screaming_snake() {
        let json = serde_json::to_value(VerificationFlag::new(FlagCode::MissingProof, "x")).unwrap();
        assert_eq!(json["code"], "MISSING_PROOF");
        assert_eq!(json["severity"], "medium");
        assert_eq!(FlagCode::MissingProof.as_str(), "MISSING_PROOF");
    }

    mod properties {
        use proptest::prelude::*;

        use super::super::*;

        prop_compose! {
            fn any_snapshot()(
                type_idx in 0usize..6,
                asking_price in 1.0f64..10_000_000.0,
                min in prop::option::of(1.0f64..5_000_000.0),
                max in prop::option::of(1.0f64..5_000_000.0),
                monthly_revenue in prop::option::of(0.0f64..1_000_000.0),
                monthly_profit in prop::option::of(-100_000.0f64..1_000_000.0),
                mrr in prop::option::of(0.0f64..1_000_000.0),
                media_count in 0i64..5,
                has_url in any::<bool>(),
            ) -> VerificationSnapshot {
                let types = [
                    AssetType::Saas,
                    AssetType::Website,
                    AssetType::Marketplace,
                    AssetType::Newsletter,
                    AssetType::App,
                    AssetType::Other,
                ];
                VerificationSnapshot {
                    asset_type: types[type_idx],
                    asking_price,
                    suggested_min_price: min,
                    suggested_max_price: max,
                    monthly_revenue,
                    monthly_profit,
                    mrr,
                    media_count,
                    website_url: has_url.then(|| "https://example.com".to_string()),
                }
            }
        }

        proptest! {
            #[test]
            fn checks_are_idempotent(snap in any_snapshot()) {
                prop_assert_eq!(run_checks(&snap), run_checks(&snap));
            }

            #[test]
            fn no_duplicate_codes(snap in any_snapshot()) {
                let flags = run_checks(&snap);
                let mut seen = std::collections::HashSet::new();
                for flag in &flags {
                    prop_assert!(seen.insert(flag.code));
                }
            }
        }
    }
}
