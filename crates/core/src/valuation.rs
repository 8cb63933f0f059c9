//! Advisory price range from an asset's financial inputs.
//!
//! The model starts from a base revenue multiple and adds half of a bucket
//! score for each of five signals (revenue scale, growth, churn, margin and
//! LTV/CAC efficiency). The multiple is clamped to `[1.0, 15.0]` and applied
//! to annualized revenue; the suggested range is a ±15% band around that
//! point estimate.
//!
//! [`compute_valuation`] returns `None` when there is no revenue basis.
//! Callers must treat that as "valuation unavailable", never as zero.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Multiple every valuation starts from.
pub const BASE_MULTIPLE: f64 = 3.0;

/// Each bucket score contributes this fraction of itself to the multiple.
pub const BUCKET_WEIGHT: f64 = 0.5;

/// Lower clamp for the final multiple.
pub const MIN_MULTIPLE: f64 = 1.0;

/// Upper clamp for the final multiple.
pub const MAX_MULTIPLE: f64 = 15.0;

/// Half-width of the advisory band around the point valuation.
pub const BAND_WIDTH: f64 = 0.15;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Financial inputs to the valuation model. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    pub monthly_recurring_revenue: Option<f64>,
    pub trailing_twelve_month_revenue: Option<f64>,
    pub trailing_twelve_month_profit: Option<f64>,
    pub annual_growth_rate_percent: Option<f64>,
    pub monthly_churn_rate_percent: Option<f64>,
    pub lifetime_value: Option<f64>,
    pub customer_acquisition_cost: Option<f64>,
}

/// The signal an adjustment was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationFactor {
    RevenueScale,
    Growth,
    Churn,
    Profitability,
    Efficiency,
}

impl ValuationFactor {
    /// Label used in the explanation string.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RevenueScale => "revenue scale",
            Self::Growth => "growth",
            Self::Churn => "churn",
            Self::Profitability => "profit margin",
            Self::Efficiency => "LTV/CAC",
        }
    }
}

/// One adjustment that moved the multiple away from the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub factor: ValuationFactor,
    /// Raw bucket score before weighting.
    pub bucket: f64,
    /// `bucket * BUCKET_WEIGHT`, the amount added to the multiple.
    pub contribution: f64,
}

/// Result of a successful valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub multiple: f64,
    pub annualized_revenue: f64,
    pub point_valuation: f64,
    pub suggested_min: f64,
    pub suggested_max: f64,
    /// Adjustments with a non-zero bucket, in evaluation order.
    pub adjustments: Vec<Adjustment>,
    /// Human-readable itemization of the adjustments, for audit and display.
    pub explanation: String,
}

// ---------------------------------------------------------------------------
// Bucket functions
// ---------------------------------------------------------------------------

/// Bucket annualized revenue by scale.
pub fn revenue_bucket(annualized_revenue: f64) -> f64 {
    if annualized_revenue > 1_000_000.0 {
        1.5
    } else if annualized_revenue > 500_000.0 {
        1.0
    } else if annualized_revenue > 100_000.0 {
        0.5
    } else {
        0.0
    }
}

/// Bucket annual growth rate (percent).
pub fn growth_bucket(growth_percent: f64) -> f64 {
    if growth_percent > 100.0 {
        2.0
    } else if growth_percent > 50.0 {
        1.5
    } else if growth_percent > 30.0 {
        1.0
    } else if growth_percent > 20.0 {
        0.5
    } else {
        0.0
    }
}

/// Bucket monthly churn (percent). First matching rule wins.
pub fn churn_bucket(churn_percent: f64) -> f64 {
    if churn_percent == 0.0 {
        1.5
    } else if churn_percent < 2.0 {
        1.0
    } else if churn_percent < 5.0 {
        0.5
    } else if churn_percent > 15.0 {
        -1.0
    } else if churn_percent > 10.0 {
        -0.5
    } else {
        0.0
    }
}

/// Bucket profit margin (percent).
pub fn margin_bucket(margin_percent: f64) -> f64 {
    if margin_percent > 30.0 {
        1.0
    } else if margin_percent > 20.0 {
        0.7
    } else if margin_percent > 10.0 {
        0.4
    } else if margin_percent < 0.0 {
        -0.5
    } else {
        0.0
    }
}

/// Bucket the LTV/CAC ratio.
pub fn efficiency_bucket(ratio: f64) -> f64 {
    if ratio > 5.0 {
        1.0
    } else if ratio > 3.0 {
        0.7
    } else if ratio > 2.0 {
        0.4
    } else if ratio < 1.0 {
        -0.5
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Non-finite inputs are treated as absent.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn positive(value: Option<f64>) -> Option<f64> {
    finite(value).filter(|v| *v > 0.0)
}

/// Annualized revenue: MRR x 12 when MRR is positive, else trailing twelve
/// month revenue when that is positive.
pub fn annualized_revenue(input: &ValuationInput) -> Option<f64> {
    positive(input.monthly_recurring_revenue)
        .map(|mrr| mrr * 12.0)
        .or_else(|| positive(input.trailing_twelve_month_revenue))
}

/// Compute the advisory valuation, or `None` when no revenue basis exists
/// or the result overflows `f64`.
pub fn compute_valuation(input: &ValuationInput) -> Option<Valuation> {
    let annualized_revenue = annualized_revenue(input).filter(|r| r.is_finite())?;

    let mut adjustments = Vec::new();
    let mut push = |factor: ValuationFactor, bucket: f64| {
        if bucket != 0.0 {
            adjustments.push(Adjustment {
                factor,
                bucket,
                contribution: bucket * BUCKET_WEIGHT,
            });
        }
    };

    push(
        ValuationFactor::RevenueScale,
        revenue_bucket(annualized_revenue),
    );

    if let Some(growth) = finite(input.annual_growth_rate_percent) {
        push(ValuationFactor::Growth, growth_bucket(growth));
    }

    if let Some(churn) = finite(input.monthly_churn_rate_percent) {
        push(ValuationFactor::Churn, churn_bucket(churn));
    }

    if let (Some(profit), Some(revenue)) = (
        finite(input.trailing_twelve_month_profit),
        positive(input.trailing_twelve_month_revenue),
    ) {
        push(
            ValuationFactor::Profitability,
            margin_bucket(profit / revenue * 100.0),
        );
    }

    if let (Some(ltv), Some(cac)) = (
        positive(input.lifetime_value),
        positive(input.customer_acquisition_cost),
    ) {
        push(ValuationFactor::Efficiency, efficiency_bucket(ltv / cac));
    }

    let raw_multiple =
        BASE_MULTIPLE + adjustments.iter().map(|a| a.contribution).sum::<f64>();
    let multiple = raw_multiple.clamp(MIN_MULTIPLE, MAX_MULTIPLE);

    let point_valuation = annualized_revenue * multiple;
    let suggested_min = point_valuation * (1.0 - BAND_WIDTH);
    let suggested_max = point_valuation * (1.0 + BAND_WIDTH);
    if !suggested_max.is_finite() {
        return None;
    }

    let explanation = explain(&adjustments, raw_multiple, multiple, annualized_revenue);

    Some(Valuation {
        multiple,
        annualized_revenue,
        point_valuation,
        suggested_min,
        suggested_max,
        adjustments,
        explanation,
    })
}

fn explain(
    adjustments: &[Adjustment],
    raw_multiple: f64,
    multiple: f64,
    annualized_revenue: f64,
) -> String {
    let mut parts = vec![format!("base {BASE_MULTIPLE:.2}x")];
    for adj in adjustments {
        parts.push(format!("{} {:+.2}x", adj.factor.label(), adj.contribution));
    }

    let mut text = format!(
        "{:.2}x multiple on annualized revenue of {annualized_revenue:.2} ({})",
        multiple,
        parts.join(", ")
    );
    if raw_multiple != multiple {
        text.push_str(&format!("; clamped from {raw_multiple:.2}x"));
    }
    text.push_str(&format!(
        "; range is ±{:.0}% of the point estimate",
        BAND_WIDTH * 100.0
    ));
    text
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
