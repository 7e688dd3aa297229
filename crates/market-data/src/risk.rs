//! Risk Heuristic
//!
//! Fixed-threshold classification derived purely from the 24h change
//! percentage. Total over finite inputs; Unknown only when the upstream
//! carried no usable change figure.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gateway::MarketData;

/// Risk classification bands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "HIGH Risk")]
    High,
    Unknown,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low Risk"),
            RiskLevel::Medium => write!(f, "Medium Risk"),
            RiskLevel::High => write!(f, "HIGH Risk"),
            RiskLevel::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Risk verdict for a coin
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,

    /// The 24h change the verdict was derived from (0 when unknown)
    pub volatility: f64,

    pub recommendation: String,

    pub reasoning: String,
}

/// Classify a 24h change percentage into a risk band.
///
/// Bands: |change| < 2 is Low, 2 <= |change| < 5 is Medium, |change| >= 5 is
/// High. A missing or non-finite change maps to Unknown with volatility
/// forced to 0.
pub fn classify_change(change: Option<f64>) -> RiskAssessment {
    match change {
        Some(change) if change.is_finite() => {
            let magnitude = change.abs();
            if magnitude < 2.0 {
                RiskAssessment {
                    risk_level: RiskLevel::Low,
                    recommendation: "HOLD or BUY".into(),
                    reasoning: "Price is stable with low volatility".into(),
                    volatility: change,
                }
            } else if magnitude < 5.0 {
                RiskAssessment {
                    risk_level: RiskLevel::Medium,
                    recommendation: "HOLD".into(),
                    reasoning: "Moderate volatility, watch closely".into(),
                    volatility: change,
                }
            } else {
                RiskAssessment {
                    risk_level: RiskLevel::High,
                    recommendation: "CAUTION".into(),
                    reasoning: "High volatility, risky for new positions".into(),
                    volatility: change,
                }
            }
        }
        _ => RiskAssessment {
            risk_level: RiskLevel::Unknown,
            recommendation: "DATA UNAVAILABLE".into(),
            reasoning: "Unable to determine risk due to missing price data".into(),
            volatility: 0.0,
        },
    }
}

/// Fetch the current price for a coin and classify its 24h change
pub async fn assess_risk(gateway: &dyn MarketData, coin: &str) -> Result<RiskAssessment> {
    let price = gateway.fetch_current_price(coin).await?;
    Ok(classify_change(price.usd_24h_change))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_price_is_low_risk() {
        let verdict = classify_change(Some(1.5));
        assert_eq!(verdict.risk_level, RiskLevel::Low);
        assert_eq!(verdict.recommendation, "HOLD or BUY");
        assert_eq!(verdict.volatility, 1.5);
    }

    #[test]
    fn moderate_swing_is_medium_risk() {
        assert_eq!(classify_change(Some(3.0)).risk_level, RiskLevel::Medium);
        assert_eq!(classify_change(Some(-3.0)).risk_level, RiskLevel::Medium);
        assert_eq!(classify_change(Some(2.0)).risk_level, RiskLevel::Medium);
    }

    #[test]
    fn large_swing_is_high_risk() {
        assert_eq!(classify_change(Some(7.2)).risk_level, RiskLevel::High);
        assert_eq!(classify_change(Some(-8.0)).risk_level, RiskLevel::High);
        // Boundary: exactly five percent lands in the high band
        assert_eq!(classify_change(Some(5.0)).risk_level, RiskLevel::High);
        assert_eq!(classify_change(Some(-5.0)).risk_level, RiskLevel::High);
    }

    #[test]
    fn missing_change_is_unknown() {
        let verdict = classify_change(None);
        assert_eq!(verdict.risk_level, RiskLevel::Unknown);
        assert_eq!(verdict.recommendation, "DATA UNAVAILABLE");
        assert_eq!(verdict.volatility, 0.0);
    }

    #[test]
    fn non_finite_change_is_unknown() {
        assert_eq!(classify_change(Some(f64::NAN)).risk_level, RiskLevel::Unknown);
        assert_eq!(
            classify_change(Some(f64::INFINITY)).risk_level,
            RiskLevel::Unknown
        );
    }

    #[test]
    fn risk_level_serializes_with_original_spelling() {
        let json = serde_json::to_string(&classify_change(Some(1.0))).unwrap();
        assert!(json.contains(r#""riskLevel":"Low Risk""#));
    }
}
