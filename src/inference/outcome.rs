//! Fixed user-facing result messages.

use serde::Serialize;

use crate::error::{GuardianError, Result};

/// Shown with every result.
pub const DISCLAIMER: &str =
    "This tool provides estimates, not medical diagnoses. Always consult with healthcare professionals.";

pub const FOOTER: &str = "Heart Health Guardian | This tool is for informational purposes only | Not a substitute for professional medical advice";

/// Heart-health tips listed under every result (title, body).
pub const HEALTH_TIPS: [(&str, &str); 5] = [
    (
        "Eat heart-healthy foods",
        "Focus on fruits, vegetables, whole grains, and lean proteins",
    ),
    (
        "Stay active",
        "Aim for at least 150 minutes of moderate exercise per week",
    ),
    (
        "Manage stress",
        "Practice relaxation techniques like meditation or deep breathing",
    ),
    (
        "Regular check-ups",
        "Visit your doctor for annual physicals and screenings",
    ),
    (
        "Avoid smoking",
        "Smoking significantly increases heart disease risk",
    ),
];

/// The two possible screening results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskOutcome {
    /// Label 0.
    NoRiskIndicators,
    /// Label 1.
    RiskIndicators,
}

impl RiskOutcome {
    pub fn from_label(label: u8) -> Result<Self> {
        match label {
            0 => Ok(RiskOutcome::NoRiskIndicators),
            1 => Ok(RiskOutcome::RiskIndicators),
            other => Err(GuardianError::Internal(format!(
                "classifier returned label {other}, expected 0 or 1"
            ))),
        }
    }

    pub fn label(&self) -> u8 {
        match self {
            RiskOutcome::NoRiskIndicators => 0,
            RiskOutcome::RiskIndicators => 1,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            RiskOutcome::NoRiskIndicators => "Healthy Heart Indicators",
            RiskOutcome::RiskIndicators => "Potential Risk Detected",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            RiskOutcome::NoRiskIndicators => {
                "Our analysis shows no significant signs of heart disease based on your inputs."
            }
            RiskOutcome::RiskIndicators => {
                "Our analysis indicates possible signs of heart disease based on your inputs."
            }
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RiskOutcome::NoRiskIndicators => {
                "Continue maintaining a heart-healthy lifestyle with regular exercise and balanced nutrition."
            }
            RiskOutcome::RiskIndicators => {
                "This doesn't replace professional medical advice. We recommend consulting a cardiologist for a comprehensive evaluation."
            }
        }
    }

    pub fn closing(&self) -> &'static str {
        match self {
            RiskOutcome::NoRiskIndicators => "Keep up the good work!",
            RiskOutcome::RiskIndicators => "Your heart matters - take action today.",
        }
    }

    pub fn is_risk(&self) -> bool {
        matches!(self, RiskOutcome::RiskIndicators)
    }
}

impl std::fmt::Display for RiskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.headline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_outcomes() {
        assert_eq!(RiskOutcome::from_label(0).unwrap(), RiskOutcome::NoRiskIndicators);
        assert_eq!(RiskOutcome::from_label(1).unwrap(), RiskOutcome::RiskIndicators);
        assert!(RiskOutcome::from_label(2).is_err());
        assert_eq!(RiskOutcome::RiskIndicators.label(), 1);
    }

    #[test]
    fn each_outcome_carries_its_own_message() {
        let (a, b) = (RiskOutcome::NoRiskIndicators, RiskOutcome::RiskIndicators);
        assert_ne!(a.headline(), b.headline());
        assert!(b.advice().contains("doesn't replace professional medical advice"));
        assert!(DISCLAIMER.contains("not medical diagnoses"));
        assert_eq!(
            serde_json::to_string(&b).unwrap(),
            "\"risk_indicators\""
        );
    }
}
