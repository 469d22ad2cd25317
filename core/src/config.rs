//! Threshold configuration.
//!
//! RULE: every cutoff a rule compares against lives here or as a named
//! constant beside the rule. Nothing is read from the environment.
//! The config is read-only once a portfolio has been ingested.

use crate::{
    error::{CopilotError, CopilotResult},
    types::{Days, Money, Years},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Balance at or above which a client without an SME loan is an SME target.
    pub high_value_giro: Money,
    /// Balance at or above which a client without payroll is a payroll target.
    pub medium_value_giro: Money,
    pub contact_warning_days: Days,
    pub contact_critical_days: Days,
    pub loyal_client_years: Years,
    pub platinum_years: Years,
    pub gold_years: Years,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_value_giro: 2000.0,
            medium_value_giro: 1000.0,
            contact_warning_days: 30,
            contact_critical_days: 90,
            loyal_client_years: 10,
            platinum_years: 15,
            gold_years: 5,
        }
    }
}

impl Thresholds {
    /// Reject orderings under which the rule chains stop making sense.
    pub fn validate(&self) -> CopilotResult<()> {
        let invalid = |reason: String| Err(CopilotError::InvalidThresholds { reason });

        if !self.high_value_giro.is_finite() || !self.medium_value_giro.is_finite() {
            return invalid("giro cutoffs must be finite".into());
        }
        if self.medium_value_giro < 0.0 {
            return invalid(format!(
                "medium_value_giro {} is negative",
                self.medium_value_giro
            ));
        }
        if self.medium_value_giro > self.high_value_giro {
            return invalid(format!(
                "medium_value_giro {} exceeds high_value_giro {}",
                self.medium_value_giro, self.high_value_giro
            ));
        }
        if self.gold_years > self.platinum_years {
            return invalid(format!(
                "gold_years {} exceeds platinum_years {}",
                self.gold_years, self.platinum_years
            ));
        }
        if self.contact_warning_days > self.contact_critical_days {
            return invalid(format!(
                "contact_warning_days {} exceeds contact_critical_days {}",
                self.contact_warning_days, self.contact_critical_days
            ));
        }
        Ok(())
    }
}

/// The relationship manager signing outgoing messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorProfile {
    pub name: String,
    pub branch: String,
    pub phone: String,
}

impl Default for OperatorProfile {
    fn default() -> Self {
        Self {
            name: "Budi Santoso".into(),
            branch: "Tangerang BSD".into(),
            phone: "0812-3456-7890".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopilotConfig {
    pub thresholds: Thresholds,
    pub operator: OperatorProfile,
    /// Histogram edges for the giro balance distribution.
    pub giro_bins: Vec<Money>,
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            operator: OperatorProfile::default(),
            giro_bins: vec![0.0, 1000.0, 2000.0, 5000.0, 10000.0],
        }
    }
}

impl CopilotConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    /// In tests, use CopilotConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)?;
        log::info!("config: loaded thresholds from {path}");
        Ok(config)
    }

    pub fn from_json(content: &str) -> CopilotResult<Self> {
        let config: CopilotConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CopilotResult<()> {
        self.thresholds.validate()?;
        if self.giro_bins.len() < 2 {
            return Err(CopilotError::InvalidThresholds {
                reason: "giro_bins needs at least two edges".into(),
            });
        }
        let increasing = self
            .giro_bins
            .windows(2)
            .all(|w| w[0].partial_cmp(&w[1]) == Some(std::cmp::Ordering::Less));
        if !increasing {
            return Err(CopilotError::InvalidThresholds {
                reason: format!("giro_bins must be strictly increasing: {:?}", self.giro_bins),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_branch_policy() {
        let t = Thresholds::default();
        assert_eq!(t.high_value_giro, 2000.0);
        assert_eq!(t.medium_value_giro, 1000.0);
        assert_eq!(t.contact_warning_days, 30);
        assert_eq!(t.contact_critical_days, 90);
        assert_eq!(t.loyal_client_years, 10);
        assert_eq!(t.platinum_years, 15);
        assert_eq!(t.gold_years, 5);
        assert!(CopilotConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            CopilotConfig::from_json(r#"{ "thresholds": { "high_value_giro": 3000 } }"#).unwrap();
        assert_eq!(config.thresholds.high_value_giro, 3000.0);
        assert_eq!(config.thresholds.medium_value_giro, 1000.0);
        assert_eq!(config.operator.branch, "Tangerang BSD");
        assert_eq!(config.giro_bins.len(), 5);
    }

    #[test]
    fn inverted_giro_cutoffs_rejected() {
        let err = CopilotConfig::from_json(
            r#"{ "thresholds": { "high_value_giro": 500, "medium_value_giro": 1000 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CopilotError::InvalidThresholds { .. }));
    }

    #[test]
    fn unsorted_bins_rejected() {
        let err = CopilotConfig::from_json(r#"{ "giro_bins": [0, 2000, 1000] }"#).unwrap_err();
        assert!(matches!(err, CopilotError::InvalidThresholds { .. }));
    }
}
