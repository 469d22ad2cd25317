//! The raw client record as supplied by whatever loads the portfolio.
//!
//! Records are validated at construction: a negative balance is a caller
//! bug and is rejected, never coerced. Status strings outside the known
//! set deserialise to `Unknown` rather than failing the whole load.

use crate::{
    error::{CopilotError, CopilotResult},
    types::{ClientId, Days, Money, Years},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionFrequency {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

/// Holding status of a cross-sell product (SME loan, payroll).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductStatus {
    None,
    Active,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Active => "Active",
            Self::Unknown => "Unknown",
        })
    }
}

impl fmt::Display for TransactionFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Unknown => "Unknown",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: ClientId,
    /// Average giro (demand-deposit) balance in M.
    pub giro_balance: Money,
    pub txn_frequency: TransactionFrequency,
    pub sme_loan: ProductStatus,
    pub payroll: ProductStatus,
    pub tenure_years: Years,
    pub days_since_contact: Days,
    #[serde(default)]
    pub last_note: String,
}

impl ClientRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<ClientId>,
        giro_balance: Money,
        txn_frequency: TransactionFrequency,
        sme_loan: ProductStatus,
        payroll: ProductStatus,
        tenure_years: Years,
        days_since_contact: Days,
        last_note: impl Into<String>,
    ) -> CopilotResult<Self> {
        let record = Self {
            name: name.into(),
            giro_balance,
            txn_frequency,
            sme_loan,
            payroll,
            tenure_years,
            days_since_contact,
            last_note: last_note.into(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Re-check the construction invariants. Deserialised records bypass
    /// `new`, so ingestion calls this on every record.
    pub fn validate(&self) -> CopilotResult<()> {
        if self.name.trim().is_empty() {
            return Err(CopilotError::EmptyClientName);
        }
        if !self.giro_balance.is_finite() || self.giro_balance < 0.0 {
            return Err(CopilotError::NegativeAmount {
                field: "giro_balance",
                value: self.giro_balance,
            });
        }
        Ok(())
    }

    pub fn has_full_package(&self) -> bool {
        self.sme_loan == ProductStatus::Active && self.payroll == ProductStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_balance_rejected() {
        let err = ClientRecord::new(
            "PT. Maju Mundur",
            -1.0,
            TransactionFrequency::Low,
            ProductStatus::None,
            ProductStatus::None,
            3,
            7,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, CopilotError::NegativeAmount { field: "giro_balance", .. }));
    }

    #[test]
    fn nan_balance_rejected() {
        let result = ClientRecord::new(
            "PT. Maju Mundur",
            f64::NAN,
            TransactionFrequency::Low,
            ProductStatus::None,
            ProductStatus::None,
            3,
            7,
            "",
        );
        assert!(result.is_err());
    }

    #[test]
    fn blank_name_rejected() {
        let result = ClientRecord::new(
            "   ",
            100.0,
            TransactionFrequency::Low,
            ProductStatus::None,
            ProductStatus::None,
            3,
            7,
            "",
        );
        assert!(matches!(result, Err(CopilotError::EmptyClientName)));
    }

    #[test]
    fn unrecognised_status_deserialises_as_unknown() {
        let json = r#"{
            "name": "PT. Indo Makmur",
            "giro_balance": 2500,
            "txn_frequency": "Sometimes",
            "sme_loan": "Pending",
            "payroll": "Active",
            "tenure_years": 4,
            "days_since_contact": 12
        }"#;
        let record: ClientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sme_loan, ProductStatus::Unknown);
        assert_eq!(record.txn_frequency, TransactionFrequency::Unknown);
        assert_eq!(record.payroll, ProductStatus::Active);
        assert!(record.last_note.is_empty());
    }

    #[test]
    fn negative_tenure_fails_to_deserialise() {
        let json = r#"{
            "name": "PT. Indo Makmur",
            "giro_balance": 2500,
            "txn_frequency": "High",
            "sme_loan": "None",
            "payroll": "None",
            "tenure_years": -2,
            "days_since_contact": 12
        }"#;
        assert!(serde_json::from_str::<ClientRecord>(json).is_err());
    }
}
