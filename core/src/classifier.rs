//! Client classifier: raw attributes → opportunity tag, potential value,
//! loyalty tier.
//!
//! RULE: the output is a pure function of the record and the thresholds.
//! No state, no randomness, no logging on the hot path.
//!
//! Tag chain, first match wins:
//!   1. balance ≥ high giro  AND no SME loan  → TARGET_SME_LOAN  (70% of balance)
//!   2. balance ≥ medium giro AND no payroll  → TARGET_PAYROLL   (5% of balance)
//!   3. otherwise                             → MAINTAIN         (2% of balance)
//!
//! Loyalty tiers compare tenure with strict `>`: tenure equal to the
//! platinum cutoff is still Gold.

use crate::{
    client::{ClientRecord, ProductStatus},
    config::Thresholds,
    types::{Money, Years},
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SME_LOAN_POTENTIAL_RATE: f64 = 0.70;
pub const PAYROLL_POTENTIAL_RATE: f64 = 0.05;
pub const MAINTAIN_POTENTIAL_RATE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityTag {
    TargetSmeLoan,
    TargetPayroll,
    Maintain,
}

impl OpportunityTag {
    pub const ALL: [OpportunityTag; 3] = [Self::TargetSmeLoan, Self::TargetPayroll, Self::Maintain];

    /// True for every tag that steers an active pitch.
    pub fn is_target(self) -> bool {
        matches!(self, Self::TargetSmeLoan | Self::TargetPayroll)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TargetSmeLoan => "TARGET SME LOAN",
            Self::TargetPayroll => "TARGET PAYROLL",
            Self::Maintain => "MAINTAIN",
        }
    }

    fn potential_rate(self) -> f64 {
        match self {
            Self::TargetSmeLoan => SME_LOAN_POTENTIAL_RATE,
            Self::TargetPayroll => PAYROLL_POTENTIAL_RATE,
            Self::Maintain => MAINTAIN_POTENTIAL_RATE,
        }
    }
}

impl fmt::Display for OpportunityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoyaltyTier {
    Platinum,
    Gold,
    Silver,
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Platinum => "Platinum",
            Self::Gold => "Gold",
            Self::Silver => "Silver",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub tag: OpportunityTag,
    /// Estimated revenue in M, rounded to one decimal place.
    pub potential_value: Money,
    pub loyalty: LoyaltyTier,
}

/// A client record together with its derived fields.
/// Only `classify_client` builds one, so the fields cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedClient {
    #[serde(flatten)]
    pub record: ClientRecord,
    #[serde(flatten)]
    pub classification: Classification,
}

impl ClassifiedClient {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn tag(&self) -> OpportunityTag {
        self.classification.tag
    }

    pub fn potential_value(&self) -> Money {
        self.classification.potential_value
    }

    pub fn loyalty(&self) -> LoyaltyTier {
        self.classification.loyalty
    }
}

/// Precondition: `client.giro_balance >= 0` (enforced by `ClientRecord::validate`).
pub fn classify(client: &ClientRecord, thresholds: &Thresholds) -> Classification {
    let balance = client.giro_balance;

    let tag = if balance >= thresholds.high_value_giro && client.sme_loan == ProductStatus::None {
        OpportunityTag::TargetSmeLoan
    } else if balance >= thresholds.medium_value_giro && client.payroll == ProductStatus::None {
        OpportunityTag::TargetPayroll
    } else {
        OpportunityTag::Maintain
    };

    Classification {
        tag,
        potential_value: round_one_decimal(balance * tag.potential_rate()),
        loyalty: loyalty_tier(client.tenure_years, thresholds),
    }
}

pub fn classify_client(client: ClientRecord, thresholds: &Thresholds) -> ClassifiedClient {
    let classification = classify(&client, thresholds);
    ClassifiedClient { record: client, classification }
}

pub fn loyalty_tier(tenure_years: Years, thresholds: &Thresholds) -> LoyaltyTier {
    if tenure_years > thresholds.platinum_years {
        LoyaltyTier::Platinum
    } else if tenure_years > thresholds.gold_years {
        LoyaltyTier::Gold
    } else {
        LoyaltyTier::Silver
    }
}

/// Rounds the exact binary value to one decimal, halves to even.
/// Fixed-precision formatting does exactly that, so 50.25 becomes 50.2.
fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}
