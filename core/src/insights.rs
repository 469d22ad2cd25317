//! Rule-based client insights and red flags.
//!
//! These are fixed rules over one classified client; the wording is
//! rendered by `Display` so callers can localise by matching on variants.

use crate::{
    classifier::{ClassifiedClient, OpportunityTag, PAYROLL_POTENTIAL_RATE, SME_LOAN_POTENTIAL_RATE},
    client::{ProductStatus, TransactionFrequency},
    config::Thresholds,
    types::{Days, Money, Years},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tenure above which a silent client counts as a neglected VIP.
pub const VIP_TENURE_YEARS: Years = 15;
pub const VIP_CONTACT_DAYS: Days = 60;
pub const SIX_MONTHS_DAYS: Days = 180;
pub const THREE_MONTHS_DAYS: Days = 90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    LiquidityCritical { balance: Money },
    LiquidityWarning { balance: Money },
    WorkingCapitalOpportunity { estimate: Money },
    PayrollCrossSell { monthly_fee: Money },
    HealthyActivity,
    ChurnRisk,
    ActionPlan { tag: OpportunityTag },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiquidityCritical { balance } => write!(
                f,
                "CRITICAL: giro balance {balance}M is idle cash; high risk of it moving to a lender"
            ),
            Self::LiquidityWarning { balance } => write!(
                f,
                "WARNING: giro balance {balance}M is high; room to deepen the relationship"
            ),
            Self::WorkingCapitalOpportunity { estimate } => write!(
                f,
                "OPPORTUNITY: estimated working-capital need ~{estimate:.1}M; \
                 pitch a 12-24 month facility"
            ),
            Self::PayrollCrossSell { monthly_fee } => write!(
                f,
                "CROSS-SELL: no active payroll; potential fee revenue {monthly_fee:.1}M/month"
            ),
            Self::HealthyActivity => f.write_str(
                "BEHAVIOUR: high transaction frequency indicates healthy business activity",
            ),
            Self::ChurnRisk => f.write_str(
                "CHURN RISK: low transaction frequency; \
                 check whether the client moved volume elsewhere",
            ),
            Self::ActionPlan { tag } => match tag {
                OpportunityTag::TargetSmeLoan => f.write_str(
                    "ACTION: schedule a working-capital loan presentation with a competitive rate",
                ),
                OpportunityTag::TargetPayroll => {
                    f.write_str("ACTION: contact HR to pitch payroll processing")
                }
                OpportunityTag::Maintain => f.write_str("ACTION: routine monitoring"),
            },
        }
    }
}

/// Ordered insights for one client. An empty list means the client is
/// stable and needs routine monitoring only.
pub fn analyse(client: &ClassifiedClient, t: &Thresholds) -> Vec<Insight> {
    let r = &client.record;
    let balance = r.giro_balance;
    let mut insights = Vec::new();

    if balance >= t.high_value_giro {
        insights.push(Insight::LiquidityCritical { balance });
    } else if balance >= t.medium_value_giro {
        insights.push(Insight::LiquidityWarning { balance });
    }

    if r.sme_loan == ProductStatus::None && balance >= t.high_value_giro {
        insights.push(Insight::WorkingCapitalOpportunity {
            estimate: balance * SME_LOAN_POTENTIAL_RATE,
        });
    }
    if r.payroll == ProductStatus::None && balance >= t.medium_value_giro {
        insights.push(Insight::PayrollCrossSell {
            monthly_fee: balance * PAYROLL_POTENTIAL_RATE,
        });
    }

    match r.txn_frequency {
        TransactionFrequency::High => insights.push(Insight::HealthyActivity),
        TransactionFrequency::Low => insights.push(Insight::ChurnRisk),
        TransactionFrequency::Medium | TransactionFrequency::Unknown => {}
    }

    if client.tag().is_target() {
        insights.push(Insight::ActionPlan { tag: client.tag() });
    }
    insights
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlag {
    NoContactSixMonths,
    NoContactThreeMonths,
    LowActivity,
    NeglectedVip,
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoContactSixMonths => "Not contacted for more than 6 months",
            Self::NoContactThreeMonths => "Not contacted for more than 3 months",
            Self::LowActivity => "Low transaction frequency",
            Self::NeglectedVip => "Long-standing VIP client left unattended",
        })
    }
}

pub fn red_flags(client: &ClassifiedClient) -> Vec<RedFlag> {
    let r = &client.record;
    let mut flags = Vec::new();

    if r.days_since_contact > SIX_MONTHS_DAYS {
        flags.push(RedFlag::NoContactSixMonths);
    } else if r.days_since_contact > THREE_MONTHS_DAYS {
        flags.push(RedFlag::NoContactThreeMonths);
    }
    if r.txn_frequency == TransactionFrequency::Low {
        flags.push(RedFlag::LowActivity);
    }
    if r.tenure_years > VIP_TENURE_YEARS && r.days_since_contact > VIP_CONTACT_DAYS {
        flags.push(RedFlag::NeglectedVip);
    }
    flags
}
