//! Portfolio aggregator: every segment, statistic and ranked list the
//! dashboard views are built from.
//!
//! Two scopes:
//!   - filtered view: the active filter applied to the portfolio; summary
//!     statistics, breakdowns and the priority matrix use this.
//!   - full portfolio: alert segments (loyal, neglected, at-risk,
//!     re-engagement, milestones) ignore the active filter.
//!
//! RULES:
//!   - An empty input is valid. Every mean and rate is 0 on an empty set.
//!   - Ranked lists sort descending with a stable sort, so equal keys keep
//!     portfolio input order.
//!   - Unknown product statuses are counted as neither None nor Active.

use crate::{
    classifier::{ClassifiedClient, LoyaltyTier, OpportunityTag},
    client::{ProductStatus, TransactionFrequency},
    config::{CopilotConfig, Thresholds},
    pipeline::{PipelineStatus, PipelineTracker},
    portfolio::Portfolio,
    types::{Days, Money},
};
use serde::{Deserialize, Serialize};

pub const PRIORITY_LEAD_LIMIT: usize = 5;
pub const MILESTONE_LIMIT: usize = 3;
pub const AT_RISK_CONTACT_DAYS: Days = 120;
pub const REENGAGEMENT_CONTACT_DAYS: Days = 60;
pub const HIGH_URGENCY_DAYS: Days = 90;
pub const CRITICAL_URGENCY_DAYS: Days = 180;
/// Mean lead staleness at or above which lead coverage is Critical.
pub const LEAD_CONTACT_CRITICAL_DAYS: Days = 60;

// ── Filter ───────────────────────────────────────────────────────────────────

/// Active view filter. `None` on a set means "no filter on this field";
/// `Some(vec![])` means "nothing selected" and matches no client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioFilter {
    pub tags: Option<Vec<OpportunityTag>>,
    pub sme_statuses: Option<Vec<ProductStatus>>,
    pub min_balance: Money,
}

impl Default for PortfolioFilter {
    fn default() -> Self {
        Self {
            tags: None,
            sme_statuses: None,
            min_balance: 0.0,
        }
    }
}

impl PortfolioFilter {
    pub fn matches(&self, client: &ClassifiedClient) -> bool {
        let tag_ok = self.tags.as_ref().map_or(true, |tags| tags.contains(&client.tag()));
        let sme_ok = self
            .sme_statuses
            .as_ref()
            .map_or(true, |statuses| statuses.contains(&client.record.sme_loan));
        tag_ok && sme_ok && client.record.giro_balance >= self.min_balance
    }

    pub fn apply<'a>(&self, clients: &'a [ClassifiedClient]) -> Vec<&'a ClassifiedClient> {
        clients.iter().filter(|c| self.matches(c)).collect()
    }
}

// ── Summary statistics ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub client_count: usize,
    pub portfolio_size: usize,
    pub total_balance: Money,
    pub mean_balance: Money,
    pub total_potential: Money,
    pub target_count: usize,
    pub target_share: f64,
    pub sme_none_count: usize,
    pub sme_gap_share: f64,
    pub sme_active_count: usize,
    pub payroll_active_count: usize,
    pub full_package_count: usize,
    pub mean_tenure: f64,
    pub sme_penetration: f64,
    pub payroll_penetration: f64,
    pub full_package_penetration: f64,
}

impl PortfolioSummary {
    /// `portfolio_size` is the unfiltered client count, kept for
    /// "showing X of Y" displays; rates are over `view` only.
    pub fn compute(view: &[&ClassifiedClient], portfolio_size: usize) -> Self {
        let n = view.len();
        let total_balance: Money = view.iter().map(|c| c.record.giro_balance).sum();
        let total_potential: Money = view.iter().map(|c| c.potential_value()).sum();
        let total_tenure: f64 = view.iter().map(|c| c.record.tenure_years as f64).sum();

        let target_count = count_where(view, |c| c.tag().is_target());
        let sme_none_count = count_where(view, |c| c.record.sme_loan == ProductStatus::None);
        let sme_active_count = count_where(view, |c| c.record.sme_loan == ProductStatus::Active);
        let payroll_active_count = count_where(view, |c| c.record.payroll == ProductStatus::Active);
        let full_package_count = count_where(view, |c| c.record.has_full_package());

        Self {
            client_count: n,
            portfolio_size,
            total_balance,
            mean_balance: ratio(total_balance, n),
            total_potential,
            target_count,
            target_share: ratio(target_count as f64, n),
            sme_none_count,
            sme_gap_share: ratio(sme_none_count as f64, n),
            sme_active_count,
            payroll_active_count,
            full_package_count,
            mean_tenure: ratio(total_tenure, n),
            sme_penetration: ratio(sme_active_count as f64, n),
            payroll_penetration: ratio(payroll_active_count as f64, n),
            full_package_penetration: ratio(full_package_count as f64, n),
        }
    }
}

fn count_where(view: &[&ClassifiedClient], pred: impl Fn(&ClassifiedClient) -> bool) -> usize {
    view.iter().filter(|c| pred(**c)).count()
}

fn ratio(numerator: f64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        numerator / n as f64
    }
}

// ── Ranked lists ─────────────────────────────────────────────────────────────

/// Stable descending top-`limit` by `key`.
fn top_by<'a, I, F>(clients: I, limit: usize, key: F) -> Vec<&'a ClassifiedClient>
where
    I: IntoIterator<Item = &'a ClassifiedClient>,
    F: Fn(&ClassifiedClient) -> f64,
{
    let mut ranked: Vec<&ClassifiedClient> = clients.into_iter().collect();
    ranked.sort_by(|a, b| key(*b).total_cmp(&key(*a)));
    ranked.truncate(limit);
    ranked
}

/// Top five TARGET clients by potential value.
pub fn priority_leads<'a, I>(clients: I) -> Vec<&'a ClassifiedClient>
where
    I: IntoIterator<Item = &'a ClassifiedClient>,
{
    top_by(
        clients.into_iter().filter(|c| c.tag().is_target()),
        PRIORITY_LEAD_LIMIT,
        |c| c.potential_value(),
    )
}

/// Top five clients by potential value regardless of tag.
pub fn top_potential<'a, I>(clients: I) -> Vec<&'a ClassifiedClient>
where
    I: IntoIterator<Item = &'a ClassifiedClient>,
{
    top_by(clients, PRIORITY_LEAD_LIMIT, |c| c.potential_value())
}

/// The three longest-tenured clients.
pub fn milestone_clients(clients: &[ClassifiedClient]) -> Vec<&ClassifiedClient> {
    top_by(clients, MILESTONE_LIMIT, |c| c.record.tenure_years as f64)
}

// ── Relationship segments (full portfolio) ───────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    High,
    Medium,
}

impl Urgency {
    pub fn for_days(days_since_contact: Days) -> Self {
        if days_since_contact > CRITICAL_URGENCY_DAYS {
            Self::Critical
        } else if days_since_contact > HIGH_URGENCY_DAYS {
            Self::High
        } else {
            Self::Medium
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReengagementLead<'a> {
    pub client: &'a ClassifiedClient,
    pub urgency: Urgency,
}

pub fn is_loyal(client: &ClassifiedClient, t: &Thresholds) -> bool {
    client.record.tenure_years > t.loyal_client_years
}

pub fn is_neglected_loyal(client: &ClassifiedClient, t: &Thresholds) -> bool {
    is_loyal(client, t) && client.record.days_since_contact > t.contact_critical_days
}

pub fn is_at_risk_high_value(client: &ClassifiedClient, t: &Thresholds) -> bool {
    client.record.giro_balance > t.medium_value_giro
        && client.record.days_since_contact > AT_RISK_CONTACT_DAYS
}

pub fn needs_reengagement(client: &ClassifiedClient, t: &Thresholds) -> bool {
    client.record.giro_balance >= t.medium_value_giro
        && client.record.days_since_contact > REENGAGEMENT_CONTACT_DAYS
}

/// Re-engagement candidates, longest silence first.
pub fn reengagement_leads<'a>(
    clients: &'a [ClassifiedClient],
    t: &Thresholds,
) -> Vec<ReengagementLead<'a>> {
    top_by(
        clients.iter().filter(|c| needs_reengagement(c, t)),
        usize::MAX,
        |c| c.record.days_since_contact as f64,
    )
    .into_iter()
    .map(|client| ReengagementLead {
        client,
        urgency: Urgency::for_days(client.record.days_since_contact),
    })
    .collect()
}

/// Clients at or past the loyalty mark, longest tenure first.
pub fn high_tenure_recognition<'a>(
    clients: &'a [ClassifiedClient],
    t: &Thresholds,
) -> Vec<&'a ClassifiedClient> {
    top_by(
        clients.iter().filter(|c| c.record.tenure_years >= t.loyal_client_years),
        usize::MAX,
        |c| c.record.tenure_years as f64,
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipSegments<'a> {
    pub loyal: Vec<&'a ClassifiedClient>,
    pub neglected_loyal: Vec<&'a ClassifiedClient>,
    pub at_risk_high_value: Vec<&'a ClassifiedClient>,
    pub reengagement: Vec<ReengagementLead<'a>>,
    pub milestones: Vec<&'a ClassifiedClient>,
    pub high_tenure: Vec<&'a ClassifiedClient>,
}

impl<'a> RelationshipSegments<'a> {
    pub fn compute(clients: &'a [ClassifiedClient], t: &Thresholds) -> Self {
        let select = |pred: fn(&ClassifiedClient, &Thresholds) -> bool| {
            clients.iter().filter(|c| pred(*c, t)).collect::<Vec<_>>()
        };
        Self {
            loyal: select(is_loyal),
            neglected_loyal: select(is_neglected_loyal),
            at_risk_high_value: select(is_at_risk_high_value),
            reengagement: reengagement_leads(clients, t),
            milestones: milestone_clients(clients),
            high_tenure: high_tenure_recognition(clients, t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionKpis {
    pub loyal_count: usize,
    pub loyal_share: f64,
    pub neglected_loyal_count: usize,
    pub platinum_count: usize,
    pub platinum_share: f64,
    pub at_risk_count: usize,
}

impl RetentionKpis {
    pub fn compute(clients: &[ClassifiedClient], t: &Thresholds) -> Self {
        let n = clients.len();
        let loyal_count = clients.iter().filter(|c| is_loyal(c, t)).count();
        let platinum_count = clients
            .iter()
            .filter(|c| c.loyalty() == LoyaltyTier::Platinum)
            .count();
        Self {
            loyal_count,
            loyal_share: ratio(loyal_count as f64, n),
            neglected_loyal_count: clients.iter().filter(|c| is_neglected_loyal(c, t)).count(),
            platinum_count,
            platinum_share: ratio(platinum_count as f64, n),
            at_risk_count: clients.iter().filter(|c| is_at_risk_high_value(c, t)).count(),
        }
    }
}

// ── Distributions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagBreakdown {
    pub tag: OpportunityTag,
    pub count: usize,
    pub potential_value: Money,
}

/// Count and summed potential per tag, every tag present, in tag order.
pub fn tag_distribution(view: &[&ClassifiedClient]) -> Vec<TagBreakdown> {
    OpportunityTag::ALL
        .iter()
        .map(|&tag| {
            let members = view.iter().filter(|c| c.tag() == tag);
            TagBreakdown {
                tag,
                count: members.clone().count(),
                potential_value: members.map(|c| c.potential_value()).sum(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiroBucket {
    pub label: String,
    pub lower: Money,
    pub upper: Money,
    pub count: usize,
}

/// Histogram over `edges`. The first bucket includes its lower edge, the
/// rest are (lower, upper]. Balances above the last edge fall outside.
pub fn giro_distribution(view: &[&ClassifiedClient], edges: &[Money]) -> Vec<GiroBucket> {
    let last = edges.len().saturating_sub(2);
    edges
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let (lower, upper) = (w[0], w[1]);
            let count = view
                .iter()
                .map(|c| c.record.giro_balance)
                .filter(|&b| (b > lower || (i == 0 && b == lower)) && b <= upper)
                .count();
            let label = if i == 0 {
                format!("< {}", short_amount(upper))
            } else if i == last {
                format!("> {}", short_amount(lower))
            } else {
                format!("{}-{}", short_amount(lower).trim_end_matches('M'), short_amount(upper))
            };
            GiroBucket { label, lower, upper, count }
        })
        .collect()
}

/// 1000 → "1M", 2500 → "2.5M".
fn short_amount(value: Money) -> String {
    let scaled = value / 1000.0;
    if scaled.fract() == 0.0 {
        format!("{}M", scaled as i64)
    } else {
        format!("{scaled:.1}M")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMix {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
    /// (3·high + 2·medium + low) / (3·n), in [0, 1].
    pub engagement_score: f64,
}

impl ActivityMix {
    pub fn compute(view: &[&ClassifiedClient]) -> Self {
        let freq = |f: TransactionFrequency| {
            view.iter().filter(|c| c.record.txn_frequency == f).count()
        };
        let (high, medium, low) = (
            freq(TransactionFrequency::High),
            freq(TransactionFrequency::Medium),
            freq(TransactionFrequency::Low),
        );
        let weighted = (high * 3 + medium * 2 + low) as f64;
        Self {
            high,
            medium,
            low,
            unknown: freq(TransactionFrequency::Unknown),
            engagement_score: ratio(weighted, view.len() * 3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityMatrix {
    /// High giro, no SME loan.
    pub critical_count: usize,
    pub critical_potential: Money,
    /// Medium giro band, no payroll.
    pub medium_count: usize,
    pub medium_potential: Money,
    /// Low transaction frequency.
    pub retention_count: usize,
}

impl PriorityMatrix {
    pub fn compute(view: &[&ClassifiedClient], t: &Thresholds) -> Self {
        let critical: Vec<_> = view
            .iter()
            .filter(|c| {
                c.record.giro_balance >= t.high_value_giro
                    && c.record.sme_loan == ProductStatus::None
            })
            .collect();
        let medium: Vec<_> = view
            .iter()
            .filter(|c| {
                let b = c.record.giro_balance;
                b >= t.medium_value_giro
                    && b < t.high_value_giro
                    && c.record.payroll == ProductStatus::None
            })
            .collect();
        Self {
            critical_count: critical.len(),
            critical_potential: critical.iter().map(|c| c.potential_value()).sum(),
            medium_count: medium.len(),
            medium_potential: medium.iter().map(|c| c.potential_value()).sum(),
            retention_count: view
                .iter()
                .filter(|c| c.record.txn_frequency == TransactionFrequency::Low)
                .count(),
        }
    }
}

// ── Lead summary ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Good,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub lead_count: usize,
    pub lead_share: f64,
    pub total_potential: Money,
    pub sme_lead_count: usize,
    pub sme_lead_potential: Money,
    pub mean_days_since_contact: f64,
    pub contact_status: ContactStatus,
}

impl LeadSummary {
    pub fn compute(leads: &[&ClassifiedClient], portfolio_size: usize, t: &Thresholds) -> Self {
        let sme: Vec<_> = leads
            .iter()
            .filter(|c| c.tag() == OpportunityTag::TargetSmeLoan)
            .collect();
        let total_days: f64 = leads.iter().map(|c| c.record.days_since_contact as f64).sum();
        let mean_days = ratio(total_days, leads.len());
        let contact_status = if mean_days < t.contact_warning_days as f64 {
            ContactStatus::Good
        } else if mean_days < LEAD_CONTACT_CRITICAL_DAYS as f64 {
            ContactStatus::Warning
        } else {
            ContactStatus::Critical
        };
        Self {
            lead_count: leads.len(),
            lead_share: ratio(leads.len() as f64, portfolio_size),
            total_potential: leads.iter().map(|c| c.potential_value()).sum(),
            sme_lead_count: sme.len(),
            sme_lead_potential: sme.iter().map(|c| c.potential_value()).sum(),
            mean_days_since_contact: mean_days,
            contact_status,
        }
    }
}

// ── Pipeline forecast ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: PipelineStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineForecast {
    pub tracked: usize,
    pub status_counts: Vec<StatusCount>,
    /// ClosedWon / tracked.
    pub conversion_rate: f64,
    /// Summed potential of tracked clients that exist in the portfolio.
    pub pipeline_value: Money,
    pub estimated_revenue: Money,
}

impl PipelineForecast {
    pub fn compute(portfolio: &Portfolio, tracker: &PipelineTracker) -> Self {
        let status_counts: Vec<StatusCount> = tracker
            .status_counts()
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();
        let closed_won = status_counts
            .iter()
            .find(|s| s.status == PipelineStatus::ClosedWon)
            .map_or(0, |s| s.count);
        let conversion_rate = ratio(closed_won as f64, tracker.len());
        let pipeline_value: Money = tracker
            .all()
            .keys()
            .filter_map(|name| portfolio.get(name))
            .map(|c| c.potential_value())
            .sum();
        Self {
            tracked: tracker.len(),
            status_counts,
            conversion_rate,
            pipeline_value,
            estimated_revenue: pipeline_value * conversion_rate,
        }
    }
}

// ── Full dashboard view ──────────────────────────────────────────────────────

/// Everything the presentation layer renders for one interaction.
/// Rebuilt from scratch on every filter change, selection or save.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub filtered: Vec<&'a ClassifiedClient>,
    pub summary: PortfolioSummary,
    pub tag_breakdown: Vec<TagBreakdown>,
    pub giro_distribution: Vec<GiroBucket>,
    pub activity: ActivityMix,
    pub priority_matrix: PriorityMatrix,
    pub priority_leads: Vec<&'a ClassifiedClient>,
    pub lead_summary: LeadSummary,
    pub top_potential: Vec<&'a ClassifiedClient>,
    pub segments: RelationshipSegments<'a>,
    pub retention: RetentionKpis,
    pub pipeline: PipelineForecast,
}

impl<'a> DashboardView<'a> {
    pub fn build(
        portfolio: &'a Portfolio,
        filter: &PortfolioFilter,
        config: &CopilotConfig,
        tracker: &PipelineTracker,
    ) -> Self {
        let t = &config.thresholds;
        let all = portfolio.clients();
        let filtered = filter.apply(all);
        let leads = priority_leads(all);

        Self {
            summary: PortfolioSummary::compute(&filtered, portfolio.len()),
            tag_breakdown: tag_distribution(&filtered),
            giro_distribution: giro_distribution(&filtered, &config.giro_bins),
            activity: ActivityMix::compute(&filtered),
            priority_matrix: PriorityMatrix::compute(&filtered, t),
            lead_summary: LeadSummary::compute(&leads, portfolio.len(), t),
            priority_leads: leads,
            top_potential: top_potential(all),
            segments: RelationshipSegments::compute(all, t),
            retention: RetentionKpis::compute(all, t),
            pipeline: PipelineForecast::compute(portfolio, tracker),
            filtered,
        }
    }
}
