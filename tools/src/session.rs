//! One user's dashboard session: the portfolio plus everything the UI
//! mutates (active filter, selected client, pipeline tracker).
//!
//! RULE: selection lives here, never in the core. Two sessions never share
//! a tracker.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use rm_copilot_core::{
    aggregator::{DashboardView, PortfolioFilter},
    classifier::ClassifiedClient,
    config::CopilotConfig,
    insights::{analyse, red_flags},
    pipeline::{PipelineStatus, PipelineTracker, PipelineUpdate},
    portfolio::Portfolio,
};
use serde::Serialize;

use crate::drafting::{outreach_script, relationship_script};

pub struct Session {
    pub config: CopilotConfig,
    pub portfolio: Portfolio,
    pub tracker: PipelineTracker,
    pub filter: PortfolioFilter,
    pub selected: Option<String>,
}

#[derive(Serialize)]
pub struct ClientDetail<'a> {
    pub client: &'a ClassifiedClient,
    pub insights: Vec<String>,
    pub red_flags: Vec<String>,
    pub pipeline: Option<&'a PipelineUpdate>,
}

#[derive(Serialize)]
pub struct UiState<'a> {
    pub filter: &'a PortfolioFilter,
    pub selected: Option<ClientDetail<'a>>,
    pub dashboard: DashboardView<'a>,
}

#[derive(Serialize)]
pub struct Draft {
    pub client: String,
    pub outreach: String,
    pub relationship: String,
}

impl Session {
    pub fn new(config: CopilotConfig, portfolio: Portfolio) -> Self {
        Self {
            config,
            portfolio,
            tracker: PipelineTracker::new(),
            filter: PortfolioFilter::default(),
            selected: None,
        }
    }

    pub fn set_filter(&mut self, filter: PortfolioFilter) {
        self.filter = filter;
    }

    pub fn clear_filter(&mut self) {
        self.filter = PortfolioFilter::default();
    }

    pub fn select(&mut self, name: &str) -> Result<()> {
        if !self.portfolio.contains(name) {
            bail!("Unknown client '{name}'");
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    /// Save an outreach update for `client`, or the selected client when absent.
    pub fn save_pipeline(
        &mut self,
        client: Option<String>,
        status: PipelineStatus,
        notes: String,
        next_action: String,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let name = self.target(client)?;
        self.tracker.upsert(name.clone(), status, notes, next_action, now);
        log::info!("session: pipeline for {name} set to {status}");
        Ok(())
    }

    pub fn draft(&self, client: Option<String>) -> Result<Draft> {
        let name = self.target(client)?;
        let Some(c) = self.portfolio.get(&name) else {
            bail!("Unknown client '{name}'");
        };
        Ok(Draft {
            outreach: outreach_script(c, &self.config.operator),
            relationship: relationship_script(c, &self.config.operator),
            client: name,
        })
    }

    pub fn state(&self) -> UiState<'_> {
        let selected = self
            .selected
            .as_deref()
            .and_then(|name| self.portfolio.get(name))
            .map(|client| ClientDetail {
                client,
                insights: analyse(client, &self.config.thresholds)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                red_flags: red_flags(client).iter().map(ToString::to_string).collect(),
                pipeline: self.tracker.get(client.name()),
            });
        UiState {
            filter: &self.filter,
            selected,
            dashboard: DashboardView::build(
                &self.portfolio,
                &self.filter,
                &self.config,
                &self.tracker,
            ),
        }
    }

    fn target(&self, client: Option<String>) -> Result<String> {
        let name = match client.or_else(|| self.selected.clone()) {
            Some(name) => name,
            None => bail!("No client given and none selected"),
        };
        if !self.portfolio.contains(&name) {
            bail!("Unknown client '{name}'");
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::demo_portfolio;
    use chrono::TimeZone;

    fn session() -> Session {
        let config = CopilotConfig::default();
        let portfolio = Portfolio::ingest(demo_portfolio(42, 20), &config.thresholds).unwrap();
        Session::new(config, portfolio)
    }

    #[test]
    fn save_without_selection_fails() {
        let mut s = session();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        assert!(s
            .save_pipeline(None, PipelineStatus::Contacted, String::new(), String::new(), now)
            .is_err());
        assert!(s.tracker.is_empty());
    }

    #[test]
    fn save_goes_to_selected_client() {
        let mut s = session();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        s.select("PT. Mega Indah").unwrap();
        s.save_pipeline(None, PipelineStatus::Interested, "warm".into(), "visit".into(), now)
            .unwrap();
        assert_eq!(s.tracker.get("PT. Mega Indah").unwrap().status, PipelineStatus::Interested);

        let state = s.state();
        let detail = state.selected.unwrap();
        assert_eq!(detail.client.name(), "PT. Mega Indah");
        assert!(detail.pipeline.is_some());
    }

    #[test]
    fn unknown_client_cannot_be_selected() {
        let mut s = session();
        assert!(s.select("PT. Nowhere").is_err());
        assert!(s.selected.is_none());
    }

    #[test]
    fn state_serialises() {
        let s = session();
        let json = serde_json::to_value(s.state()).unwrap();
        assert_eq!(json["dashboard"]["summary"]["portfolio_size"], 20);
        assert!(json["selected"].is_null());
    }
}
