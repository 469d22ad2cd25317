//! Pipeline state tracker: the latest manual outreach update per client.
//!
//! Lifecycle of an entry:
//!   absent → created on first save → overwritten on every later save
//!
//! No history is kept and no status transition is validated: any stage may
//! follow any stage, including moving backwards out of a closed state.
//! Callers sharing a tracker across threads must wrap it in a Mutex;
//! `upsert` is a single map insert, so no finer locking is needed.

use crate::types::ClientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Funnel stages in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    NotContacted,
    Contacted,
    Interested,
    ProposalSent,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl PipelineStatus {
    pub const ALL: [PipelineStatus; 7] = [
        Self::NotContacted,
        Self::Contacted,
        Self::Interested,
        Self::ProposalSent,
        Self::Negotiation,
        Self::ClosedWon,
        Self::ClosedLost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::NotContacted => "Not Contacted",
            Self::Contacted => "Contacted",
            Self::Interested => "Interested",
            Self::ProposalSent => "Proposal Sent",
            Self::Negotiation => "Negotiation",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineUpdate {
    pub status: PipelineStatus,
    pub notes: String,
    pub next_action: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineTracker {
    updates: BTreeMap<ClientId, PipelineUpdate>,
}

impl PipelineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins. Returns the entry that was replaced, if any.
    pub fn upsert(
        &mut self,
        client_id: impl Into<ClientId>,
        status: PipelineStatus,
        notes: impl Into<String>,
        next_action: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Option<PipelineUpdate> {
        let client_id = client_id.into();
        log::debug!("pipeline: {client_id} -> {status}");
        self.updates.insert(
            client_id,
            PipelineUpdate {
                status,
                notes: notes.into(),
                next_action: next_action.into(),
                updated_at,
            },
        )
    }

    pub fn get(&self, client_id: &str) -> Option<&PipelineUpdate> {
        self.updates.get(client_id)
    }

    pub fn all(&self) -> &BTreeMap<ClientId, PipelineUpdate> {
        &self.updates
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Entry count per stage, every stage present, in funnel order.
    pub fn status_counts(&self) -> Vec<(PipelineStatus, usize)> {
        PipelineStatus::ALL
            .iter()
            .map(|&status| {
                let n = self.updates.values().filter(|u| u.status == status).count();
                (status, n)
            })
            .collect()
    }
}
