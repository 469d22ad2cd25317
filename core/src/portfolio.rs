//! Portfolio ingestion: validate, de-duplicate, classify.
//!
//! Input order is preserved. Every "top N" view breaks ties by this order.

use crate::{
    classifier::{classify_client, ClassifiedClient},
    client::ClientRecord,
    config::Thresholds,
    error::{CopilotError, CopilotResult},
};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    clients: Vec<ClassifiedClient>,
}

impl Portfolio {
    /// Validate and classify a batch of records.
    ///
    /// The batch is rejected as a whole on the first invalid record or
    /// repeated client name; a partially loaded portfolio is never returned.
    pub fn ingest(records: Vec<ClientRecord>, thresholds: &Thresholds) -> CopilotResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut clients = Vec::with_capacity(records.len());

        for record in records {
            if let Err(e) = record.validate() {
                log::warn!("portfolio: rejecting batch, record '{}' invalid: {e}", record.name);
                return Err(e);
            }
            if !seen.insert(record.name.clone()) {
                log::warn!("portfolio: rejecting batch, duplicate client '{}'", record.name);
                return Err(CopilotError::DuplicateClient { name: record.name });
            }
            clients.push(classify_client(record, thresholds));
        }

        log::info!("portfolio: ingested {} clients", clients.len());
        Ok(Self { clients })
    }

    /// Parse a JSON array of client records and ingest it.
    pub fn from_json(content: &str, thresholds: &Thresholds) -> CopilotResult<Self> {
        let records: Vec<ClientRecord> = serde_json::from_str(content)?;
        Self::ingest(records, thresholds)
    }

    /// Re-run classification against (possibly changed) thresholds.
    pub fn reclassify(&mut self, thresholds: &Thresholds) {
        for client in &mut self.clients {
            let record = client.record.clone();
            *client = classify_client(record, thresholds);
        }
    }

    pub fn clients(&self) -> &[ClassifiedClient] {
        &self.clients
    }

    pub fn get(&self, name: &str) -> Option<&ClassifiedClient> {
        self.clients.iter().find(|c| c.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
