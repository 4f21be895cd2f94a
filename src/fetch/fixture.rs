use anyhow::Result;
use std::collections::HashMap;
use tracing::debug;

use super::Transport;
use crate::plan::PlanRecord;

/// Serves records from an in-memory URL table. Unknown URLs fail.
#[derive(Debug, Clone, Default)]
pub struct FixtureTransport {
    responses: HashMap<String, PlanRecord>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, record: PlanRecord) {
        self.responses.insert(url.into(), record);
    }
}

impl<U: Into<String>> FromIterator<(U, PlanRecord)> for FixtureTransport {
    fn from_iter<I: IntoIterator<Item = (U, PlanRecord)>>(iter: I) -> Self {
        Self {
            responses: iter.into_iter().map(|(u, r)| (u.into(), r)).collect(),
        }
    }
}

impl Transport for FixtureTransport {
    fn fetch(&self, url: &str) -> Result<PlanRecord> {
        match self.responses.get(url) {
            Some(record) => Ok(*record),
            None => {
                debug!(url, "No fixture response");
                Err(anyhow::anyhow!("no fixture data for {url}"))
            }
        }
    }
}
