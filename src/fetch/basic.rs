use anyhow::Result;
use std::time::Duration;

use super::{Transport, decode_record};
use crate::config::REQUEST_TIMEOUT;
use crate::plan::PlanRecord;

/// Fetches provider records with a pooled `reqwest` blocking client.
pub struct HttpTransport(reqwest::blocking::Client);

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self(client))
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<PlanRecord> {
        let resp = self.0.get(url).send()?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(anyhow::anyhow!("provider returned status {}", status));
        }

        decode_record(&resp.bytes()?)
    }
}
