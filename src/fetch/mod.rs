//! Transports that turn a provider query URL into a [`PlanRecord`].
//!
//! The aggregator only sees the [`Transport`] trait. Any failure a transport
//! reports (connect error, timeout, bad status, malformed body) is treated
//! the same way: the source is skipped for that call.

mod basic;
mod fixture;
mod socket;

pub use basic::HttpTransport;
pub use fixture::FixtureTransport;
pub use socket::{MAX_RESPONSE_BYTES, SocketTransport};

use anyhow::{Context, Result};

use crate::plan::PlanRecord;

/// Fetches one provider's record for a fully built query URL.
///
/// Implementations must be usable from several threads at once; the server
/// shares one transport across requests.
pub trait Transport: Send + Sync {
    /// Returns the decoded record, or any error if the provider could not be
    /// reached or answered with something other than a plan record.
    fn fetch(&self, url: &str) -> Result<PlanRecord>;
}

impl<F> Transport for F
where
    F: Fn(&str) -> Result<PlanRecord> + Send + Sync,
{
    fn fetch(&self, url: &str) -> Result<PlanRecord> {
        self(url)
    }
}

/// Decodes a provider JSON body.
pub fn decode_record(body: &[u8]) -> Result<PlanRecord> {
    serde_json::from_slice(body).context("provider returned malformed plan JSON")
}
