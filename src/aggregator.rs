//! Coalesces plan values from several providers into one answer per field.
//!
//! Providers are queried one after another. A provider that fails is logged
//! and skipped; the rest still contribute. Each field is blended as
//! `mean_weight * mean + median_weight * median + mode_weight * mode` over the
//! records that carry it, then truncated toward zero.

use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::config::MEMBER_QUERY;
use crate::fetch::Transport;
use crate::plan::{Field, PlanInfo, PlanValue, SourcedRecord, Weights};
use crate::stats::{mean, median, mode};

/// Holds the provider base URLs queried for every member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregator {
    base_urls: BTreeSet<String>,
}

impl Aggregator {
    /// Builds an aggregator over its own copy of `base_urls`. Duplicates
    /// collapse.
    pub fn new<I, S>(base_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_urls: base_urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn base_urls(&self) -> impl Iterator<Item = &str> {
        self.base_urls.iter().map(String::as_str)
    }

    /// Queries every provider for `member_id`, keeping the records that came
    /// back.
    #[tracing::instrument(skip(self, transport))]
    pub fn collect<T: Transport + ?Sized>(&self, member_id: i64, transport: &T) -> Vec<SourcedRecord> {
        let mut records = Vec::with_capacity(self.base_urls.len());

        for base_url in &self.base_urls {
            let url = query_url(base_url, member_id);
            match transport.fetch(&url) {
                Ok(record) => {
                    debug!(url = %url, ?record, "Provider record received");
                    records.push(SourcedRecord { url, record });
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Skipping failed provider request");
                }
            }
        }

        records
    }

    /// Queries every provider and blends the results.
    pub fn compute<T: Transport + ?Sized>(
        &self,
        member_id: i64,
        transport: &T,
        weights: Weights,
    ) -> PlanInfo {
        let records = self.collect(member_id, transport);
        let plan = combine(&records, weights);

        info!(
            member_id,
            sources = self.base_urls.len(),
            responded = records.len(),
            deductible = %plan.deductible,
            stop_loss = %plan.stop_loss,
            oop_max = %plan.oop_max,
            "Plan info coalesced"
        );

        plan
    }
}

/// Builds the provider query URL for one member.
pub fn query_url(base_url: &str, member_id: i64) -> String {
    format!(
        "{base_url}{}",
        MEMBER_QUERY.replace("{member_id}", &member_id.to_string())
    )
}

/// Blends collected records field by field.
///
/// With no records every field is "no data". A field that no record carries
/// is "no data" on its own while the others are still computed.
pub fn combine(records: &[SourcedRecord], weights: Weights) -> PlanInfo {
    let mut plan = PlanInfo::no_data();
    if records.is_empty() {
        return plan;
    }

    for field in Field::ALL {
        let values: Vec<f64> = records.iter().filter_map(|r| r.record.get(field)).collect();
        let value = blend(&values, weights);
        if value == PlanValue::NoData {
            debug!(field = field.key(), "No provider reported field");
        }
        plan.set(field, value);
    }

    plan
}

fn blend(values: &[f64], weights: Weights) -> PlanValue {
    let (Some(avg), Some(mid), Some(most)) = (mean(values), median(values), mode(values)) else {
        return PlanValue::NoData;
    };

    let weighted = weights.mean() * avg + weights.median * mid + weights.mode * most;

    // `as` truncates toward zero and saturates non-finite values
    PlanValue::Value(weighted as i64)
}
