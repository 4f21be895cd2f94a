//! Simulated provider responses.
//!
//! Stands in for the real providers when the server or CLI runs with the
//! fixture transport. Only member 1 has data.

use crate::fetch::FixtureTransport;
use crate::plan::PlanRecord;

/// Canned `(query url, record)` pairs for member 1 on the default providers.
pub fn responses() -> Vec<(String, PlanRecord)> {
    vec![
        (
            "https://api1.com/?member_id=1".to_string(),
            PlanRecord::new(1000.0, 10000.0, 5000.0),
        ),
        (
            "https://api2.com/?member_id=1".to_string(),
            PlanRecord::new(1200.0, 13000.0, 6000.0),
        ),
        (
            "https://api3.com/?member_id=1".to_string(),
            PlanRecord::new(1000.0, 10000.0, 6000.0),
        ),
    ]
}

/// A [`FixtureTransport`] preloaded with [`responses`].
pub fn transport() -> FixtureTransport {
    FixtureTransport::from_iter(responses())
}
