//! Static configuration for the provider set and the request protocol.

use std::time::Duration;

/// Providers queried when no other source set is supplied.
pub const DEFAULT_BASE_URLS: [&str; 3] = ["https://api1.com", "https://api2.com", "https://api3.com"];

/// Query appended to every base URL; `{member_id}` is substituted per call.
pub const MEMBER_QUERY: &str = "/?member_id={member_id}";

/// Upper bound on a single provider request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Listen address for `serve` when none is given.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

/// Returns the default source set as owned strings.
pub fn default_sources() -> Vec<String> {
    DEFAULT_BASE_URLS.iter().map(|s| s.to_string()).collect()
}
