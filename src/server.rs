//! HTTP front end: `GET /` and `GET /index` render the coalesced plan info
//! for the member named in the query string.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info};
use warp::Filter;

use crate::aggregator::Aggregator;
use crate::fetch::Transport;
use crate::plan::{PlanInfo, Weights};
use crate::render::index_page;

/// Rejection raised when the blocking aggregation task dies.
#[derive(Debug)]
struct ComputeFailed;

impl warp::reject::Reject for ComputeFailed {}

/// Shared handles for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub transport: Arc<dyn Transport>,
}

impl AppState {
    pub fn new(aggregator: Aggregator, transport: Arc<dyn Transport>) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            transport,
        }
    }
}

/// Parsed query parameters of the index page.
///
/// Parsing is lenient: an unparsable `member_id` means no member, and
/// unparsable weights fall back to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanQuery {
    pub member_id: Option<i64>,
    pub weights: Weights,
}

impl PlanQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let float = |key: &str| {
            params
                .get(key)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .unwrap_or(0.0)
        };

        Self {
            member_id: params.get("member_id").and_then(|s| s.trim().parse().ok()),
            weights: Weights::new(float("modewt"), float("medianwt")),
        }
    }
}

pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let index = warp::path::end()
        .or(warp::path("index").and(warp::path::end()))
        .unify();

    index
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(warp::any().map(move || state.clone()))
        .and_then(index_handler)
}

async fn index_handler(
    params: HashMap<String, String>,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let query = PlanQuery::from_params(&params);

    let plan = match query.member_id {
        Some(member_id) => {
            // transports block, keep them off the async workers
            tokio::task::spawn_blocking(move || {
                state
                    .aggregator
                    .compute(member_id, state.transport.as_ref(), query.weights)
            })
            .await
            .map_err(|e| {
                error!(error = %e, member_id, "Aggregation task failed");
                warp::reject::custom(ComputeFailed)
            })?
        }
        None => {
            debug!(?params, "No member id in request");
            PlanInfo::no_data()
        }
    };

    Ok(warp::reply::html(index_page(query.member_id, &plan)))
}

/// Serves [`routes`] on `addr` until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) {
    info!(%addr, "Starting plan info server");
    warp::serve(routes(state)).run(addr).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_sources;
    use crate::sim;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn state() -> AppState {
        AppState::new(Aggregator::new(default_sources()), Arc::new(sim::transport()))
    }

    #[test]
    fn test_plan_query_defaults() {
        let q = PlanQuery::from_params(&params(&[]));
        assert_eq!(q.member_id, None);
        assert_eq!(q.weights, Weights::default());
    }

    #[test]
    fn test_plan_query_lenient() {
        let q = PlanQuery::from_params(&params(&[
            ("member_id", "abc"),
            ("modewt", ".5"),
            ("medianwt", "half"),
        ]));
        assert_eq!(q.member_id, None);
        assert_eq!(q.weights, Weights::new(0.5, 0.0));
    }

    #[tokio::test]
    async fn test_index_mean() {
        let resp = warp::test::request()
            .method("GET")
            .path("/?member_id=1")
            .reply(&routes(state()))
            .await;

        assert_eq!(resp.status(), 200);
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("Deductible: 1066"));
        assert!(body.contains("Stop Loss: 11000"));
        assert!(body.contains("OOP Max: 5666"));
    }

    #[tokio::test]
    async fn test_index_alias_median_mode() {
        let resp = warp::test::request()
            .method("GET")
            .path("/index?member_id=1&medianwt=.5&modewt=.5")
            .reply(&routes(state()))
            .await;

        assert_eq!(resp.status(), 200);
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("Deductible: 1000"));
        assert!(body.contains("Stop Loss: 10000"));
        assert!(body.contains("OOP Max: 6000"));
    }

    #[tokio::test]
    async fn test_index_unknown_member() {
        let resp = warp::test::request()
            .method("GET")
            .path("/?member_id=2")
            .reply(&routes(state()))
            .await;

        assert_eq!(resp.status(), 200);
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("Deductible: no data"));
        assert!(body.contains("Stop Loss: no data"));
        assert!(body.contains("OOP Max: no data"));
    }

    #[tokio::test]
    async fn test_index_malformed_query() {
        for path in ["/?badquery=2", "/", "/?member_id=one"] {
            let resp = warp::test::request()
                .method("GET")
                .path(path)
                .reply(&routes(state()))
                .await;

            assert_eq!(resp.status(), 200, "path {path}");
            let body = String::from_utf8_lossy(resp.body());
            assert!(body.contains("Deductible: no data"));
            assert!(body.contains("Stop Loss: no data"));
            assert!(body.contains("OOP Max: no data"));
        }
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let resp = warp::test::request()
            .method("GET")
            .path("/plans")
            .reply(&routes(state()))
            .await;

        assert_eq!(resp.status(), 404);
    }
}
