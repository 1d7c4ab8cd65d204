//! Crossbar client: job storage and feed simulation

use crate::config::Cluster;
use crate::error::{ClientError, ClientResult};
use credfeed_jobs::{JobsDocument, OracleJob};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

const SERVICE: &str = "crossbar";

#[derive(Debug, Serialize)]
struct StoreRequest<'a> {
    queue: String,
    jobs: &'a [OracleJob],
}

/// Where crossbar pinned a job set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    pub cid: String,
    /// `0x`-prefixed hex sha256 of the encoded jobs
    pub feed_hash: String,
}

impl StoreResponse {
    pub fn feed_hash_bytes(&self) -> ClientResult<[u8; 32]> {
        parse_feed_hash(&self.feed_hash)
    }
}

pub fn parse_feed_hash(hash: &str) -> ClientResult<[u8; 32]> {
    let digits = hash.strip_prefix("0x").unwrap_or(hash);
    let bytes = hex::decode(digits).map_err(|_| ClientError::InvalidFeedHash(hash.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| ClientError::InvalidFeedHash(hash.to_string()))
}

/// One feed's simulated job outputs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSimulation {
    pub feed: String,
    #[serde(default)]
    pub feed_hash: Option<String>,
    #[serde(default)]
    pub results: Vec<f64>,
    #[serde(default)]
    pub result: Option<f64>,
}

impl FeedSimulation {
    /// Aggregated value: the service's `result` when present, otherwise the
    /// median of the per-job `results` (which the service may leave empty)
    pub fn value(&self) -> Option<f64> {
        self.result.or_else(|| median(&self.results))
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[derive(Debug, Clone)]
pub struct CrossbarClient {
    http: reqwest::Client,
    base_url: String,
}

impl CrossbarClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Pin `doc` for `queue` and return the resulting feed hash
    pub async fn store(&self, queue: &Pubkey, doc: &JobsDocument) -> ClientResult<StoreResponse> {
        doc.validate()?;

        let request = StoreRequest {
            queue: queue.to_string(),
            jobs: &doc.jobs,
        };
        let url = format!("{}/store", self.base_url);
        log::debug!("Storing {} job(s) for queue {}", doc.jobs.len(), queue);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| ClientError::Transport { service: SERVICE, source })?;
        decode(response).await
    }

    /// Simulate the jobs of existing feeds without touching the chain
    pub async fn simulate_solana_feeds(
        &self,
        cluster: Cluster,
        feeds: &[Pubkey],
    ) -> ClientResult<Vec<FeedSimulation>> {
        if feeds.is_empty() {
            return Ok(Vec::new());
        }

        let joined = feeds
            .iter()
            .map(Pubkey::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/simulate/solana/{}/{}",
            self.base_url,
            cluster.network_name(),
            joined
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { service: SERVICE, source })?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|source| ClientError::Transport { service: SERVICE, source })?;

    if !status.is_success() {
        return Err(ClientError::Http {
            service: SERVICE,
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| ClientError::Http {
        service: SERVICE,
        status: status.as_u16(),
        body: format!("unexpected body ({}): {}", e, text),
    })
}
