//! Job simulation service client (`POST /api/simulate`)

use crate::config::Cluster;
use crate::error::{ClientError, ClientResult};
use credfeed_jobs::JobsDocument;
use serde::Serialize;
use serde_json::Value;

const SERVICE: &str = "simulation service";

#[derive(Debug, Serialize)]
struct SimulateRequest<'a> {
    cluster: &'a str,
    jobs: Vec<String>,
}

/// Body returned by a successful simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateResponse {
    pub status: u16,
    pub body: Value,
}

impl SimulateResponse {
    /// Numeric job outputs, one per job when every job succeeded.
    ///
    /// The service reports numbers either as JSON numbers or as decimal
    /// strings; entries that are neither are skipped.
    pub fn results(&self) -> Vec<f64> {
        self.body
            .get("results")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(numeric).collect())
            .unwrap_or_default()
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct SimulatorClient {
    http: reqwest::Client,
    base_url: String,
}

impl SimulatorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Run every job in `doc` once on the service's oracle and return the
    /// raw outputs
    pub async fn simulate_jobs(
        &self,
        cluster: Cluster,
        doc: &JobsDocument,
    ) -> ClientResult<SimulateResponse> {
        doc.validate()?;

        let request = SimulateRequest {
            cluster: cluster.simulate_name(),
            jobs: doc.encoded(),
        };
        let url = format!("{}/api/simulate", self.base_url);
        log::debug!("Simulating {} job(s) at {}", request.jobs.len(), url);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| ClientError::Transport { service: SERVICE, source })?;

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

        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(SimulateResponse {
            status: status.as_u16(),
            body,
        })
    }
}
