//! Client error taxonomy

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{service} returned {status}: {body}")]
    Http {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid feed hash {0:?}")]
    InvalidFeedHash(String),

    #[error("invalid feed config: {0}")]
    InvalidFeedConfig(String),

    #[error("account {0} not found")]
    AccountNotFound(String),

    #[error("transaction simulation failed: {err}\n{logs}")]
    SimulationFailed { err: String, logs: String },

    #[error("gave up after {0} polls")]
    PollExhausted(usize),

    #[error(transparent)]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error(transparent)]
    Common(#[from] credfeed_common::CommonError),

    #[error(transparent)]
    Job(#[from] credfeed_jobs::JobError),

    #[error("failed to build transaction: {0}")]
    Transaction(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
