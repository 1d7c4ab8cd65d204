use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job {0} has no tasks")]
    EmptyJob(usize),

    #[error("job {job}: jupiter swap task is missing {field}")]
    IncompleteSwap { job: usize, field: &'static str },

    #[error("no jobs supplied")]
    NoJobs,

    #[error("failed to read jobs file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid jobs JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid job encoding: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type JobResult<T> = Result<T, JobError>;
