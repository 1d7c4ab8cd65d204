//! Transport encodings for jobs

use crate::error::{JobError, JobResult};
use crate::job::{jupiter_swap_task::SwapAmount, task, OracleJob};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use prost::Message;
use serde::{Deserialize, Serialize};
use std::path::Path;

impl OracleJob {
    /// Varint length prefix followed by the protobuf body, base64 encoded
    pub fn encode_delimited_base64(&self) -> String {
        STANDARD.encode(self.encode_length_delimited_to_vec())
    }

    pub fn decode_delimited_base64(encoded: &str) -> JobResult<Self> {
        let bytes = STANDARD.decode(encoded)?;
        Ok(Self::decode_length_delimited(bytes.as_slice())?)
    }
}

/// `{"jobs": [...]}` document, as printed before a simulation and as read
/// from a jobs file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobsDocument {
    pub jobs: Vec<OracleJob>,
}

impl JobsDocument {
    pub fn new(jobs: Vec<OracleJob>) -> Self {
        Self { jobs }
    }

    pub fn from_json(json: &str) -> JobResult<Self> {
        let doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn load(path: impl AsRef<Path>) -> JobResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| JobError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> JobResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Every job encoded for the simulation service
    pub fn encoded(&self) -> Vec<String> {
        self.jobs.iter().map(OracleJob::encode_delimited_base64).collect()
    }

    pub fn validate(&self) -> JobResult<()> {
        if self.jobs.is_empty() {
            return Err(JobError::NoJobs);
        }
        for (idx, job) in self.jobs.iter().enumerate() {
            validate_job(idx, job)?;
        }
        Ok(())
    }
}

fn validate_job(idx: usize, job: &OracleJob) -> JobResult<()> {
    if job.tasks.iter().all(|t| t.task.is_none()) {
        return Err(JobError::EmptyJob(idx));
    }

    for t in &job.tasks {
        if let Some(task::Task::JupiterSwapTask(swap)) = &t.task {
            if swap.in_token_address.as_deref().unwrap_or("").is_empty() {
                return Err(JobError::IncompleteSwap { job: idx, field: "inTokenAddress" });
            }
            if swap.out_token_address.as_deref().unwrap_or("").is_empty() {
                return Err(JobError::IncompleteSwap { job: idx, field: "outTokenAddress" });
            }
            match &swap.swap_amount {
                None => {
                    return Err(JobError::IncompleteSwap { job: idx, field: "amount" });
                }
                Some(SwapAmount::BaseAmountString(s) | SwapAmount::QuoteAmountString(s))
                    if s.is_empty() =>
                {
                    return Err(JobError::IncompleteSwap { job: idx, field: "amount" });
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}
