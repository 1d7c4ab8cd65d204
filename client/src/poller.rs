//! Fixed-interval polling
//!
//! Each tick awaits the previous call before the next one starts, so
//! calls never overlap. Ticks missed while a call was running are skipped
//! rather than fired back to back.

use crate::error::{ClientError, ClientResult};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    pub interval: Duration,
    /// Stop after this many calls; `None` polls until shutdown
    pub max_iterations: Option<usize>,
}

/// Counters reported when a polling loop ends
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    pub succeeded: usize,
    pub failed: usize,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_iterations: None,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    fn ticker(&self) -> time::Interval {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    fn exhausted(&self, calls: usize) -> bool {
        self.max_iterations.is_some_and(|max| calls >= max)
    }

    /// Call `task` on every tick until the iteration bound is reached or
    /// `shutdown` resolves. Failures are logged and polling continues.
    pub async fn run<F, Fut, T, E, S>(&self, mut task: F, shutdown: S) -> PollStats
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        S: Future<Output = ()>,
    {
        let mut stats = PollStats::default();
        let mut ticker = self.ticker();
        tokio::pin!(shutdown);

        let mut calls = 0;
        while !self.exhausted(calls) {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Polling stopped after {} call(s)", calls);
                    break;
                }
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Polling stopped during call {}", calls + 1);
                    break;
                }
                outcome = task(calls) => outcome,
            };
            calls += 1;

            match outcome {
                Ok(_) => stats.succeeded += 1,
                Err(e) => {
                    log::error!("Poll {} failed: {}", calls, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }

    /// Poll `probe` until it yields a value.
    ///
    /// Probe errors count as an unsuccessful poll. Without an iteration
    /// bound this waits forever.
    pub async fn until<F, Fut, T>(&self, mut probe: F) -> ClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<Option<T>>>,
    {
        let mut ticker = self.ticker();
        let mut calls = 0;

        while !self.exhausted(calls) {
            ticker.tick().await;
            calls += 1;

            match probe().await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => log::debug!("Poll {}: not ready", calls),
                Err(e) => log::warn!("Poll {} failed: {}", calls, e),
            }
        }

        Err(ClientError::PollExhausted(calls))
    }
}
