//! Off-chain client for the credit-score agent and Switchboard pull feeds.

pub mod agent_client;
pub mod config;
pub mod crossbar;
pub mod error;
pub mod keypair;
pub mod poller;
pub mod pull_feed;
pub mod simulator;
pub mod tx_builder;

pub use error::{ClientError, ClientResult};
