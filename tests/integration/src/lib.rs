//! credfeed integration tests
//!
//! HTTP services are replaced with `wiremock` servers; ledger behaviour is
//! exercised in-process with `solana-program-test`. The fixtures here
//! fabricate the accounts the deployed programs would have written.

pub mod rpc_mock;
