//! Shared building blocks for talking to the credit-score agent program,
//! the LLM oracle program and the Switchboard on-demand program.
//!
//! Everything in this crate is pure: address derivation, Anchor byte
//! layout, account decoding and instruction construction. Network access
//! lives in `credfeed-client`.

pub mod accounts;
pub mod anchor;
pub mod error;
pub mod ids;
pub mod instructions;
pub mod pda;

pub use accounts::*;
pub use error::*;
pub use ids::*;
pub use instructions::*;
pub use pda::*;
