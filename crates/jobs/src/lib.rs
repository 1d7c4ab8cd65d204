//! Switchboard oracle job descriptions
//!
//! Jobs are modelled as protobuf messages (for the simulation service and
//! the on-chain feed hash) and as camelCase JSON (for printing and for the
//! crossbar `store` call).

pub mod encode;
pub mod error;
pub mod job;
pub mod presets;

pub use encode::*;
pub use error::*;
pub use job::*;
