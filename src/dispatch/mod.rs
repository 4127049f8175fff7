//! Greedy multi-agent dispatching.
//!
//! Agents repeatedly pair up with their nearest unreached targets, each
//! target served by at most one agent per step, and close in on them until
//! every target is reached.

mod config;
mod dispatcher;
mod state;

pub use config::DispatchConfig;
pub use dispatcher::{DispatchSnapshot, GreedyDispatcher};
pub use state::{Agent, DispatchState, DispatchStatus, Target};
