//! Recipe graph engine
//!
//! The graph and every query or mutation on it, plus the collaborators the
//! binary wires around it: definers, the persisted store, configuration and
//! terminal output.

pub mod config;
pub mod define;
pub mod error;
pub mod expand;
pub mod graph;
pub mod merge;
pub mod name;
pub mod output;
pub mod prompt;
pub mod request;
pub mod store;
