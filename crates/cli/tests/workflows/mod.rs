//! Workflow integration tests
//!
//! End-to-end runs of the `pr` binary across several invocations, each of
//! which reopens the results directory from disk.

pub mod build_reload;
pub mod config_cmd;
pub mod export;
