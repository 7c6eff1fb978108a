//! CLI command implementations

pub mod add;
pub mod config;
pub mod export;
pub mod init;
pub mod row;
pub mod show;
pub mod tree;
