//! Common utilities for integration tests

pub mod cli;

/// Smallest valid JPEG header, enough to stand in for a rendered chart
pub const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9];
