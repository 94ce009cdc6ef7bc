//! # Phi Support
//!
//! Shared utilities for the Phi container crates:
//! - Text rendering for diagnostics and error messages

pub mod rendering;
