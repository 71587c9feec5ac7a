//! Shared utilities and common types for the golf sign-up backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Input normalization (emails, names)
//! - Common validation logic

pub mod validation;
