//! Domain layer for the golf sign-up backend.
//!
//! This crate contains:
//! - Domain models (Session, Signup, Member)
//! - The sign-up engine, calendar and time-window rules
//! - Store traits with an in-memory implementation
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
