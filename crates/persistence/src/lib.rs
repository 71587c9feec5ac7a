//! Persistence layer for the golf sign-up backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - [`store::PgStore`], the PostgreSQL implementation of the domain stores

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use store::PgStore;
