//! # Repositories
//!
//! SQLite implementations of the store contracts.

pub mod invoice;
