//! # API Route Modules
//!
//! - `users`: demo user listing and lookups, validated by the schema
//!   guard.

pub mod users;
