//! Database models for the Bakehouse Admin Platform
//!
//! Re-exports models from the shared crate; row-mapping structs live next to
//! the services that query them.

pub use shared::models::*;
