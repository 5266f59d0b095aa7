//! Shared types and models for the Bakehouse Admin Platform
//!
//! This crate contains types shared between the backend, the admin dashboard
//! (via WASM), and other components of the system, along with the pure
//! stock-derivation and recipe-costing logic they all rely on.

pub mod costing;
pub mod models;
pub mod stock;
pub mod types;
pub mod validation;

pub use costing::*;
pub use models::*;
pub use stock::*;
pub use types::*;
pub use validation::*;
