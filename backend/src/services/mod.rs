//! Business logic services

pub mod auth;
pub mod export;
pub mod ingredient;
pub mod order;
pub mod payment;
pub mod recipe;
pub mod supplier;
