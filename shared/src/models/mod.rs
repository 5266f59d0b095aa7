//! Domain models for the Bakehouse Admin Platform

mod bakery;
mod ingredient;
mod order;
mod payment;
mod recipe;
mod supplier;
mod user;

pub use bakery::*;
pub use ingredient::*;
pub use order::*;
pub use payment::*;
pub use recipe::*;
pub use supplier::*;
pub use user::*;
