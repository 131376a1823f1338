//! IPC handler implementations.

pub mod audit;
pub mod health;
pub mod mutation;
pub mod presence;
pub mod users;
