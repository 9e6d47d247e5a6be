//! Shared types for the Bistro client
//!
//! Wire DTOs exchanged with the restaurant REST backend. Field names follow the
//! backend's camelCase JSON; amounts are `rust_decimal::Decimal`.

pub mod error;
pub mod models;

// Re-exports
pub use error::ApiErrorBody;
pub use serde::{Deserialize, Serialize};
