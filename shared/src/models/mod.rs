//! Data models
//!
//! Mirrors of the backend payloads consumed by the client core.
//! All IDs are `i64` (backend `Long`), table numbers are 1-based `u32`.

pub mod cart;
pub mod menu_item;
pub mod order;
pub mod reservation;

// Re-exports
pub use cart::*;
pub use menu_item::*;
pub use order::*;
pub use reservation::*;
