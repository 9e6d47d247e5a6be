//! Bistro Client - ordering and reservation client core
//!
//! Talks to the restaurant REST API and keeps two pieces of client state
//! consistent with the server:
//!
//! - [`TableAvailabilityView`]: table picker that never submits a booked table
//! - [`CartState`]: server-synced cart mirror with decimal totals

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod poll;
pub mod reservation;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};

pub use cart::{CartError, CartState, CartTotals, derived_totals};
pub use poll::Poller;
pub use reservation::{
    ReservationDraft, ReservationError, TableAvailabilitySnapshot, TableAvailabilityView,
};
pub use session::Session;

// Re-export shared models for convenience
pub use shared::models;
