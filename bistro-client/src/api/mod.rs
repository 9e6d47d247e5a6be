//! Typed REST services
//!
//! Each service is a trait so components can be driven by an in-memory fake
//! in tests; the `*Api` structs implement them over any [`HttpClient`].
//!
//! [`HttpClient`]: crate::http::HttpClient

mod cart;
mod order;
mod reservation;

pub use cart::{CartApi, CartService};
pub use order::{OrderApi, OrderService};
pub use reservation::{ReservationApi, ReservationService, format_date_time};
