//! Reservation table selection
//!
//! [`TableAvailabilityView`] is a synchronous state machine. The caller runs
//! the [`AvailabilityQuery`] it hands out and feeds the result back through
//! [`TableAvailabilityView::apply`]; responses for a superseded date/time are
//! dropped there (last request wins).

mod booking;
mod table_view;

pub use booking::{ReservationDraft, cancel_reservation, submit_reservation, MAX_GUESTS};
pub use table_view::{
    Availability, AvailabilityFetch, AvailabilityQuery, Reconciliation, TableAvailabilitySnapshot,
    TableAvailabilityView, TableCell, TableStatus, parse_date_time, refresh_availability,
};

use shared::models::ReservationStatus;
use thiserror::Error;

use crate::ClientError;

/// Outcome error of a reservation operation
///
/// `Display` is the human-readable reason to show the user.
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Invalid date and time: {0:?}")]
    InvalidDateTime(String),

    #[error("Table {table} does not exist (tables 1-{table_count})")]
    TableOutOfRange { table: u32, table_count: u32 },

    #[error("Please select a date and time")]
    MissingDateTime,

    #[error("Checking table availability...")]
    AvailabilityPending,

    #[error("Table availability is unknown: {0}")]
    AvailabilityUnknown(String),

    #[error("Please select at least one table for your reservation")]
    EmptySelection,

    #[error("Number of guests must be between 1 and {max} (got {0})", max = MAX_GUESTS)]
    InvalidGuestCount(i32),

    #[error("A {0} reservation can no longer be cancelled")]
    NotCancellable(ReservationStatus),

    /// Transport or server failure; `reason` is the server message when present
    #[error("{reason}")]
    Rejected {
        reason: String,
        #[source]
        source: ClientError,
    },
}

impl ReservationError {
    pub(crate) fn rejected(fallback: &'static str) -> impl FnOnce(ClientError) -> ReservationError {
        move |source| ReservationError::Rejected {
            reason: source.user_message(fallback),
            source,
        }
    }
}
