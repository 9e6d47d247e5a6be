//! Reservation submission and cancellation

use shared::models::{Reservation, ReservationRequest};

use super::{ReservationError, TableAvailabilityView};
use crate::api::ReservationService;

/// Largest party accepted by the booking form
pub const MAX_GUESTS: i32 = 20;

/// The non-table part of a reservation form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

impl ReservationDraft {
    pub fn new(number_of_guests: i32) -> Self {
        Self {
            number_of_guests,
            special_requests: None,
        }
    }

    pub fn with_special_requests(mut self, requests: impl Into<String>) -> Self {
        self.special_requests = Some(requests.into());
        self
    }
}

impl TableAvailabilityView {
    /// Build the request to submit from the current slot and the draft
    pub fn submission(&self, draft: &ReservationDraft) -> Result<ReservationRequest, ReservationError> {
        let date_time = self.date_time().ok_or(ReservationError::MissingDateTime)?;
        let tables = self.validate_submission()?;
        if !(1..=MAX_GUESTS).contains(&draft.number_of_guests) {
            return Err(ReservationError::InvalidGuestCount(draft.number_of_guests));
        }

        Ok(ReservationRequest {
            reservation_date_time: date_time,
            number_of_guests: draft.number_of_guests,
            special_requests: draft
                .special_requests
                .clone()
                .filter(|s| !s.trim().is_empty()),
            table_numbers: tables.into_iter().collect(),
        })
    }
}

/// Submit the slot held by `view`.
///
/// On success the slot is cleared. On failure the view is left as it was; the
/// server also rejects tables booked between the last fetch and this submit,
/// in which case the caller should [`retry`](TableAvailabilityView::retry) the
/// availability fetch.
pub async fn submit_reservation<R: ReservationService + ?Sized>(
    view: &mut TableAvailabilityView,
    service: &R,
    draft: &ReservationDraft,
) -> Result<Reservation, ReservationError> {
    let request = view.submission(draft)?;

    let reservation = service
        .create(&request)
        .await
        .map_err(ReservationError::rejected("Failed to create reservation"))?;
    tracing::info!(
        reservation_id = reservation.id,
        date_time = %reservation.reservation_date_time,
        tables = ?request.table_numbers,
        "Reservation created"
    );
    view.mark_submitted();
    Ok(reservation)
}

/// Cancel a reservation, refusing locally unless it is PENDING or CONFIRMED
pub async fn cancel_reservation<R: ReservationService + ?Sized>(
    service: &R,
    reservation: &Reservation,
) -> Result<(), ReservationError> {
    if !reservation.status.is_cancellable() {
        return Err(ReservationError::NotCancellable(reservation.status));
    }

    service
        .cancel(reservation.id)
        .await
        .map_err(ReservationError::rejected("Failed to cancel reservation"))?;
    tracing::info!(reservation_id = reservation.id, "Reservation cancelled");
    Ok(())
}
