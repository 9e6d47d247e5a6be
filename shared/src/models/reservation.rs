//! Reservation Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// Statuses a guest may still cancel: exactly `PENDING` and `CONFIRMED`
    pub const CANCELLABLE: [ReservationStatus; 2] =
        [ReservationStatus::Pending, ReservationStatus::Confirmed];

    pub fn is_cancellable(self) -> bool {
        Self::CANCELLABLE.contains(&self)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Seated => "SEATED",
            ReservationStatus::Completed => "COMPLETED",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::NoShow => "NO_SHOW",
        };
        f.write_str(s)
    }
}

/// Reservation entity as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    pub reservation_date_time: NaiveDateTime,
    pub number_of_guests: i32,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    /// Legacy single-table field, still filled by older records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    #[serde(default)]
    pub table_numbers: Vec<u32>,
}

impl Reservation {
    /// All tables held by this reservation, legacy field included, sorted and deduplicated
    pub fn tables(&self) -> Vec<u32> {
        let mut tables: Vec<u32> = self
            .table_number
            .into_iter()
            .chain(self.table_numbers.iter().copied())
            .collect();
        tables.sort_unstable();
        tables.dedup();
        tables
    }
}

/// Create reservation payload (`POST reservations`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub reservation_date_time: NaiveDateTime,
    pub number_of_guests: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub table_numbers: Vec<u32>,
}
