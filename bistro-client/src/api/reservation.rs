use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::models::{Reservation, ReservationRequest};

use crate::ClientResult;
use crate::http::HttpClient;

/// Wire format of the `dateTime` query parameter
pub fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Reservation endpoints
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// `GET reservations/availability?dateTime=...` → tables booked around that time
    async fn reserved_tables(&self, date_time: NaiveDateTime) -> ClientResult<Vec<u32>>;
    /// `POST reservations`
    async fn create(&self, request: &ReservationRequest) -> ClientResult<Reservation>;
    /// `GET reservations`
    async fn list_mine(&self) -> ClientResult<Vec<Reservation>>;
    /// `GET reservations/{id}`
    async fn get(&self, id: i64) -> ClientResult<Reservation>;
    /// `DELETE reservations/{id}`
    async fn cancel(&self, id: i64) -> ClientResult<()>;
}

/// REST implementation of [`ReservationService`]
#[derive(Debug)]
pub struct ReservationApi<H> {
    http: Arc<H>,
}

impl<H> Clone for ReservationApi<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<H: HttpClient> ReservationApi<H> {
    pub fn new(http: Arc<H>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<H: HttpClient> ReservationService for ReservationApi<H> {
    async fn reserved_tables(&self, date_time: NaiveDateTime) -> ClientResult<Vec<u32>> {
        let date_time = format_date_time(date_time);
        self.http
            .get_with_query("reservations/availability", &[("dateTime", date_time.as_str())])
            .await
    }

    async fn create(&self, request: &ReservationRequest) -> ClientResult<Reservation> {
        self.http.post("reservations", request).await
    }

    async fn list_mine(&self) -> ClientResult<Vec<Reservation>> {
        self.http.get("reservations").await
    }

    async fn get(&self, id: i64) -> ClientResult<Reservation> {
        self.http.get(&format!("reservations/{id}")).await
    }

    async fn cancel(&self, id: i64) -> ClientResult<()> {
        self.http.delete_empty(&format!("reservations/{id}")).await
    }
}
