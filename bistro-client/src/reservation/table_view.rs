//! Table availability view
//!
//! Holds the desired date/time, the reserved tables fetched for it and the
//! user's selection. A selection never contains a reserved table: toggles on
//! booked tables are refused and every accepted snapshot evicts tables that
//! became booked in the meantime.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDateTime};

use super::ReservationError;
use crate::api::ReservationService;

const EMPTY_TABLES: &BTreeSet<u32> = &BTreeSet::new();

/// Accepted input formats, tried in order
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Parse a user-entered timestamp.
///
/// Accepts `datetime-local` values (`2025-06-01T19:00`), values with seconds
/// and fractions, and RFC 3339 (the wall-clock time of the given offset is kept).
pub fn parse_date_time(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(dt) = input.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
    {
        return Some(dt);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.naive_local())
}

// ============================================================================
// Snapshot & Query
// ============================================================================

/// Immutable read of the tables booked around a date/time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAvailabilitySnapshot {
    pub date_time: NaiveDateTime,
    pub reserved_tables: BTreeSet<u32>,
}

impl TableAvailabilitySnapshot {
    pub fn new(date_time: NaiveDateTime, reserved_tables: impl IntoIterator<Item = u32>) -> Self {
        Self {
            date_time,
            reserved_tables: reserved_tables.into_iter().collect(),
        }
    }
}

/// An availability fetch issued by the view, tagged with its date/time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub date_time: NaiveDateTime,
}

impl AvailabilityQuery {
    /// Run the fetch. Never fails: errors come back as [`AvailabilityFetch::Failed`].
    pub async fn run<R: ReservationService + ?Sized>(self, service: &R) -> AvailabilityFetch {
        match service.reserved_tables(self.date_time).await {
            Ok(tables) => {
                AvailabilityFetch::Loaded(TableAvailabilitySnapshot::new(self.date_time, tables))
            }
            Err(e) => {
                tracing::warn!(date_time = %self.date_time, error = %e, "Availability fetch failed");
                AvailabilityFetch::Failed {
                    query: self,
                    reason: e.user_message("Failed to load table availability"),
                }
            }
        }
    }
}

/// Result of running an [`AvailabilityQuery`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityFetch {
    Loaded(TableAvailabilitySnapshot),
    Failed { query: AvailabilityQuery, reason: String },
}

/// What applying a fetch result did to the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Snapshot accepted; `evicted` lists selected tables that turned out booked
    Applied { evicted: BTreeSet<u32> },
    /// Result belonged to a superseded date/time and was ignored
    Stale,
    /// Fetch for the current date/time failed; availability is now unknown
    Failed { reason: String },
}

impl Reconciliation {
    /// Message for the user, if anything changed that they should know about
    pub fn notice(&self) -> Option<String> {
        match self {
            Reconciliation::Applied { evicted } if !evicted.is_empty() => {
                let tables = evicted
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!(
                    "Table(s) {tables} were just booked and have been removed from your selection"
                ))
            }
            Reconciliation::Failed { reason } => Some(reason.clone()),
            _ => None,
        }
    }
}

/// Run `query` and apply its result to a view shared between tasks.
///
/// The lock is only taken once the response is in, so other fetches and
/// toggles proceed while this one is in flight.
pub async fn refresh_availability<R: ReservationService + ?Sized>(
    view: &tokio::sync::Mutex<TableAvailabilityView>,
    service: &R,
    query: AvailabilityQuery,
) -> Reconciliation {
    let fetch = query.run(service).await;
    view.lock().await.apply(fetch)
}

// ============================================================================
// View State
// ============================================================================

/// Availability of the tables for the current date/time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Availability {
    /// No date/time chosen yet
    #[default]
    Unselected,
    /// Fetch in flight; all cells disabled
    Loading,
    /// Snapshot for the current date/time accepted
    Known,
    /// Last fetch for the current date/time failed; submission blocked
    Unknown { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Available,
    Selected,
    Booked,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStatus::Available => write!(f, "Available"),
            TableStatus::Selected => write!(f, "Selected"),
            TableStatus::Booked => write!(f, "Booked"),
        }
    }
}

/// One table as rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCell {
    pub number: u32,
    pub status: TableStatus,
    pub disabled: bool,
}

/// Table picker for one prospective reservation
#[derive(Debug, Clone)]
pub struct TableAvailabilityView {
    table_count: u32,
    date_time: Option<NaiveDateTime>,
    selection: BTreeSet<u32>,
    snapshot: Option<TableAvailabilitySnapshot>,
    availability: Availability,
}

impl TableAvailabilityView {
    /// Tables are numbered `1..=table_count`
    pub fn new(table_count: u32) -> Self {
        Self {
            table_count,
            date_time: None,
            selection: BTreeSet::new(),
            snapshot: None,
            availability: Availability::Unselected,
        }
    }

    pub fn table_count(&self) -> u32 {
        self.table_count
    }

    pub fn date_time(&self) -> Option<NaiveDateTime> {
        self.date_time
    }

    pub fn selection(&self) -> &BTreeSet<u32> {
        &self.selection
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    pub fn snapshot(&self) -> Option<&TableAvailabilitySnapshot> {
        self.snapshot.as_ref()
    }

    /// Tables booked according to the latest accepted snapshot
    pub fn reserved_tables(&self) -> &BTreeSet<u32> {
        self.snapshot
            .as_ref()
            .map(|s| &s.reserved_tables)
            .unwrap_or(EMPTY_TABLES)
    }

    pub fn is_loading(&self) -> bool {
        self.availability == Availability::Loading
    }

    /// Change the desired date/time.
    ///
    /// Always clears the selection. Empty input resets the view and returns
    /// `None`; otherwise the returned query must be run and applied.
    pub fn set_date_time(&mut self, input: &str) -> Result<Option<AvailabilityQuery>, ReservationError> {
        if input.trim().is_empty() {
            self.reset();
            return Ok(None);
        }

        let date_time = parse_date_time(input)
            .ok_or_else(|| ReservationError::InvalidDateTime(input.to_string()))?;

        self.date_time = Some(date_time);
        self.selection.clear();
        self.availability = Availability::Loading;
        tracing::debug!(%date_time, "Fetching table availability");
        Ok(Some(AvailabilityQuery { date_time }))
    }

    /// Re-issue the fetch for the current date/time, e.g. after a failure
    pub fn retry(&mut self) -> Option<AvailabilityQuery> {
        let date_time = self.date_time?;
        self.availability = Availability::Loading;
        Some(AvailabilityQuery { date_time })
    }

    /// Flip a table in or out of the selection.
    ///
    /// Returns whether the selection changed: booked tables and toggles while a
    /// fetch is in flight are ignored.
    pub fn toggle_table(&mut self, table: u32) -> Result<bool, ReservationError> {
        if table < 1 || table > self.table_count {
            return Err(ReservationError::TableOutOfRange {
                table,
                table_count: self.table_count,
            });
        }
        if self.is_loading() || self.reserved_tables().contains(&table) {
            return Ok(false);
        }

        if !self.selection.remove(&table) {
            self.selection.insert(table);
        }
        Ok(true)
    }

    /// Merge a freshly fetched snapshot.
    ///
    /// Snapshots for any date/time other than the current one are discarded.
    pub fn reconcile(&mut self, snapshot: TableAvailabilitySnapshot) -> Reconciliation {
        if self.date_time != Some(snapshot.date_time) {
            tracing::debug!(
                stale = %snapshot.date_time,
                current = ?self.date_time,
                "Discarding stale availability snapshot"
            );
            return Reconciliation::Stale;
        }

        let evicted: BTreeSet<u32> = self
            .selection
            .intersection(&snapshot.reserved_tables)
            .copied()
            .collect();
        self.selection.retain(|t| !evicted.contains(t));

        if !evicted.is_empty() {
            tracing::info!(?evicted, "Selected tables were booked concurrently");
        }
        tracing::debug!(
            date_time = %snapshot.date_time,
            reserved = snapshot.reserved_tables.len(),
            "Availability snapshot applied"
        );
        self.snapshot = Some(snapshot);
        self.availability = Availability::Known;
        Reconciliation::Applied { evicted }
    }

    /// Record a failed fetch. The previous snapshot stays in place.
    ///
    /// Returns `false` if the query was already superseded.
    pub fn fetch_failed(&mut self, query: &AvailabilityQuery, reason: impl Into<String>) -> bool {
        if self.date_time != Some(query.date_time) {
            return false;
        }
        self.availability = Availability::Unknown {
            reason: reason.into(),
        };
        true
    }

    /// Apply the result of a query run
    pub fn apply(&mut self, fetch: AvailabilityFetch) -> Reconciliation {
        match fetch {
            AvailabilityFetch::Loaded(snapshot) => self.reconcile(snapshot),
            AvailabilityFetch::Failed { query, reason } => {
                if self.fetch_failed(&query, reason.clone()) {
                    Reconciliation::Failed { reason }
                } else {
                    Reconciliation::Stale
                }
            }
        }
    }

    /// The table set to submit, or why submission is blocked
    pub fn validate_submission(&self) -> Result<BTreeSet<u32>, ReservationError> {
        match &self.availability {
            Availability::Loading => return Err(ReservationError::AvailabilityPending),
            Availability::Unknown { reason } => {
                return Err(ReservationError::AvailabilityUnknown(reason.clone()));
            }
            Availability::Unselected | Availability::Known => {}
        }
        if self.selection.is_empty() {
            return Err(ReservationError::EmptySelection);
        }
        Ok(self.selection.clone())
    }

    pub fn status(&self, table: u32) -> TableStatus {
        if self.reserved_tables().contains(&table) {
            TableStatus::Booked
        } else if self.selection.contains(&table) {
            TableStatus::Selected
        } else {
            TableStatus::Available
        }
    }

    pub fn cell(&self, table: u32) -> Option<TableCell> {
        if table < 1 || table > self.table_count {
            return None;
        }
        let status = self.status(table);
        Some(TableCell {
            number: table,
            status,
            disabled: status == TableStatus::Booked || self.is_loading(),
        })
    }

    pub fn cells(&self) -> Vec<TableCell> {
        (1..=self.table_count).filter_map(|t| self.cell(t)).collect()
    }

    /// Clear the slot after a successful submit
    pub fn mark_submitted(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.date_time = None;
        self.selection.clear();
        self.snapshot = None;
        self.availability = Availability::Unselected;
    }
}
