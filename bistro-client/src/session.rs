//! Session context
//!
//! One `Session` is created at the application root and handed to whatever
//! needs the API. Components get their own state (a cart mirror, a table
//! picker) from it instead of reaching for globals. Each service handed out
//! shares the session's transport and keeps it alive after the session is
//! gone, so discard those components on logout as well.

use std::sync::Arc;

use crate::api::{CartApi, OrderApi, ReservationApi};
use crate::cart::CartState;
use crate::reservation::TableAvailabilityView;
use crate::{ClientConfig, ClientResult, NetworkHttpClient};

/// Authenticated connection to the restaurant API
#[derive(Debug, Clone)]
pub struct Session {
    config: ClientConfig,
    http: Arc<NetworkHttpClient>,
}

impl Session {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Arc::new(config.build_http_client()?);
        tracing::info!(
            base_url = %http.base_url(),
            authenticated = config.token.is_some(),
            "Session created"
        );
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.config.token.is_some()
    }

    pub fn cart_api(&self) -> CartApi<NetworkHttpClient> {
        CartApi::new(Arc::clone(&self.http))
    }

    pub fn reservation_api(&self) -> ReservationApi<NetworkHttpClient> {
        ReservationApi::new(Arc::clone(&self.http))
    }

    pub fn order_api(&self) -> OrderApi<NetworkHttpClient> {
        OrderApi::new(Arc::clone(&self.http))
    }

    /// A fresh cart mirror; call `refresh()` on it to load the server cart
    pub fn cart(&self) -> CartState<CartApi<NetworkHttpClient>> {
        CartState::new(self.cart_api(), self.config.tax_rate)
    }

    /// A fresh table picker sized for this deployment
    pub fn table_view(&self) -> TableAvailabilityView {
        TableAvailabilityView::new(self.config.table_count)
    }

    /// End the session.
    ///
    /// Returns how many components created from it still hold the transport;
    /// they keep sending the old token until the caller drops them.
    pub fn logout(self) -> usize {
        let outstanding = Arc::strong_count(&self.http) - 1;
        tracing::info!(outstanding, "Session closed");
        outstanding
    }
}
