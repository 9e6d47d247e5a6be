use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{Order, OrderRequest};

use crate::ClientResult;
use crate::http::HttpClient;

/// Order endpoints
#[async_trait]
pub trait OrderService: Send + Sync {
    /// `POST orders`, turns the current cart into an order
    async fn place_order(&self, request: &OrderRequest) -> ClientResult<Order>;
    /// `GET orders`
    async fn list_mine(&self) -> ClientResult<Vec<Order>>;
}

/// REST implementation of [`OrderService`]
#[derive(Debug)]
pub struct OrderApi<H> {
    http: Arc<H>,
}

impl<H> Clone for OrderApi<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<H: HttpClient> OrderApi<H> {
    pub fn new(http: Arc<H>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<H: HttpClient> OrderService for OrderApi<H> {
    async fn place_order(&self, request: &OrderRequest) -> ClientResult<Order> {
        self.http.post("orders", request).await
    }

    async fn list_mine(&self) -> ClientResult<Vec<Order>> {
        self.http.get("orders").await
    }
}
