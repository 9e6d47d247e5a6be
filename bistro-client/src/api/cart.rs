use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{CartItemRequest, CartSnapshot};

use crate::ClientResult;
use crate::http::HttpClient;

/// Cart endpoints
#[async_trait]
pub trait CartService: Send + Sync {
    /// `GET cart`
    async fn get_cart(&self) -> ClientResult<CartSnapshot>;
    /// `POST cart/items` → updated cart
    async fn add_item(&self, request: &CartItemRequest) -> ClientResult<CartSnapshot>;
    /// `PUT cart/items/{id}?quantity=n` → updated cart
    async fn update_quantity(&self, line_id: i64, quantity: i32) -> ClientResult<CartSnapshot>;
    /// `DELETE cart/items/{id}` → updated cart
    async fn remove_item(&self, line_id: i64) -> ClientResult<CartSnapshot>;
    /// `DELETE cart/clear`
    async fn clear(&self) -> ClientResult<()>;
    /// `GET cart/total`, computed server-side
    async fn total(&self) -> ClientResult<Decimal>;
}

/// REST implementation of [`CartService`]
#[derive(Debug)]
pub struct CartApi<H> {
    http: Arc<H>,
}

impl<H> Clone for CartApi<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<H: HttpClient> CartApi<H> {
    pub fn new(http: Arc<H>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<H: HttpClient> CartService for CartApi<H> {
    async fn get_cart(&self) -> ClientResult<CartSnapshot> {
        self.http.get("cart").await
    }

    async fn add_item(&self, request: &CartItemRequest) -> ClientResult<CartSnapshot> {
        self.http.post("cart/items", request).await
    }

    async fn update_quantity(&self, line_id: i64, quantity: i32) -> ClientResult<CartSnapshot> {
        self.http
            .put_with_query(&format!("cart/items/{line_id}"), &[("quantity", quantity)])
            .await
    }

    async fn remove_item(&self, line_id: i64) -> ClientResult<CartSnapshot> {
        self.http.delete(&format!("cart/items/{line_id}")).await
    }

    async fn clear(&self) -> ClientResult<()> {
        self.http.delete_empty("cart/clear").await
    }

    async fn total(&self) -> ClientResult<Decimal> {
        self.http.get("cart/total").await
    }
}
