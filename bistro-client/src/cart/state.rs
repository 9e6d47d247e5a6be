use rust_decimal::Decimal;
use shared::models::{CartItemRequest, CartSnapshot, Order, OrderRequest, OrderType};

use super::money::{CartTotals, derived_totals, lines_subtotal};
use super::CartError;
use crate::api::{CartService, OrderService};

/// Local mirror of the server-owned cart
#[derive(Debug)]
pub struct CartState<S> {
    service: S,
    snapshot: CartSnapshot,
    tax_rate: Decimal,
}

impl<S: CartService> CartState<S> {
    /// Starts from a known-empty cart; call [`refresh`](Self::refresh) to load it
    pub fn new(service: S, tax_rate: Decimal) -> Self {
        Self {
            service,
            snapshot: CartSnapshot::empty(),
            tax_rate,
        }
    }

    pub fn snapshot(&self) -> &CartSnapshot {
        &self.snapshot
    }

    /// Server-computed subtotal
    pub fn subtotal(&self) -> Decimal {
        self.snapshot.subtotal
    }

    pub fn item_count(&self) -> i64 {
        self.snapshot.item_count()
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Totals derived from the server subtotal, unrounded
    pub fn totals(&self) -> CartTotals {
        derived_totals(self.snapshot.subtotal, self.tax_rate)
    }

    /// Load the cart and its canonical total from the server
    pub async fn refresh(&mut self) -> Result<(), CartError> {
        let cart = self
            .service
            .get_cart()
            .await
            .map_err(CartError::rejected("Failed to load cart"))?;
        let total = self
            .service
            .total()
            .await
            .map_err(CartError::rejected("Failed to load cart"))?;

        self.snapshot = CartSnapshot {
            subtotal: total,
            ..cart
        };
        tracing::debug!(
            lines = self.snapshot.items.len(),
            subtotal = %self.snapshot.subtotal,
            "Cart loaded"
        );
        Ok(())
    }

    pub async fn add_item(
        &mut self,
        menu_item_id: i64,
        quantity: i32,
        customizations: Option<String>,
    ) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let request = CartItemRequest {
            menu_item_id,
            quantity,
            customizations: customizations.filter(|c| !c.trim().is_empty()),
        };

        let updated = self
            .service
            .add_item(&request)
            .await
            .map_err(CartError::rejected("Failed to add item to cart"))?;
        tracing::info!(menu_item_id, quantity, "Item added to cart");
        self.refresh_after_mutation(updated).await;
        Ok(())
    }

    pub async fn update_quantity(&mut self, line_id: i64, new_quantity: i32) -> Result<(), CartError> {
        if new_quantity < 1 {
            return Err(CartError::InvalidQuantity(new_quantity));
        }

        let updated = self
            .service
            .update_quantity(line_id, new_quantity)
            .await
            .map_err(CartError::rejected("Failed to update quantity"))?;
        tracing::info!(line_id, new_quantity, "Cart quantity updated");
        self.refresh_after_mutation(updated).await;
        Ok(())
    }

    pub async fn remove_item(&mut self, line_id: i64) -> Result<(), CartError> {
        let updated = self
            .service
            .remove_item(line_id)
            .await
            .map_err(CartError::rejected("Failed to remove item"))?;
        tracing::info!(line_id, "Cart line removed");
        self.refresh_after_mutation(updated).await;
        Ok(())
    }

    /// Empty the cart. A cleared cart is known-empty, so no re-fetch follows.
    pub async fn clear_cart(&mut self) -> Result<(), CartError> {
        self.service
            .clear()
            .await
            .map_err(CartError::rejected("Failed to clear cart"))?;
        self.snapshot = CartSnapshot {
            id: self.snapshot.id,
            ..CartSnapshot::empty()
        };
        tracing::info!("Cart cleared");
        Ok(())
    }

    /// Install the cart returned by a successful mutation, then re-fetch the
    /// server total.
    ///
    /// The mutation has already happened, so a failed total fetch is not an
    /// error: the returned cart's own total is kept.
    pub async fn refresh_after_mutation(&mut self, updated: CartSnapshot) {
        self.snapshot = updated;

        match self.service.total().await {
            Ok(total) => {
                match lines_subtotal(&self.snapshot.items) {
                    Some(local) if local != total => {
                        tracing::debug!(%local, server = %total, "Server total differs from line sum");
                    }
                    Some(_) => {}
                    None => tracing::debug!(server = %total, "Line sum out of range, skipping check"),
                }
                self.snapshot.subtotal = total;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to re-fetch cart total, keeping cart total");
            }
        }
    }

    /// Place an order from the current cart.
    ///
    /// The server empties the cart when the order is created; the local copy
    /// follows without a re-fetch.
    pub async fn checkout<O: OrderService>(
        &mut self,
        orders: &O,
        request: OrderRequest,
    ) -> Result<Order, CartError> {
        if self.snapshot.is_empty() {
            return Err(CartError::EmptyCart);
        }
        if request.order_type == OrderType::Delivery
            && request
                .delivery_address
                .as_deref()
                .is_none_or(|a| a.trim().is_empty())
        {
            return Err(CartError::MissingDeliveryAddress);
        }

        let order = orders
            .place_order(&request)
            .await
            .map_err(CartError::rejected("Failed to place order"))?;
        tracing::info!(order_id = order.id, total = %order.total_amount, "Order placed");
        self.snapshot = CartSnapshot {
            id: self.snapshot.id,
            ..CartSnapshot::empty()
        };
        Ok(order)
    }
}
