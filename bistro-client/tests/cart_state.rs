// bistro-client/tests/cart_state.rs
// CartState against an in-memory cart service

use std::sync::Mutex;

use async_trait::async_trait;
use bistro_client::api::{CartService, OrderService};
use bistro_client::cart::lines_subtotal;
use bistro_client::models::{
    CartItemRequest, CartLine, CartSnapshot, MenuItemSummary, Order, OrderRequest, OrderType,
};
use bistro_client::{CartError, CartState, ClientError, ClientResult, derived_totals};
use rust_decimal::Decimal;

fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

fn price_of(menu_item_id: i64) -> Decimal {
    match menu_item_id {
        4 => Decimal::new(950, 2),  // pizza
        7 => Decimal::new(350, 2),  // espresso
        _ => Decimal::new(1000, 2),
    }
}

#[derive(Default)]
struct FakeState {
    cart: CartSnapshot,
    next_line_id: i64,
    calls: usize,
    fail_next: Option<ClientError>,
    fail_total: bool,
    total_override: Option<Decimal>,
}

/// Server-side cart kept in memory
#[derive(Default)]
struct FakeCart {
    state: Mutex<FakeState>,
}

impl FakeCart {
    fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    fn fail_next(&self, err: ClientError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    fn set_total_override(&self, total: Decimal) {
        self.state.lock().unwrap().total_override = Some(total);
    }

    fn set_fail_total(&self, fail: bool) {
        self.state.lock().unwrap().fail_total = fail;
    }

    fn mutate<F>(&self, f: F) -> ClientResult<CartSnapshot>
    where
        F: FnOnce(&mut FakeState) -> ClientResult<()>,
    {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        f(&mut *state)?;
        state.cart.subtotal = lines_subtotal(&state.cart.items).unwrap_or_default();
        Ok(state.cart.clone())
    }
}

#[async_trait]
impl CartService for FakeCart {
    async fn get_cart(&self) -> ClientResult<CartSnapshot> {
        self.mutate(|_| Ok(()))
    }

    async fn add_item(&self, request: &CartItemRequest) -> ClientResult<CartSnapshot> {
        let request = request.clone();
        self.mutate(move |state| {
            if let Some(line) = state.cart.items.iter_mut().find(|l| {
                l.menu_item.id == request.menu_item_id && l.customizations == request.customizations
            }) {
                line.quantity += request.quantity;
                line.subtotal = line.line_total().unwrap_or_default();
                return Ok(());
            }
            state.next_line_id += 1;
            let price = price_of(request.menu_item_id);
            state.cart.items.push(CartLine {
                id: state.next_line_id,
                menu_item: MenuItemSummary {
                    id: request.menu_item_id,
                    name: format!("Item {}", request.menu_item_id),
                    price,
                    description: None,
                    image_url: None,
                    available: Some(true),
                },
                quantity: request.quantity,
                customizations: request.customizations,
                subtotal: price * Decimal::from(request.quantity),
            });
            Ok(())
        })
    }

    async fn update_quantity(&self, line_id: i64, quantity: i32) -> ClientResult<CartSnapshot> {
        self.mutate(|state| {
            let line = state
                .cart
                .items
                .iter_mut()
                .find(|l| l.id == line_id)
                .ok_or_else(|| ClientError::NotFound("Cart item not found".into()))?;
            line.quantity = quantity;
            line.subtotal = line.line_total().unwrap_or_default();
            Ok(())
        })
    }

    async fn remove_item(&self, line_id: i64) -> ClientResult<CartSnapshot> {
        self.mutate(|state| {
            state.cart.items.retain(|l| l.id != line_id);
            Ok(())
        })
    }

    async fn clear(&self) -> ClientResult<()> {
        self.mutate(|state| {
            state.cart.items.clear();
            Ok(())
        })
        .map(|_| ())
    }

    async fn total(&self) -> ClientResult<Decimal> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.fail_total {
            return Err(ClientError::Internal("total unavailable".into()));
        }
        Ok(state
            .total_override
            .unwrap_or_else(|| lines_subtotal(&state.cart.items).unwrap_or_default()))
    }
}

struct FakeOrders {
    fail: bool,
}

#[async_trait]
impl OrderService for FakeOrders {
    async fn place_order(&self, request: &OrderRequest) -> ClientResult<Order> {
        if self.fail {
            return Err(ClientError::Api {
                status: 400,
                code: None,
                message: "Cart is empty".into(),
            });
        }
        Ok(Order {
            id: 501,
            total_amount: Decimal::new(1900, 2),
            status: "PENDING".into(),
            order_type: request.order_type,
            delivery_address: request.delivery_address.clone(),
            special_instructions: request.special_instructions.clone(),
            ordered_at: None,
            order_items: Vec::new(),
        })
    }

    async fn list_mine(&self) -> ClientResult<Vec<Order>> {
        Ok(Vec::new())
    }
}

/// Returns one line whose `price × quantity` does not fit in a `Decimal`
struct OversizedCart;

fn oversized_line() -> CartLine {
    CartLine {
        id: 1,
        menu_item: MenuItemSummary {
            id: 1,
            name: "Gold leaf tasting".into(),
            price: Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0),
            description: None,
            image_url: None,
            available: Some(true),
        },
        quantity: 2,
        customizations: None,
        subtotal: Decimal::MAX,
    }
}

#[async_trait]
impl CartService for OversizedCart {
    async fn get_cart(&self) -> ClientResult<CartSnapshot> {
        Ok(CartSnapshot {
            id: Some(1),
            items: vec![oversized_line()],
            subtotal: Decimal::MAX,
        })
    }

    async fn add_item(&self, _request: &CartItemRequest) -> ClientResult<CartSnapshot> {
        self.get_cart().await
    }

    async fn update_quantity(&self, _line_id: i64, _quantity: i32) -> ClientResult<CartSnapshot> {
        self.get_cart().await
    }

    async fn remove_item(&self, _line_id: i64) -> ClientResult<CartSnapshot> {
        self.get_cart().await
    }

    async fn clear(&self) -> ClientResult<()> {
        Ok(())
    }

    async fn total(&self) -> ClientResult<Decimal> {
        Ok(Decimal::MAX)
    }
}

#[tokio::test]
async fn test_add_item_then_totals() {
    let mut cart = CartState::new(FakeCart::default(), tax_rate());

    cart.add_item(4, 2, None).await.unwrap();

    let line = &cart.snapshot().items[0];
    assert_eq!(line.quantity, 2);
    assert_eq!(line.unit_price(), Decimal::new(950, 2));
    assert_eq!(cart.subtotal(), Decimal::new(1900, 2));

    let totals = cart.totals();
    assert_eq!(totals, derived_totals(Decimal::new(1900, 2), tax_rate()));
    assert_eq!(totals.tax, Decimal::new(190, 2));
    assert_eq!(totals.total, Decimal::new(2090, 2));
    assert_eq!(cart.item_count(), 2);
}

#[tokio::test]
async fn test_add_item_keeps_customizations_apart() {
    let mut cart = CartState::new(FakeCart::default(), tax_rate());
    cart.add_item(7, 1, Some("oat milk".into())).await.unwrap();
    cart.add_item(7, 1, Some("   ".into())).await.unwrap();
    cart.add_item(7, 2, None).await.unwrap();

    let items = &cart.snapshot().items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].customizations.as_deref(), Some("oat milk"));
    assert_eq!(items[1].customizations, None);
    assert_eq!(items[1].quantity, 3);
    assert_eq!(cart.subtotal(), Decimal::new(1400, 2));
}

#[tokio::test]
async fn test_mutations_count_requests() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());

    cart.add_item(4, 1, None).await.unwrap();
    assert_eq!(service.calls(), 2);

    let line_id = cart.snapshot().items[0].id;
    cart.update_quantity(line_id, 3).await.unwrap();
    assert_eq!(service.calls(), 4);
    assert_eq!(cart.snapshot().items[0].quantity, 3);
    assert_eq!(cart.subtotal(), Decimal::new(2850, 2));

    cart.remove_item(line_id).await.unwrap();
    assert_eq!(service.calls(), 6);
    assert!(cart.snapshot().is_empty());
    assert_eq!(cart.subtotal(), Decimal::ZERO);
}

#[tokio::test]
async fn test_zero_quantity_is_rejected_without_network() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());
    cart.add_item(4, 2, None).await.unwrap();
    let before = cart.snapshot().clone();
    let calls = service.calls();

    let line_id = before.items[0].id;
    let err = cart.update_quantity(line_id, 0).await.unwrap_err();
    assert!(matches!(err, CartError::InvalidQuantity(0)));
    assert!(err.is_validation());
    assert_eq!(service.calls(), calls);
    assert_eq!(cart.snapshot(), &before);

    let err = cart.add_item(4, 0, None).await.unwrap_err();
    assert!(matches!(err, CartError::InvalidQuantity(0)));
    assert_eq!(service.calls(), calls);
}

#[tokio::test]
async fn test_failed_mutation_keeps_snapshot_and_reports_server_reason() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());
    cart.add_item(4, 2, None).await.unwrap();
    let before = cart.snapshot().clone();

    service.fail_next(ClientError::Api {
        status: 400,
        code: None,
        message: "Menu item is not available".into(),
    });
    let err = cart.add_item(9, 1, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Menu item is not available");
    assert!(!err.is_validation());
    assert_eq!(cart.snapshot(), &before);
}

#[tokio::test]
async fn test_failed_mutation_without_reason_uses_fallback() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());
    cart.add_item(4, 1, None).await.unwrap();
    let line_id = cart.snapshot().items[0].id;

    service.fail_next(ClientError::Internal(String::new()));
    let err = cart.remove_item(line_id).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to remove item");
    assert_eq!(cart.snapshot().items.len(), 1);

    service.fail_next(ClientError::Unauthorized);
    let err = cart.update_quantity(line_id, 2).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to update quantity");
}

#[tokio::test]
async fn test_server_total_wins_over_line_sum() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());

    // e.g. a server-side promotion the lines do not show
    service.set_total_override(Decimal::new(1710, 2));
    cart.add_item(4, 2, None).await.unwrap();
    assert_eq!(lines_subtotal(&cart.snapshot().items), Some(Decimal::new(1900, 2)));
    assert_eq!(cart.subtotal(), Decimal::new(1710, 2));
}

#[tokio::test]
async fn test_total_refetch_failure_keeps_returned_cart() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());

    service.set_fail_total(true);
    cart.add_item(4, 2, None).await.unwrap();
    assert_eq!(cart.snapshot().items.len(), 1);
    assert_eq!(cart.subtotal(), Decimal::new(1900, 2));
}

#[tokio::test]
async fn test_refresh_loads_cart_and_total() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut seeded = CartState::new(SharedCart(service.clone()), tax_rate());
    seeded.add_item(7, 3, None).await.unwrap();

    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());
    assert!(cart.snapshot().is_empty());
    cart.refresh().await.unwrap();
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.subtotal(), Decimal::new(1050, 2));

    service.set_fail_total(true);
    let before = cart.snapshot().clone();
    let err = cart.refresh().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to load cart");
    assert_eq!(cart.snapshot(), &before);
}

#[tokio::test]
async fn test_clear_cart_does_not_refetch() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());
    cart.add_item(4, 2, None).await.unwrap();
    let calls = service.calls();

    cart.clear_cart().await.unwrap();
    assert_eq!(service.calls(), calls + 1);
    assert!(cart.snapshot().is_empty());
    assert_eq!(cart.subtotal(), Decimal::ZERO);
    assert_eq!(cart.totals().total, Decimal::ZERO);
}

#[tokio::test]
async fn test_clear_cart_failure_keeps_lines() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());
    cart.add_item(4, 2, None).await.unwrap();

    service.fail_next(ClientError::Internal("db down".into()));
    let err = cart.clear_cart().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to clear cart");
    assert_eq!(cart.item_count(), 2);
}

#[tokio::test]
async fn test_checkout_rules() {
    let service = std::sync::Arc::new(FakeCart::default());
    let mut cart = CartState::new(SharedCart(service.clone()), tax_rate());
    let orders = FakeOrders { fail: false };

    let err = cart
        .checkout(&orders, OrderRequest::new(OrderType::DineIn))
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::EmptyCart));

    cart.add_item(4, 2, None).await.unwrap();
    let err = cart
        .checkout(&orders, OrderRequest::new(OrderType::Delivery).with_delivery_address(" "))
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::MissingDeliveryAddress));

    let failing = FakeOrders { fail: true };
    let err = cart
        .checkout(&failing, OrderRequest::new(OrderType::Takeaway))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cart is empty");
    assert_eq!(cart.item_count(), 2);

    let order = cart
        .checkout(
            &orders,
            OrderRequest::new(OrderType::Delivery).with_delivery_address("1 Main St"),
        )
        .await
        .unwrap();
    assert_eq!(order.id, 501);
    assert_eq!(order.delivery_address.as_deref(), Some("1 Main St"));
    assert!(cart.snapshot().is_empty());
    assert_eq!(cart.subtotal(), Decimal::ZERO);
}

/// Lets a test keep a handle on the fake while the cart owns the service
struct SharedCart(std::sync::Arc<FakeCart>);

#[async_trait]
impl CartService for SharedCart {
    async fn get_cart(&self) -> ClientResult<CartSnapshot> {
        self.0.get_cart().await
    }

    async fn add_item(&self, request: &CartItemRequest) -> ClientResult<CartSnapshot> {
        self.0.add_item(request).await
    }

    async fn update_quantity(&self, line_id: i64, quantity: i32) -> ClientResult<CartSnapshot> {
        self.0.update_quantity(line_id, quantity).await
    }

    async fn remove_item(&self, line_id: i64) -> ClientResult<CartSnapshot> {
        self.0.remove_item(line_id).await
    }

    async fn clear(&self) -> ClientResult<()> {
        self.0.clear().await
    }

    async fn total(&self) -> ClientResult<Decimal> {
        self.0.total().await
    }
}

#[tokio::test]
async fn test_huge_server_amounts_do_not_panic() {
    let mut cart = CartState::new(OversizedCart, tax_rate());

    cart.add_item(1, 1, None).await.unwrap();
    assert_eq!(cart.subtotal(), Decimal::MAX);
    cart.update_quantity(1, 3).await.unwrap();
    cart.remove_item(1).await.unwrap();

    let totals = cart.totals();
    assert_eq!(totals.total, Decimal::MAX);
    assert_eq!(lines_subtotal(&cart.snapshot().items), None);
}
