//! Cart mirror and checkout
//!
//! [`CartState`] keeps a read-only copy of the server cart. Mutations are
//! never applied optimistically: the local copy only changes once the server
//! has answered, and every successful mutation goes through
//! [`CartState::refresh_after_mutation`].

mod money;
mod state;

pub use money::{CartTotals, derived_totals, lines_subtotal, round_money};
pub use state::CartState;

use thiserror::Error;

use crate::ClientError;

/// Outcome error of a cart operation
///
/// `Display` is the human-readable reason to show the user.
#[derive(Debug, Error)]
pub enum CartError {
    /// Caught before any network call
    #[error("Quantity must be at least 1 (got {0})")]
    InvalidQuantity(i32),

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("A delivery address is required for delivery orders")]
    MissingDeliveryAddress,

    /// Transport or server failure; `reason` is the server message when present
    #[error("{reason}")]
    Rejected {
        reason: String,
        #[source]
        source: ClientError,
    },
}

impl CartError {
    pub(crate) fn rejected(fallback: &'static str) -> impl FnOnce(ClientError) -> CartError {
        move |source| CartError::Rejected {
            reason: source.user_message(fallback),
            source,
        }
    }

    /// True when the operation was refused locally without a request
    pub fn is_validation(&self) -> bool {
        !matches!(self, CartError::Rejected { .. })
    }
}
