//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic stays in full-precision `Decimal`; rounding to cents happens
//! once, at display time, through [`CartTotals::rounded`].

use rust_decimal::prelude::*;
use shared::models::CartLine;

/// Rounding strategy for displayed amounts (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;
/// Largest unit price taken at face value when summing lines
const MAX_UNIT_PRICE: i64 = 1_000_000;
/// Largest line quantity taken at face value when summing lines
const MAX_QUANTITY: i32 = 9999;

/// Subtotal, tax and total for a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    /// Totals rounded to cents for display
    pub fn rounded(&self) -> CartTotals {
        CartTotals {
            subtotal: round_money(self.subtotal),
            tax: round_money(self.tax),
            total: round_money(self.total),
        }
    }
}

/// `tax = subtotal × tax_rate`, `total = subtotal + tax`, unrounded
///
/// Saturates at `Decimal::MAX` instead of panicking on absurd server amounts.
pub fn derived_totals(subtotal: Decimal, tax_rate: Decimal) -> CartTotals {
    let tax = subtotal.saturating_mul(tax_rate);
    CartTotals {
        subtotal,
        tax,
        total: subtotal.saturating_add(tax),
    }
}

/// Round a monetary value to 2 decimal places
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of `unit_price × quantity` over the lines, unrounded.
///
/// `None` when a line is outside the plausible range (negative or above
/// `MAX_UNIT_PRICE` / `MAX_QUANTITY`) or the sum overflows.
pub fn lines_subtotal(lines: &[CartLine]) -> Option<Decimal> {
    lines.iter().try_fold(Decimal::ZERO, |acc, line| {
        let price = line.unit_price();
        if price.is_sign_negative()
            || price > Decimal::from(MAX_UNIT_PRICE)
            || !(0..=MAX_QUANTITY).contains(&line.quantity)
        {
            return None;
        }
        acc.checked_add(line.line_total()?)
    })
}
