//! Line amounts, subtotal and IVA (13%) totals.
//!
//! All money math uses [`Decimal`]; rounding to cents is midpoint-away-from-zero.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Costa Rican IVA, fixed at 13%.
pub const TAX_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

/// Number of decimal places money values are rounded to.
pub const MONEY_SCALE: u32 = 2;

/// Round a money value to cents.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Amount of a single line: `quantity × unit_price`, unrounded.
pub fn line_amount(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}

/// A validated line item with its computed amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedLineItem {
    /// 0-based order of entry on the form.
    pub position: i32,
    pub quantity: Decimal,
    pub description: String,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

impl PricedLineItem {
    pub fn new(position: i32, quantity: Decimal, description: String, unit_price: Decimal) -> Self {
        Self {
            position,
            quantity,
            description,
            unit_price,
            amount: line_amount(quantity, unit_price),
        }
    }
}

/// Subtotal, tax and tax-inclusive total of a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Derive tax and total from a subtotal.
    ///
    /// `total = round(subtotal × 1.13, 2)` and `tax = total - round(subtotal, 2)`,
    /// so the three printed figures always add up.
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let total = round_money(subtotal * (Decimal::ONE + TAX_RATE));
        let tax = total - round_money(subtotal);
        Self {
            subtotal,
            tax,
            total,
        }
    }

    /// Sum the line amounts and derive the totals from that subtotal.
    pub fn from_items(items: &[PricedLineItem]) -> Self {
        let subtotal: Decimal = items.iter().map(|item| item.amount).sum();
        Self::from_subtotal(subtotal)
    }

    pub fn zero() -> Self {
        Self::from_subtotal(Decimal::ZERO)
    }
}
