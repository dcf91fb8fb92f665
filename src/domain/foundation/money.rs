//! Money helpers over `rust_decimal::Decimal`.
//!
//! Amounts are stored as NUMERIC(10,2); everything here keeps two
//! decimal places so in-memory values match what the database returns.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by every money amount.
pub const MONEY_SCALE: u32 = 2;

/// Normalizes an amount to two decimal places, rounding half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Outstanding amount for a price after `paid` has been collected.
///
/// Never negative: overpayment leaves a due of zero.
pub fn due_amount(price: Decimal, paid: Decimal) -> Decimal {
    round_money((price - paid).max(Decimal::ZERO))
}

/// True if `amount` is usable as a payment or price (strictly positive).
pub fn is_positive(amount: Decimal) -> bool {
    amount > Decimal::ZERO
}
