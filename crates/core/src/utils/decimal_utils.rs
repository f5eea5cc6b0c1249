//! Rounding rules for USD amounts and percentages.
//!
//! Every persisted or reported figure goes through these helpers so the
//! precision rule lives in one place.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{PERCENT_DECIMAL_PRECISION, USD_DECIMAL_PRECISION};

/// Rounds a USD amount to cents, half away from zero. The result always
/// carries exactly two decimals, so `1500` renders as `1500.00`.
pub fn round_usd(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(USD_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(USD_DECIMAL_PRECISION);
    rounded
}

/// Rounds a percentage to two decimals, half away from zero.
pub fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        PERCENT_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Sums unrounded USD values and applies the rounding rule once.
pub fn sum_usd<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_usd(values.into_iter().fold(Decimal::ZERO, |acc, v| acc + v))
}

/// `(delta / base) * 100`, or `None` when the base is zero.
pub fn percentage_of(delta: Decimal, base: Decimal) -> Option<Decimal> {
    if base.is_zero() {
        return None;
    }
    delta
        .checked_div(base)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round_percent)
}
