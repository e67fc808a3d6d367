//! Shared numeric helpers.
//!
//! Calculations keep full `Decimal` precision internally; rounding happens
//! only where a result leaves a public entry point.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to whole currency units, halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::round_to_unit;
///
/// assert_eq!(round_to_unit(dec!(13685.82)), dec!(13686));
/// assert_eq!(round_to_unit(dec!(1925.5)), dec!(1926));
/// assert_eq!(round_to_unit(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to cents, halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps negative values to zero.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Converts a percentage (`3.5`) to a fraction (`0.035`).
pub fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Share of a year covered by `months` monthly installments.
pub fn year_fraction(months: u32) -> Decimal {
    Decimal::from(months) / Decimal::from(12)
}
