//! Rounding helpers.
//!
//! Buys are reported in whole currency units and must add up to the deposit
//! exactly. Rounding each buy on its own can miss the total by a few units,
//! so the shortfall or overshoot is handed out with the largest-remainder
//! method.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::{TopupError, TopupResult};

/// Rounds half-up (toward positive infinity) to `dp` decimal places.
///
/// `-2.25` rounds to `-2.2` and `2.25` to `2.3`.
#[must_use]
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let scale = Decimal::from(10_i64.pow(dp));
    (value * scale + dec!(0.5)).floor() / scale
}

/// Fractional remainder of a non-negative amount.
fn remainder(value: Decimal) -> Decimal {
    value - value.floor()
}

/// Rounds each amount to a whole unit so that the rounded values sum to
/// `total` exactly.
///
/// Amounts are first rounded to the nearest unit. Any difference from
/// `total` is then corrected one unit at a time, walking the amounts in
/// descending order of fractional remainder (stable, so ties keep input
/// order). A positive difference adds units from the front of that order;
/// a negative one removes units from the back, skipping amounts already at
/// zero.
///
/// # Errors
///
/// Returns [`TopupError::InvalidInput`] if any amount or `total` is
/// negative, an amount does not fit in `i64`, or there is nothing to round
/// but `total` is non-zero.
pub fn largest_remainder_round(amounts: &[Decimal], total: i64) -> TopupResult<Vec<i64>> {
    if total < 0 {
        return Err(TopupError::invalid_input(format!(
            "rounding total must be non-negative, got {total}"
        )));
    }

    let mut rounded = amounts
        .iter()
        .map(|amount| {
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(TopupError::invalid_input(format!(
                    "cannot round negative amount {amount}"
                )));
            }
            amount
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
                .ok_or_else(|| {
                    TopupError::invalid_input(format!("amount {amount} is out of range"))
                })
        })
        .collect::<TopupResult<Vec<i64>>>()?;

    let mut error = total - rounded.iter().sum::<i64>();
    if error == 0 {
        return Ok(rounded);
    }

    let mut order: Vec<usize> = (0..amounts.len()).collect();
    order.sort_by(|&a, &b| remainder(amounts[b]).cmp(&remainder(amounts[a])));

    while error != 0 {
        let before = error;
        if error > 0 {
            for &i in &order {
                if error == 0 {
                    break;
                }
                rounded[i] += 1;
                error -= 1;
            }
        } else {
            for &i in order.iter().rev() {
                if error == 0 {
                    break;
                }
                if rounded[i] > 0 {
                    rounded[i] -= 1;
                    error += 1;
                }
            }
        }

        if error == before {
            return Err(TopupError::invalid_input(format!(
                "cannot distribute {total} units across {} amounts",
                amounts.len()
            )));
        }
    }

    Ok(rounded)
}
