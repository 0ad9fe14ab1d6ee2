//! Deposit allocation.
//!
//! Splits a cash deposit across a fixed set of assets so the portfolio moves
//! toward its target weights. Allocation runs in two phases against the
//! post-deposit total:
//!
//! 1. **Deficit phase** - assets more than [`DEFICIT_TOLERANCE`] below target
//!    are funded first, in proportion to their shortfall.
//! 2. **Remainder phase** - whatever is left is spread across all assets by
//!    target weight.
//!
//! The fractional buys are then rounded to whole currency units with
//! [`largest_remainder_round`] so they sum to the deposit exactly.

use log::{debug, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{TopupError, TopupResult};
use crate::plan::AllocationPlan;
use crate::rounding::{largest_remainder_round, round_half_up};
use crate::types::{AllocationResult, AssetSpec};

/// An asset is only in deficit when it sits more than one percentage point
/// below its target.
pub const DEFICIT_TOLERANCE: Decimal = dec!(0.01);

/// Decimal places used for reported percentages.
const PCT_DP: u32 = 1;

/// Computes the buy for each asset that brings the portfolio toward target.
///
/// `current_values` and `assets` are aligned by position. The returned
/// results are in asset order, their `buy` fields are non-negative whole
/// units, and they sum to `deposit` exactly.
///
/// When holdings and deposit are all zero every asset reports zero
/// percentages and a deviation of `-target`.
///
/// # Errors
///
/// Returns [`TopupError::InvalidInput`] when the lengths differ, the deposit
/// or a holding is negative, the deposit is not a whole number of units, a
/// target lies outside 0-100, a positive deposit has no assets to go to, or
/// the remainder phase is reached with all targets at zero.
///
/// # Example
///
/// ```rust
/// use rust_decimal_macros::dec;
/// use topup_core::{allocate, AssetSpec};
///
/// let assets = vec![
///     AssetSpec::new("EQ", "Equities", dec!(60)),
///     AssetSpec::new("BD", "Bonds", dec!(40)),
/// ];
/// let results = allocate(&[dec!(600), dec!(400)], dec!(1000), &assets).unwrap();
///
/// assert_eq!(results[0].buy, 600);
/// assert_eq!(results[1].buy, 400);
/// ```
pub fn allocate(
    current_values: &[Decimal],
    deposit: Decimal,
    assets: &[AssetSpec],
) -> TopupResult<Vec<AllocationResult>> {
    let deposit_units = validate(current_values, deposit, assets)?;

    let total_after = portfolio_total(current_values, deposit)?;
    if total_after.is_zero() {
        return Ok(assets.iter().map(AllocationResult::empty_portfolio).collect());
    }

    let raw_buys = fractional_buys(current_values, deposit, assets, total_after)?;
    let buys = largest_remainder_round(&raw_buys, deposit_units)?;

    Ok(assets
        .iter()
        .zip(current_values)
        .zip(buys)
        .map(|((asset, &value), buy)| assemble(asset, value, buy, total_after))
        .collect())
}

/// Like [`allocate`], wrapping the results in an [`AllocationPlan`].
pub fn allocate_plan(
    current_values: &[Decimal],
    deposit: Decimal,
    assets: &[AssetSpec],
) -> TopupResult<AllocationPlan> {
    let results = allocate(current_values, deposit, assets)?;
    let total_after = portfolio_total(current_values, deposit)?;
    Ok(AllocationPlan::new(results, deposit, total_after))
}

fn out_of_range() -> TopupError {
    TopupError::invalid_input("portfolio total out of range")
}

/// Holdings plus deposit, rejecting totals a `Decimal` cannot represent.
fn portfolio_total(current_values: &[Decimal], deposit: Decimal) -> TopupResult<Decimal> {
    current_values
        .iter()
        .try_fold(deposit, |acc, value| acc.checked_add(*value))
        .ok_or_else(out_of_range)
}

/// `a * b / c`, multiplying first so exact quotients stay exact.
fn mul_div(a: Decimal, b: Decimal, c: Decimal) -> TopupResult<Decimal> {
    a.checked_mul(b)
        .and_then(|product| product.checked_div(c))
        .ok_or_else(out_of_range)
}

/// Checks preconditions and returns the deposit in whole units.
fn validate(current_values: &[Decimal], deposit: Decimal, assets: &[AssetSpec]) -> TopupResult<i64> {
    if current_values.len() != assets.len() {
        return Err(TopupError::invalid_input(format!(
            "expected {} holdings, got {}",
            assets.len(),
            current_values.len()
        )));
    }

    if deposit < Decimal::ZERO {
        return Err(TopupError::invalid_input(format!(
            "deposit must be non-negative, got {deposit}"
        )));
    }

    if !deposit.fract().is_zero() {
        return Err(TopupError::invalid_input(format!(
            "deposit must be a whole number of currency units, got {deposit}"
        )));
    }

    let deposit_units = deposit.to_i64().ok_or_else(|| {
        TopupError::invalid_input(format!("deposit {deposit} is out of range"))
    })?;

    for (value, asset) in current_values.iter().zip(assets) {
        if *value < Decimal::ZERO {
            return Err(TopupError::invalid_input(format!(
                "holding for asset '{}' must be non-negative, got {value}",
                asset.id
            )));
        }
        if asset.target < Decimal::ZERO || asset.target > Decimal::ONE_HUNDRED {
            return Err(TopupError::invalid_input(format!(
                "target for asset '{}' must be between 0 and 100, got {}",
                asset.id, asset.target
            )));
        }
    }

    if assets.is_empty() && deposit_units > 0 {
        return Err(TopupError::invalid_input(
            "cannot allocate a deposit without any assets",
        ));
    }

    Ok(deposit_units)
}

/// Runs the deficit and remainder phases, producing unrounded buys.
fn fractional_buys(
    current_values: &[Decimal],
    deposit: Decimal,
    assets: &[AssetSpec],
    total_after: Decimal,
) -> TopupResult<Vec<Decimal>> {
    let target_fractions: Vec<Decimal> = assets.iter().map(AssetSpec::target_fraction).collect();

    // Shortfall in currency units, zero for assets within tolerance. Both
    // sides are scaled by the total, so no division rounds the comparison.
    let tolerance = DEFICIT_TOLERANCE * total_after;
    let deficits: Vec<Decimal> = current_values
        .iter()
        .zip(&target_fractions)
        .map(|(&value, &target)| {
            let deficit = target * total_after - value;
            if deficit > tolerance {
                deficit
            } else {
                Decimal::ZERO
            }
        })
        .collect();
    let total_deficit = deficits
        .iter()
        .try_fold(Decimal::ZERO, |acc, d| acc.checked_add(*d))
        .ok_or_else(out_of_range)?;

    let mut buys = vec![Decimal::ZERO; assets.len()];
    let mut remaining = deposit;

    if total_deficit > Decimal::ZERO && remaining > Decimal::ZERO {
        let funded = remaining.min(total_deficit);
        for (buy, deficit) in buys.iter_mut().zip(&deficits) {
            *buy = mul_div(*deficit, funded, total_deficit)?;
        }
        remaining -= funded;
        debug!(
            "deficit phase funded {} of {} shortfall, {} remaining",
            funded, total_deficit, remaining
        );
    }

    if remaining > Decimal::ZERO {
        let total_target: Decimal = target_fractions.iter().sum();
        if total_target.is_zero() {
            return Err(TopupError::invalid_input(
                "target weights sum to zero, cannot distribute the remaining deposit",
            ));
        }
        if total_target != Decimal::ONE {
            warn!(
                "target weights sum to {}%, remainder is normalised to their total",
                total_target * Decimal::ONE_HUNDRED
            );
        }
        for (buy, target) in buys.iter_mut().zip(&target_fractions) {
            *buy += mul_div(*target, remaining, total_target)?;
        }
        debug!("remainder phase distributed {} by target weight", remaining);
    }

    Ok(buys)
}

/// Builds the reported result for one asset.
fn assemble(asset: &AssetSpec, value: Decimal, buy: i64, total_after: Decimal) -> AllocationResult {
    let after_pct = (value + Decimal::from(buy)) / total_after * Decimal::ONE_HUNDRED;
    let current_pct = value / total_after * Decimal::ONE_HUNDRED;

    AllocationResult {
        id: asset.id.clone(),
        name: asset.name.clone(),
        current_pct: round_half_up(current_pct, PCT_DP),
        target_pct: asset.target,
        buy,
        after_pct: round_half_up(after_pct, PCT_DP),
        deviation: round_half_up(after_pct - asset.target, PCT_DP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AssetCatalog;

    fn assets() -> Vec<AssetSpec> {
        AssetCatalog::default().assets().to_vec()
    }

    fn buys(results: &[AllocationResult]) -> Vec<i64> {
        results.iter().map(|r| r.buy).collect()
    }

    #[test]
    fn test_dilution_funds_deficits_then_remainder() {
        // Against the post-deposit total of 11000 the first three assets fall
        // more than a point below target (480, 330 and 120 short), the fourth
        // only 0.6 points. The 70 left over is split 48/33/12/7.
        let results = allocate(
            &[dec!(4800), dec!(3300), dec!(1200), dec!(700)],
            dec!(1000),
            &assets(),
        )
        .unwrap();

        assert_eq!(buys(&results), vec![514, 353, 128, 5]);
        assert_eq!(results[0].after_pct, dec!(48.3));
        assert_eq!(results[3].after_pct, dec!(6.4));
        assert_eq!(results[3].deviation, dec!(-0.6));
    }

    #[test]
    fn test_deficit_funded_before_remainder() {
        // Post-deposit total 100: A sits at 20% against a 60% target.
        let assets = vec![
            AssetSpec::new("A", "A", dec!(60)),
            AssetSpec::new("B", "B", dec!(40)),
        ];
        let results = allocate(&[dec!(20), dec!(40)], dec!(40), &assets).unwrap();

        assert_eq!(buys(&results), vec![40, 0]);
        assert_eq!(results[0].after_pct, dec!(60));
        assert_eq!(results[1].after_pct, dec!(40));
    }

    #[test]
    fn test_small_gap_within_tolerance_gets_no_deficit_share() {
        // Post-deposit total 1000: both assets sit half a point under target,
        // inside tolerance, so the deposit follows targets rather than closing
        // the gaps (which would have been 5/5).
        let assets = vec![
            AssetSpec::new("A", "A", dec!(30)),
            AssetSpec::new("B", "B", dec!(70)),
        ];
        let results = allocate(&[dec!(295), dec!(695)], dec!(10), &assets).unwrap();

        assert_eq!(buys(&results), vec![3, 7]);
    }

    #[test]
    fn test_partial_deficit_funding_is_proportional() {
        // Post-deposit total 200. Gaps: A 40-25=15 pts (30 units), B 40-32.5=7.5 pts
        // (15 units), C over target. Deposit 30 < total deficit 45.
        let assets = vec![
            AssetSpec::new("A", "A", dec!(40)),
            AssetSpec::new("B", "B", dec!(40)),
            AssetSpec::new("C", "C", dec!(20)),
        ];
        let results = allocate(&[dec!(50), dec!(65), dec!(55)], dec!(30), &assets).unwrap();

        assert_eq!(buys(&results), vec![20, 10, 0]);
    }

    #[test]
    fn test_exact_half_tie_goes_to_first_asset() {
        // Fractional buys come out at exactly 12731.5 and 14530.5; rounding
        // overshoots by one and the later asset gives the unit back.
        let assets = vec![
            AssetSpec::new("A", "A", dec!(39)),
            AssetSpec::new("B", "B", dec!(39)),
        ];
        let results = allocate(&[dec!(15816), dec!(14017)], dec!(27262), &assets).unwrap();

        assert_eq!(buys(&results), vec![12732, 14530]);
    }

    #[test]
    fn test_oversized_portfolio_rejected() {
        let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let holdings = [huge, huge, Decimal::ZERO, Decimal::ZERO];

        let err = allocate(&holdings, Decimal::ZERO, &assets()).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(allocate_plan(&holdings, dec!(10), &assets()).is_err());
    }

    #[test]
    fn test_empty_portfolio_and_deposit() {
        let results = allocate(&[Decimal::ZERO; 4], Decimal::ZERO, &assets()).unwrap();

        for (r, a) in results.iter().zip(assets()) {
            assert_eq!(r.buy, 0);
            assert_eq!(r.current_pct, Decimal::ZERO);
            assert_eq!(r.after_pct, Decimal::ZERO);
            assert_eq!(r.deviation, -a.target);
        }
    }

    #[test]
    fn test_zero_deposit_keeps_percentages() {
        let results = allocate(
            &[dec!(48000), dec!(33000), dec!(12000), dec!(7000)],
            Decimal::ZERO,
            &assets(),
        )
        .unwrap();

        for r in &results {
            assert_eq!(r.buy, 0);
            assert_eq!(r.current_pct, r.after_pct);
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = allocate(&[dec!(1), dec!(2)], dec!(10), &assets()).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("expected 4 holdings, got 2"));
    }

    #[test]
    fn test_negative_deposit_rejected() {
        let err = allocate(&[Decimal::ZERO; 4], dec!(-5), &assets()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_fractional_deposit_rejected() {
        let err = allocate(&[Decimal::ZERO; 4], dec!(100.5), &assets()).unwrap_err();
        assert!(err.to_string().contains("whole number"));
    }

    #[test]
    fn test_negative_holding_rejected() {
        let err = allocate(
            &[dec!(100), dec!(-1), dec!(0), dec!(0)],
            dec!(10),
            &assets(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'2'"));
    }

    #[test]
    fn test_target_out_of_range_rejected() {
        let assets = vec![AssetSpec::new("A", "A", dec!(150))];
        assert!(allocate(&[dec!(10)], dec!(10), &assets).is_err());
    }

    #[test]
    fn test_deposit_without_assets_rejected() {
        assert!(allocate(&[], dec!(10), &[]).is_err());
        assert!(allocate(&[], Decimal::ZERO, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_all_zero_targets_with_remainder_rejected() {
        let assets = vec![
            AssetSpec::new("A", "A", Decimal::ZERO),
            AssetSpec::new("B", "B", Decimal::ZERO),
        ];
        let err = allocate(&[dec!(10), dec!(10)], dec!(10), &assets).unwrap_err();
        assert!(err.to_string().contains("sum to zero"));
    }

    #[test]
    fn test_non_hundred_targets_normalised_in_remainder() {
        // Targets 30/30: nothing in deficit once the totals are equal, so the
        // deposit splits 50/50.
        let assets = vec![
            AssetSpec::new("A", "A", dec!(30)),
            AssetSpec::new("B", "B", dec!(30)),
        ];
        let results = allocate(&[dec!(500), dec!(500)], dec!(100), &assets).unwrap();
        assert_eq!(buys(&results), vec![50, 50]);
    }

    #[test]
    fn test_inputs_not_mutated_and_deterministic() {
        let holdings = vec![dec!(10000), dec!(33000), dec!(12000), dec!(7000)];
        let catalog = assets();

        let first = allocate(&holdings, dec!(10000), &catalog).unwrap();
        let second = allocate(&holdings, dec!(10000), &catalog).unwrap();

        assert_eq!(first, second);
        assert_eq!(holdings, vec![dec!(10000), dec!(33000), dec!(12000), dec!(7000)]);
        assert_eq!(catalog, assets());
    }

    #[test]
    fn test_allocate_plan_totals() {
        let plan = allocate_plan(
            &[dec!(10000), dec!(33000), dec!(12000), dec!(7000)],
            dec!(10000),
            &assets(),
        )
        .unwrap();

        assert_eq!(plan.total_buy(), 10000);
        assert_eq!(plan.total_after(), dec!(72000));
        assert_eq!(plan.deposit(), dec!(10000));
    }
}
