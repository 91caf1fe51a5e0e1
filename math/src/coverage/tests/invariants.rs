use super::*;
use crate::coverage::types::AssetReserve;
use crate::coverage::*;
use crate::test_utils::{amplification, coverage_ratio, prop_assert_approx_eq, wad_amount, MAX_RESERVE, MIN_RESERVE};
use crate::types::SignedWad;
use crate::wad::{mul_div_floor, wmul};
use proptest::prelude::*;
use proptest::proptest;

fn liability() -> impl Strategy<Value = Balance> {
	wad_amount(MIN_RESERVE, MAX_RESERVE)
}

fn haircut() -> impl Strategy<Value = Balance> {
	0..WAD / 100
}

fn reserve(liability: Balance, ratio: Balance) -> AssetReserve {
	AssetReserve::new(mul_div_floor(liability, ratio, WAD).unwrap(), liability)
}

/// Rounding budget for invariant comparisons, relative to the cash involved.
fn tolerance(x: &AssetReserve, y: &AssetReserve) -> Balance {
	(x.cash + y.cash) / 1_000_000_000_000
}

fn abs_diff(a: SignedWad, b: SignedWad) -> Balance {
	a.checked_sub(b).unwrap().abs_balance().unwrap()
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn swap_should_conserve_invariant(
		lx in liability(),
		ly in liability(),
		rx in coverage_ratio(),
		ry in coverage_ratio(),
		amp in amplification(),
		fraction in 1u128..100,
	) {
		let x = reserve(lx, rx);
		let y = reserve(ly, ry);
		let amount = lx / 1000 * fraction;

		let dy = swap_quote(x, y, SignedWad::from(amount), amp).unwrap();
		prop_assume!(dy < y.cash);

		let before = calculate_invariant(x, y, amp).unwrap();
		let after = calculate_invariant(
			AssetReserve::new(x.cash + amount, x.liability),
			AssetReserve::new(y.cash - dy, y.liability),
			amp,
		).unwrap();

		prop_assert!(abs_diff(before, after) <= tolerance(&x, &y));
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn output_should_grow_with_input(
		lx in liability(),
		ly in liability(),
		rx in coverage_ratio(),
		ry in coverage_ratio(),
		amp in amplification(),
		fraction in 1u128..100,
	) {
		let x = reserve(lx, rx);
		let y = reserve(ly, ry);
		let amount = lx / 1000 * fraction;

		let smaller = swap_quote(x, y, SignedWad::from(amount), amp).unwrap();
		let bigger = swap_quote(x, y, SignedWad::from(amount + WAD), amp).unwrap();

		prop_assert!(bigger > smaller);
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(500))]
	#[test]
	fn reverse_quote_should_recover_input_within_haircut(
		lx in liability(),
		ly in liability(),
		rx in coverage_ratio(),
		ry in coverage_ratio(),
		amp in amplification(),
		haircut_rate in haircut(),
		fraction in 1u128..100,
	) {
		let x = reserve(lx, rx);
		let y = reserve(ly, ry);
		let from = AssetSnapshot { reserve: x, ..AssetSnapshot::new(0, 0) };
		let to = AssetSnapshot { reserve: y, ..AssetSnapshot::new(0, 0) };
		let params = SwapParameters { amplification: amp, haircut_rate, fee_band: None };
		let amount = lx / 1000 * fraction;

		let out = calculate_out_given_in(&from, &to, amount, &params).unwrap();
		let back = calculate_in_given_out(&from, &to, out.amount, &params).unwrap();

		let max_diff = wmul(amount, 2 * haircut_rate).unwrap() + tolerance(&x, &y);
		prop_assert_approx_eq!(back.amount, amount, max_diff, "reverse quote drifted");
	}

	#[test]
	fn reverse_quote_should_cover_requested_output(
		lx in liability(),
		ly in liability(),
		rx in coverage_ratio(),
		ry in coverage_ratio(),
		amp in amplification(),
		haircut_rate in haircut(),
		fraction in 1u128..100,
		dust in 0u128..1_000_000,
	) {
		let from = AssetSnapshot { reserve: reserve(lx, rx), ..AssetSnapshot::new(0, 0) };
		let to = AssetSnapshot { reserve: reserve(ly, ry), ..AssetSnapshot::new(0, 0) };
		let params = SwapParameters { amplification: amp, haircut_rate, fee_band: None };

		let out = calculate_out_given_in(&from, &to, lx / 1000 * fraction, &params).unwrap();
		let requested = out.amount + dust;
		let quote = calculate_in_given_out(&from, &to, requested, &params).unwrap();
		let paid = calculate_out_given_in(&from, &to, quote.amount, &params).unwrap();
		prop_assert!(paid.amount >= requested, "paid {} requested {}", paid.amount, requested);
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(500))]
	#[test]
	fn deposit_then_withdraw_should_not_gain(
		l in liability(),
		r in coverage_ratio(),
		amp in amplification(),
		fraction in 1u128..100,
	) {
		let before = reserve(l, r);
		let amount = l / 1000 * fraction;

		let deposit = calculate_deposit(amount, before, l, amp, WAD).unwrap();
		let after = AssetReserve::new(before.cash + amount, before.liability + deposit.liability);
		let withdraw = calculate_withdraw(deposit.shares, l + deposit.shares, after, amp, WAD, 0).unwrap();

		prop_assert!(withdraw.amount <= amount + tolerance(&before, &after));
	}
}
