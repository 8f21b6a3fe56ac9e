// ═══════════════════════════════════════════════════════════════════
// XIRR Tests : root-finder over irregular dated cash flows
// ═══════════════════════════════════════════════════════════════════

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use gold_tracker_core::errors::XirrError;
use gold_tracker_core::models::cash_flow::CashFlow;
use gold_tracker_core::services::xirr::{self, FLOOR_RATE, MIN_RATE};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_time(NaiveTime::MIN)
}

fn flow(amount: f64, date: NaiveDateTime) -> CashFlow {
    CashFlow::new(amount, date)
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

// ── Known answers ───────────────────────────────────────────────────

mod known_rates {
    use super::*;

    #[test]
    fn equal_and_opposite_same_day_is_zero() {
        let flows = [flow(-100.0, at(2024, 5, 1)), flow(100.0, at(2024, 5, 1))];
        assert_close(xirr::solve(&flows).unwrap(), 0.0, 1e-9);
    }

    #[test]
    fn equal_and_opposite_one_year_apart_is_zero() {
        let flows = [flow(-100.0, at(2023, 1, 1)), flow(100.0, at(2024, 1, 1))];
        assert_close(xirr::solve(&flows).unwrap(), 0.0, 1e-6);
    }

    #[test]
    fn doubling_in_exactly_one_year_is_one_hundred_percent() {
        // 2023 is not a leap year: 2023-01-01 → 2024-01-01 is 365 days
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(2000.0, at(2024, 1, 1))];
        assert_close(xirr::solve(&flows).unwrap(), 1.0, 1e-6);
    }

    #[test]
    fn ten_percent_gain() {
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(1100.0, at(2024, 1, 1))];
        assert_close(xirr::solve(&flows).unwrap(), 0.10, 1e-6);
    }

    #[test]
    fn ten_percent_loss() {
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(900.0, at(2024, 1, 1))];
        assert_close(xirr::solve(&flows).unwrap(), -0.10, 1e-6);
    }

    #[test]
    fn two_years_compounding() {
        // 1000 → 1210 over 730 days is 10% a year
        let flows = [flow(-1000.0, at(2021, 1, 1)), flow(1210.0, at(2023, 1, 1))];
        assert_close(xirr::solve(&flows).unwrap(), 0.10, 1e-6);
    }

    #[test]
    fn near_total_loss_is_representable() {
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(1.0, at(2024, 1, 1))];
        let rate = xirr::solve(&flows).unwrap();
        assert_close(rate, -0.999, 1e-6);
        assert!(rate > MIN_RATE);
    }

    #[test]
    fn loss_below_ladder_minimum_is_still_bracketed() {
        // 643 back after ten days annualizes to about -1 + 1e-7
        let flows = [flow(-1000.0, at(2024, 1, 1)), flow(643.0, at(2024, 1, 11))];
        let rate = xirr::solve(&flows).unwrap();
        assert!(rate < MIN_RATE, "got {rate}");
        assert!(rate > -1.0 + 1e-9, "got {rate}");
    }

    #[test]
    fn steeper_loss_clamps_to_floor() {
        // 20% left after ten days: the true rate is -1 + ~1e-26
        let flows = [flow(-1000.0, at(2024, 1, 1)), flow(200.0, at(2024, 1, 11))];
        assert_eq!(xirr::solve(&flows), Ok(FLOOR_RATE));
    }

    #[test]
    fn loss_rates_order_with_recovered_amount() {
        let rates: Vec<f64> = [1.0, 200.0, 643.0, 900.0, 990.0]
            .iter()
            .map(|back| xirr::solve(&[flow(-1000.0, at(2024, 1, 1)), flow(*back, at(2024, 1, 11))]).unwrap())
            .collect();
        for pair in rates.windows(2) {
            assert!(pair[1] >= pair[0], "{rates:?}");
        }
    }

    #[test]
    fn half_year_gain_is_annualized() {
        // 5% over ~half a year annualizes to more than 10%
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(1050.0, at(2023, 7, 2))];
        let rate = xirr::solve(&flows).unwrap();
        assert!(rate > 0.10 && rate < 0.11, "got {rate}");
    }
}

// ── Multiple flows ──────────────────────────────────────────────────

mod multiple_flows {
    use super::*;

    fn series() -> Vec<CashFlow> {
        vec![
            flow(-1000.0, at(2023, 1, 1)),
            flow(-500.0, at(2023, 6, 1)),
            flow(1700.0, at(2024, 1, 1)),
        ]
    }

    #[test]
    fn solved_rate_zeroes_npv() {
        let flows = series();
        let rate = xirr::solve(&flows).unwrap();
        assert!(rate > 0.10 && rate < 0.20, "got {rate}");
        assert!(xirr::npv(&flows, rate).abs() < 1e-4);
    }

    #[test]
    fn input_order_does_not_matter() {
        let flows = series();
        let mut reversed = flows.clone();
        reversed.reverse();
        let a = xirr::solve(&flows).unwrap();
        let b = xirr::solve(&reversed).unwrap();
        assert_close(a, b, 1e-9);
    }

    #[test]
    fn many_monthly_purchases() {
        let mut flows: Vec<CashFlow> = (1..=12)
            .map(|m| flow(-100.0, at(2023, m, 1)))
            .collect();
        flows.push(flow(1300.0, at(2024, 1, 1)));

        let rate = xirr::solve(&flows).unwrap();
        assert!(rate > 0.0, "got {rate}");
        assert!(xirr::npv(&flows, rate).abs() < 1e-4);
    }

    #[test]
    fn intraday_inflow_uses_fractional_days() {
        let noon = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(1100.0, noon)];
        let rate = xirr::solve(&flows).unwrap();
        // Slightly longer than a year, so slightly below 10%
        assert!(rate < 0.10 && rate > 0.099, "got {rate}");
    }
}

// ── Failures ────────────────────────────────────────────────────────

mod failures {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(xirr::solve(&[]), Err(XirrError::TooFewCashFlows(0)));
    }

    #[test]
    fn single_flow() {
        let flows = [flow(-100.0, at(2024, 1, 1))];
        assert_eq!(xirr::solve(&flows), Err(XirrError::TooFewCashFlows(1)));
    }

    #[test]
    fn all_outflows() {
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(-500.0, at(2024, 1, 1))];
        assert_eq!(xirr::solve(&flows), Err(XirrError::NoSignChange));
    }

    #[test]
    fn all_inflows() {
        let flows = [flow(1000.0, at(2023, 1, 1)), flow(500.0, at(2024, 1, 1))];
        assert_eq!(xirr::solve(&flows), Err(XirrError::NoSignChange));
    }

    #[test]
    fn zero_inflow_has_no_rate() {
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(0.0, at(2024, 1, 1))];
        assert_eq!(xirr::solve(&flows), Err(XirrError::NoSignChange));
    }

    #[test]
    fn non_finite_amount() {
        let flows = [flow(f64::NAN, at(2023, 1, 1)), flow(100.0, at(2024, 1, 1))];
        assert_eq!(xirr::solve(&flows), Err(XirrError::NonFiniteAmount));

        let flows = [flow(-100.0, at(2023, 1, 1)), flow(f64::INFINITY, at(2024, 1, 1))];
        assert_eq!(xirr::solve(&flows), Err(XirrError::NonFiniteAmount));
    }

    #[test]
    fn same_day_with_net_gain_has_no_rate() {
        let flows = [flow(-100.0, at(2024, 5, 1)), flow(150.0, at(2024, 5, 1))];
        assert_eq!(xirr::solve(&flows), Err(XirrError::NoRootInRange));
    }

    #[test]
    fn rate_beyond_search_range() {
        // Doubling overnight annualizes to roughly 2^365, far past the ladder
        let flows = [flow(-1000.0, at(2024, 1, 1)), flow(2000.0, at(2024, 1, 2))];
        assert_eq!(xirr::solve(&flows), Err(XirrError::NoRootInRange));
    }
}

// ── NPV helpers ─────────────────────────────────────────────────────

mod npv_helpers {
    use super::*;

    #[test]
    fn year_fraction_of_365_days_is_one() {
        assert_close(xirr::year_fraction(at(2023, 1, 1), at(2024, 1, 1)), 1.0, 1e-12);
    }

    #[test]
    fn year_fraction_counts_partial_days() {
        let start = at(2024, 1, 1);
        let noon = start + chrono::Duration::hours(12);
        assert_close(xirr::year_fraction(start, noon), 0.5 / 365.0, 1e-12);
    }

    #[test]
    fn npv_at_zero_rate_is_plain_sum() {
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(1200.0, at(2024, 3, 1))];
        assert_close(xirr::npv(&flows, 0.0), 200.0, 1e-9);
    }

    #[test]
    fn npv_decreases_with_rate_for_invest_then_receive() {
        let flows = [flow(-1000.0, at(2023, 1, 1)), flow(1200.0, at(2024, 1, 1))];
        let low = xirr::npv(&flows, 0.05);
        let high = xirr::npv(&flows, 0.30);
        assert!(low > high);
    }

    #[test]
    fn npv_of_nothing_is_zero() {
        assert_eq!(xirr::npv(&[], 0.1), 0.0);
    }
}
