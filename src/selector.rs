use crate::models::OptionContract;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Pick the just-out-of-the-money call for a ticker: among the soonest
/// expiration's contracts only, the lowest strike strictly above the
/// current price. Later expirations are never considered, even when the
/// soonest group has no qualifying strike.
pub fn select_contract<'a>(
    contracts: &'a [OptionContract],
    current_price: f64,
) -> Option<&'a OptionContract> {
    let nearest = nearest_expiration(contracts)?;

    let mut group: Vec<&OptionContract> = contracts
        .iter()
        .filter(|c| c.expiration_date == nearest)
        .collect();

    group.sort_by(|a, b| {
        a.strike_price
            .partial_cmp(&b.strike_price)
            .unwrap_or(Ordering::Equal)
    });

    group.into_iter().find(|c| c.strike_price > current_price)
}

/// Soonest expiration date present in the listing.
fn nearest_expiration(contracts: &[OptionContract]) -> Option<NaiveDate> {
    contracts.iter().map(|c| c.expiration_date).min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(ticker: &str, strike: f64, expiration: &str) -> OptionContract {
        OptionContract {
            ticker: ticker.to_string(),
            underlying_ticker: "AAPL".to_string(),
            strike_price: strike,
            expiration_date: expiration.parse().unwrap(),
            contract_type: "call".to_string(),
        }
    }

    #[test]
    fn picks_lowest_strike_above_price_in_nearest_expiry() {
        let contracts = vec![
            contract("C190", 190.0, "2026-08-21"),
            contract("C200", 200.0, "2026-08-21"),
            contract("C195", 195.0, "2026-08-21"),
        ];

        let selected = select_contract(&contracts, 192.5).unwrap();
        assert_eq!(selected.ticker, "C195");
    }

    #[test]
    fn listing_order_does_not_matter() {
        let contracts = vec![
            contract("C210", 210.0, "2026-08-21"),
            contract("C205", 205.0, "2026-08-21"),
            contract("C215", 215.0, "2026-08-21"),
        ];

        let selected = select_contract(&contracts, 200.0).unwrap();
        assert_eq!(selected.strike_price, 205.0);
    }

    #[test]
    fn never_selects_from_a_later_expiration() {
        let contracts = vec![
            contract("NEAR_LOW", 90.0, "2026-08-21"),
            contract("FAR_HIGH", 300.0, "2026-09-18"),
        ];

        // The later expiry qualifies, but the nearest one does not.
        assert!(select_contract(&contracts, 100.0).is_none());
    }

    #[test]
    fn all_strikes_at_or_below_price_is_no_selection() {
        let contracts = vec![
            contract("C90", 90.0, "2026-08-21"),
            contract("C100", 100.0, "2026-08-21"),
        ];

        assert!(select_contract(&contracts, 100.0).is_none());
    }

    #[test]
    fn empty_listing_is_no_selection() {
        assert!(select_contract(&[], 100.0).is_none());
    }

    #[test]
    fn qualifying_strike_in_nearest_group_wins_over_earlier_strikes_elsewhere() {
        let contracts = vec![
            contract("FAR_105", 105.0, "2026-09-18"),
            contract("NEAR_110", 110.0, "2026-08-21"),
            contract("NEAR_95", 95.0, "2026-08-21"),
        ];

        let selected = select_contract(&contracts, 100.0).unwrap();
        assert_eq!(selected.ticker, "NEAR_110");
        assert_eq!(selected.expiration_date, "2026-08-21".parse().unwrap());
    }
}
