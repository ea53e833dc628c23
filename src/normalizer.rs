use crate::models::RankedOption;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// profit_score = (strike + low) - current_price. Lower reads as a cheaper
/// way into intrinsic value, so lower is more attractive.
pub fn profit_score(strike: f64, low: f64, current_price: f64) -> f64 {
    (strike + low) - current_price
}

/// Turn raw result rows into option records. Each row holds a JSON-encoded
/// array of option-shaped objects; a row that fails to decode is dropped and
/// the rest of the batch continues.
pub fn parse_rows(rows: &[String]) -> Vec<RankedOption> {
    let mut records = Vec::new();

    for (index, raw) in rows.iter().enumerate() {
        match serde_json::from_str::<Vec<Value>>(raw) {
            Ok(entries) => {
                records.extend(entries.iter().map(coerce_entry));
            }
            Err(err) => {
                warn!(row = index, error = %err, "Skipping undecodable result row");
            }
        }
    }

    records
}

/// Coerce one decoded entry to its semantic types. Missing or non-numeric
/// price/volume fields become zero; identifier fields pass through as-is.
/// The score is computed here, at the moment coercion succeeds.
fn coerce_entry(entry: &Value) -> RankedOption {
    let current_price = num(entry, "current_price");
    let strike = num(entry, "strike");
    let low = num(entry, "low");

    RankedOption {
        underlying_ticker: text(entry, "underlying_ticker"),
        current_price,
        strike,
        option_price: num(entry, "close"),
        volume: num(entry, "volume").max(0.0) as u64,
        contract_ticker: text(entry, "contract_ticker"),
        open: num(entry, "open"),
        high: num(entry, "high"),
        low,
        vwap: num(entry, "vwap"),
        profit_score: profit_score(strike, low, current_price),
    }
}

/// Collapse records sharing a contract identifier to the first one seen, in
/// traversal order. First write wins.
pub fn dedupe_by_contract(records: Vec<RankedOption>) -> Vec<RankedOption> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.contract_ticker.clone()))
        .collect()
}

// The query service hands numerics back as text, so accept JSON numbers and
// numeric strings alike.
fn num(entry: &Value, key: &str) -> f64 {
    match entry.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &str) -> String {
        entries.to_string()
    }

    #[test]
    fn undecodable_row_is_dropped_others_survive() {
        let rows = vec![
            row(r#"[{"contract_ticker": "A", "strike": 100, "low": 1, "current_price": 99}]"#),
            row("not json at all"),
            row(r#"[{"contract_ticker": "B", "strike": 200, "low": 2, "current_price": 198}]"#),
        ];

        let records = parse_rows(&rows);
        let tickers: Vec<&str> = records.iter().map(|r| r.contract_ticker.as_str()).collect();
        assert_eq!(tickers, vec!["A", "B"]);
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let rows = vec![row(r#"[{"contract_ticker": "A"}]"#)];
        let records = parse_rows(&rows);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].strike, 0.0);
        assert_eq!(records[0].volume, 0);
        assert_eq!(records[0].profit_score, 0.0);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let rows = vec![row(
            r#"[{"contract_ticker": "A", "strike": "185.5", "low": "2.4", "current_price": "183.0", "volume": "120"}]"#,
        )];
        let records = parse_rows(&rows);

        assert_eq!(records[0].strike, 185.5);
        assert_eq!(records[0].volume, 120);
        assert!((records[0].profit_score - 4.9).abs() < 1e-9);
    }

    #[test]
    fn score_matches_record_fields() {
        let rows = vec![row(
            r#"[{"contract_ticker": "A", "strike": 190, "low": 3.5, "current_price": 187}]"#,
        )];
        let records = parse_rows(&rows);

        let rec = &records[0];
        assert_eq!(
            rec.profit_score,
            profit_score(rec.strike, rec.low, rec.current_price)
        );
        assert!((rec.profit_score - 6.5).abs() < 1e-9);
    }

    #[test]
    fn dedupe_keeps_first_record_per_contract() {
        let rows = vec![
            row(r#"[{"contract_ticker": "A", "strike": 100, "low": 5, "current_price": 99}]"#),
            row(r#"[{"contract_ticker": "A", "strike": 100, "low": 1, "current_price": 99}]"#),
        ];

        let records = dedupe_by_contract(parse_rows(&rows));
        assert_eq!(records.len(), 1);
        // First write wins, so the score comes from the first row.
        assert!((records[0].profit_score - 6.0).abs() < 1e-9);
    }
}
