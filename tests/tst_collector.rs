use anyhow::Result;
use async_trait::async_trait;
use options_analyzer::collector::{Collector, SkipReason, TickerOutcome};
use options_analyzer::config;
use options_analyzer::market_client::MarketData;
use options_analyzer::models::{AggBar, OptionContract, OptionRecord, QuoteStatus};
use options_analyzer::rate_limit::{NoDelay, RateLimiter};
use options_analyzer::store::SnapshotStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted market data: whatever the maps hold is what the provider knows.
#[derive(Default)]
struct FakeMarket {
    prev_bars: HashMap<String, AggBar>,
    day_bars: HashMap<String, AggBar>,
    contracts: HashMap<String, Vec<OptionContract>>,
    quote_bars: HashMap<String, AggBar>,
    quote_failures: Vec<String>,
    listing_calls: AtomicUsize,
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn prev_day_bar(&self, ticker: &str) -> Result<Option<AggBar>> {
        Ok(self.prev_bars.get(ticker).cloned())
    }

    async fn day_bar(&self, ticker: &str) -> Result<Option<AggBar>> {
        Ok(self.day_bars.get(ticker).cloned())
    }

    async fn list_call_contracts(&self, underlying: &str) -> Result<Vec<OptionContract>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.contracts.get(underlying).cloned().unwrap_or_default())
    }

    async fn option_prev_day_bar(&self, contract_ticker: &str) -> Result<Option<AggBar>> {
        if self.quote_failures.iter().any(|c| c == contract_ticker) {
            anyhow::bail!("quote endpoint unavailable");
        }
        Ok(self.quote_bars.get(contract_ticker).cloned())
    }
}

#[derive(Default)]
struct RecordingStore {
    puts: Mutex<Vec<(String, Vec<OptionRecord>)>>,
}

#[async_trait]
impl SnapshotStore for RecordingStore {
    async fn put_snapshot(&self, key: &str, records: &[OptionRecord]) -> Result<()> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), records.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
struct CountingPacer {
    pauses: Mutex<Vec<Duration>>,
}

#[async_trait]
impl RateLimiter for CountingPacer {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

fn bar(close: f64, low: f64) -> AggBar {
    AggBar {
        open: close - 1.0,
        high: close + 1.0,
        low,
        close,
        volume: 120.0,
        vwap: close,
    }
}

fn contract(ticker: &str, strike: f64, expiration: &str) -> OptionContract {
    OptionContract {
        ticker: ticker.to_string(),
        underlying_ticker: String::new(),
        strike_price: strike,
        expiration_date: expiration.parse().unwrap(),
        contract_type: "call".to_string(),
    }
}

fn happy_market() -> FakeMarket {
    let mut market = FakeMarket::default();
    market.prev_bars.insert("AAPL".to_string(), bar(190.0, 188.0));
    market.contracts.insert(
        "AAPL".to_string(),
        vec![
            contract("O:AAPL_C185", 185.0, "2026-08-21"),
            contract("O:AAPL_C195", 195.0, "2026-08-21"),
            contract("O:AAPL_C200", 200.0, "2026-08-21"),
        ],
    );
    market
        .quote_bars
        .insert("O:AAPL_C195".to_string(), bar(2.5, 2.1));
    market
}

fn collector_for(
    market: Arc<FakeMarket>,
    store: Arc<RecordingStore>,
    pacer: Arc<dyn RateLimiter>,
    tickers: &[&str],
) -> Collector {
    Collector::with_tickers(
        market,
        store,
        pacer,
        tickers.iter().map(|t| t.to_string()).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn all_price_failures_suppress_the_snapshot() {
        let market = Arc::new(FakeMarket::default());
        let store = Arc::new(RecordingStore::default());
        let pacer = Arc::new(CountingPacer::default());
        let collector = collector_for(market.clone(), store.clone(), pacer.clone(), &["AAPL", "MSFT"]);

        let summary = collector.run().await.unwrap();

        assert_eq!(summary.total_options, 0);
        assert_eq!(summary.message, "Successfully processed 0 options");
        assert!(store.puts.lock().unwrap().is_empty());

        // Without a price, the listing is never fetched.
        assert_eq!(market.listing_calls.load(Ordering::SeqCst), 0);

        // The inter-ticker pause still ran once per ticker.
        let pauses = pacer.pauses.lock().unwrap();
        assert_eq!(*pauses, vec![config::TICKER_PAUSE, config::TICKER_PAUSE]);
    }

    #[tokio::test]
    async fn happy_path_writes_one_record_per_ticker() {
        let market = Arc::new(happy_market());
        let store = Arc::new(RecordingStore::default());
        let pacer = Arc::new(CountingPacer::default());
        let collector = collector_for(market, store.clone(), pacer.clone(), &["AAPL"]);

        let summary = collector.run().await.unwrap();
        assert_eq!(summary.total_options, 1);

        let puts = store.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);

        let (key, records) = &puts[0];
        assert!(key.starts_with("magnificent-seven-options/"));
        assert!(key.ends_with(".json"));

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.underlying_ticker, "AAPL");
        assert_eq!(record.current_price, 190.0);
        // Just out of the money: lowest strike above 190.
        assert_eq!(record.contract_ticker, "O:AAPL_C195");
        assert_eq!(record.strike, 195.0);
        assert_eq!(record.quote.status, None);
        assert_eq!(record.quote.close, 2.5);
        assert_eq!(record.quote.volume, 120);

        // Quote pause after enrichment, then the ticker pause.
        let pauses = pacer.pauses.lock().unwrap();
        assert_eq!(*pauses, vec![config::QUOTE_PAUSE, config::TICKER_PAUSE]);
    }

    #[tokio::test]
    async fn enrichment_failure_degrades_the_record_without_skipping() {
        let mut market = happy_market();
        market.quote_failures.push("O:AAPL_C195".to_string());
        let store = Arc::new(RecordingStore::default());
        let collector = collector_for(Arc::new(market), store.clone(), Arc::new(NoDelay), &["AAPL"]);

        let summary = collector.run().await.unwrap();
        assert_eq!(summary.total_options, 1);

        let puts = store.puts.lock().unwrap();
        let record = &puts[0].1[0];
        assert_eq!(record.quote.status, Some(QuoteStatus::Error));
        assert_eq!(record.quote.close, 0.0);
        assert_eq!(record.quote.volume, 0);
    }

    #[tokio::test]
    async fn missing_quote_data_is_marked_distinctly_from_errors() {
        let mut market = happy_market();
        market.quote_bars.clear();
        let store = Arc::new(RecordingStore::default());
        let collector = collector_for(Arc::new(market), store.clone(), Arc::new(NoDelay), &["AAPL"]);

        collector.run().await.unwrap();

        let puts = store.puts.lock().unwrap();
        let record = &puts[0].1[0];
        assert_eq!(record.quote.status, Some(QuoteStatus::NoPricingData));
    }

    #[tokio::test]
    async fn price_falls_back_to_todays_session_bar() {
        let mut market = happy_market();
        market.prev_bars.clear();
        market.day_bars.insert("AAPL".to_string(), bar(191.0, 189.0));
        let store = Arc::new(RecordingStore::default());
        let collector = collector_for(Arc::new(market), store.clone(), Arc::new(NoDelay), &["AAPL"]);

        let summary = collector.run().await.unwrap();
        assert_eq!(summary.total_options, 1);

        let puts = store.puts.lock().unwrap();
        assert_eq!(puts[0].1[0].current_price, 191.0);
    }

    #[tokio::test]
    async fn skip_reasons_stay_distinguishable() {
        let mut market = happy_market();
        // MSFT has a price but no contracts at all; AMZN's only expiry has
        // no strike above the price.
        market.prev_bars.insert("MSFT".to_string(), bar(400.0, 398.0));
        market.prev_bars.insert("AMZN".to_string(), bar(180.0, 178.0));
        market.contracts.insert(
            "AMZN".to_string(),
            vec![
                contract("O:AMZN_C170", 170.0, "2026-08-21"),
                contract("O:AMZN_C175", 175.0, "2026-08-21"),
            ],
        );
        let market = Arc::new(market);
        let store = Arc::new(RecordingStore::default());
        let collector = collector_for(market, store, Arc::new(NoDelay), &[]);

        match collector.process_ticker("MSFT").await {
            TickerOutcome::Skipped(reason) => assert_eq!(reason, SkipReason::ListingUnavailable),
            other => panic!("expected skip, got {:?}", other),
        }
        match collector.process_ticker("AMZN").await {
            TickerOutcome::Skipped(reason) => assert_eq!(reason, SkipReason::NoQualifyingContract),
            other => panic!("expected skip, got {:?}", other),
        }
        match collector.process_ticker("GOOGL").await {
            TickerOutcome::Skipped(reason) => assert_eq!(reason, SkipReason::PriceUnavailable),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn mixed_batch_keeps_only_successful_tickers() {
        let mut market = happy_market();
        market.prev_bars.insert("MSFT".to_string(), bar(400.0, 398.0));
        // MSFT has no listing, so only AAPL contributes.
        let store = Arc::new(RecordingStore::default());
        let collector = collector_for(Arc::new(market), store.clone(), Arc::new(NoDelay), &["AAPL", "MSFT"]);

        let summary = collector.run().await.unwrap();
        assert_eq!(summary.total_options, 1);

        let puts = store.puts.lock().unwrap();
        assert_eq!(puts[0].1.len(), 1);
        assert_eq!(puts[0].1[0].underlying_ticker, "AAPL");
    }
}
