use crate::config;
use crate::market_client::MarketData;
use crate::models::{CollectorSummary, OptionRecord, QuoteSnapshot};
use crate::rate_limit::RateLimiter;
use crate::selector;
use crate::store::SnapshotStore;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Why a ticker contributed nothing this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PriceUnavailable,
    ListingUnavailable,
    NoQualifyingContract,
}

/// One ticker's pass either yields exactly one record or an explicit skip.
#[derive(Debug)]
pub enum TickerOutcome {
    Record(OptionRecord),
    Skipped(SkipReason),
}

// -----------------------------------------------
// COLLECTOR ORCHESTRATION
// -----------------------------------------------

pub struct Collector {
    market: Arc<dyn MarketData>,
    store: Arc<dyn SnapshotStore>,
    pacer: Arc<dyn RateLimiter>,
    tickers: Vec<String>,
}

impl Collector {
    pub fn new(
        market: Arc<dyn MarketData>,
        store: Arc<dyn SnapshotStore>,
        pacer: Arc<dyn RateLimiter>,
    ) -> Self {
        let tickers = config::MAGNIFICENT_SEVEN
            .iter()
            .map(|t| t.to_string())
            .collect();
        Self::with_tickers(market, store, pacer, tickers)
    }

    pub fn with_tickers(
        market: Arc<dyn MarketData>,
        store: Arc<dyn SnapshotStore>,
        pacer: Arc<dyn RateLimiter>,
        tickers: Vec<String>,
    ) -> Self {
        Self {
            market,
            store,
            pacer,
            tickers,
        }
    }

    /// One full collection run: tickers in list order, strictly sequential,
    /// one snapshot write at the end if anything was collected.
    pub async fn run(&self) -> Result<CollectorSummary> {
        info!(tickers = self.tickers.len(), "Collector run started");
        let mut batch: Vec<OptionRecord> = Vec::new();

        for ticker in &self.tickers {
            let ticker = ticker.as_str();
            match self.process_ticker(ticker).await {
                TickerOutcome::Record(record) => {
                    info!(
                        ticker,
                        contract = %record.contract_ticker,
                        strike = record.strike,
                        "Added call option"
                    );
                    batch.push(record);
                }
                TickerOutcome::Skipped(reason) => {
                    warn!(ticker, ?reason, "Ticker contributed no record");
                }
            }

            // The inter-ticker pause holds on every path, skips included.
            self.pacer.pause(config::TICKER_PAUSE).await;
        }

        let now = Utc::now();
        if batch.is_empty() {
            info!("Empty batch, nothing persisted");
        } else {
            let key = config::snapshot_key(now);
            self.store.put_snapshot(&key, &batch).await?;
            info!(%key, count = batch.len(), "Snapshot stored");
        }

        Ok(CollectorSummary {
            message: format!("Successfully processed {} options", batch.len()),
            total_options: batch.len(),
            timestamp: now,
        })
    }

    /// Process a single ticker: price, listing, selection, enrichment. Every
    /// failure in here is absorbed into a skip or a degraded quote.
    pub async fn process_ticker(&self, ticker: &str) -> TickerOutcome {
        let Some(current_price) = self.current_price(ticker).await else {
            return TickerOutcome::Skipped(SkipReason::PriceUnavailable);
        };

        let contracts = match self.market.list_call_contracts(ticker).await {
            Ok(contracts) => contracts,
            Err(err) => {
                warn!(ticker, error = %err, "Contract listing fetch failed");
                return TickerOutcome::Skipped(SkipReason::ListingUnavailable);
            }
        };

        if contracts.is_empty() {
            return TickerOutcome::Skipped(SkipReason::ListingUnavailable);
        }

        let Some(selected) = selector::select_contract(&contracts, current_price) else {
            return TickerOutcome::Skipped(SkipReason::NoQualifyingContract);
        };
        let selected = selected.clone();

        let quote = self.quote_snapshot(&selected.ticker).await;
        self.pacer.pause(config::QUOTE_PAUSE).await;

        TickerOutcome::Record(OptionRecord {
            underlying_ticker: ticker.to_string(),
            current_price,
            strike: selected.strike_price,
            expiration: selected.expiration_date,
            contract_ticker: selected.ticker,
            timestamp: Utc::now(),
            quote,
        })
    }

    /// Previous-session close first, today's session as the fallback.
    async fn current_price(&self, ticker: &str) -> Option<f64> {
        match self.market.prev_day_bar(ticker).await {
            Ok(Some(bar)) => return Some(bar.close),
            Ok(None) => {}
            Err(err) => warn!(ticker, error = %err, "Previous-session price lookup failed"),
        }

        match self.market.day_bar(ticker).await {
            Ok(Some(bar)) => Some(bar.close),
            Ok(None) => None,
            Err(err) => {
                warn!(ticker, error = %err, "Session price lookup failed");
                None
            }
        }
    }

    /// Quote enricher: one previous-session lookup for the contract. Any
    /// miss or error collapses into a status-only placeholder; it degrades
    /// the record, never the run.
    async fn quote_snapshot(&self, contract_ticker: &str) -> QuoteSnapshot {
        match self.market.option_prev_day_bar(contract_ticker).await {
            Ok(Some(bar)) => QuoteSnapshot::from_bar(&bar),
            Ok(None) => QuoteSnapshot::no_pricing_data(),
            Err(err) => {
                warn!(contract_ticker, error = %err, "Quote lookup failed");
                QuoteSnapshot::degraded()
            }
        }
    }
}
