//! ExchangeService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{BTreeSet, HashSet};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use exchange_provider::MockRateProvider;
    use exchange_types::{
        ExchangeError, ExchangeRequest, RateEntry, RateSnapshot, RateStore, StoreError,
    };

    use crate::service::CACHE_TTL;
    use crate::{ExchangeService, spawn_scheduled_refresh};

    /// In-memory store that records every write, for asserting on cache
    /// traffic. TTLs are recorded, not enforced.
    pub struct RecordingStore {
        slot: Mutex<Option<RateSnapshot>>,
        writes: Mutex<Vec<(RateSnapshot, Duration)>>,
    }

    impl RecordingStore {
        pub fn new() -> Self {
            Self {
                slot: Mutex::new(None),
                writes: Mutex::new(Vec::new()),
            }
        }

        pub fn seeded(snapshot: RateSnapshot) -> Self {
            let store = Self::new();
            *store.slot.lock().unwrap() = Some(snapshot);
            store
        }

        pub fn writes(&self) -> Vec<(RateSnapshot, Duration)> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RateStore for RecordingStore {
        async fn get(&self) -> Result<Option<RateSnapshot>, StoreError> {
            Ok(self.slot.lock().unwrap().clone())
        }

        async fn put(&self, snapshot: &RateSnapshot, ttl: Duration) -> Result<(), StoreError> {
            *self.slot.lock().unwrap() = Some(snapshot.clone());
            self.writes.lock().unwrap().push((snapshot.clone(), ttl));
            Ok(())
        }

        async fn delete(&self) -> Result<(), StoreError> {
            *self.slot.lock().unwrap() = None;
            Ok(())
        }
    }

    fn snapshot(entries: &[(&str, Decimal)]) -> RateSnapshot {
        let rates = entries
            .iter()
            .map(|(code, value)| {
                let entry = RateEntry::new(*code, code.to_uppercase(), *value, "crypto");
                (code.to_string(), entry)
            })
            .collect();
        RateSnapshot::new(rates)
    }

    /// btc quoted at 20000, usd at 1, eth at 1500.
    fn standard_snapshot() -> RateSnapshot {
        snapshot(&[("btc", dec!(20000)), ("usd", dec!(1)), ("eth", dec!(1500))])
    }

    fn service_with(
        provider: MockRateProvider,
        store: RecordingStore,
    ) -> ExchangeService<MockRateProvider, RecordingStore> {
        ExchangeService::new(provider, store)
    }

    fn no_filter() -> HashSet<String> {
        HashSet::new()
    }

    fn filter_of(codes: &[&str]) -> HashSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn request(from: &str, to: &[&str], amount: Decimal) -> ExchangeRequest {
        ExchangeRequest {
            from: from.to_string(),
            to: to.iter().map(|c| c.to_string()).collect(),
            amount,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Caching behavior
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_cached_rates_served_without_fetch() {
        // Provider without a snapshot fails if called, so a successful
        // lookup proves the cache was used.
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let rates = service.get_rates("btc", &no_filter()).await.unwrap();

        assert_eq!(rates.source, "BTC");
        assert!(service.store_writes().is_empty());
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_and_stores_once() {
        let service = service_with(
            MockRateProvider::with_snapshot(standard_snapshot()),
            RecordingStore::new(),
        );

        let rates = service.get_rates("btc", &no_filter()).await.unwrap();

        assert_eq!(rates.source, "BTC");
        let writes = service.store_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1, CACHE_TTL);
    }

    #[tokio::test]
    async fn test_refresh_normalizes_keys_and_sets_ttl() {
        let mixed = snapshot(&[("BTC", dec!(20000)), ("Usd", dec!(1))]);
        let service = service_with(MockRateProvider::with_snapshot(mixed), RecordingStore::new());

        let refreshed = service.refresh_rates().await.unwrap();

        assert!(refreshed.rates.contains_key("btc"));
        assert!(refreshed.rates.contains_key("usd"));
        assert!(!refreshed.rates.contains_key("BTC"));

        let writes = service.store_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, refreshed);
        assert_eq!(writes[0].1, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_empty_upstream_response_fails_without_write() {
        let service = service_with(
            MockRateProvider::with_snapshot(RateSnapshot::default()),
            RecordingStore::new(),
        );

        let result = service.refresh_rates().await;

        assert!(matches!(result, Err(ExchangeError::Upstream(_))));
        assert!(service.store_writes().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_as_upstream_error() {
        let service = service_with(MockRateProvider::new(), RecordingStore::new());

        let result = service.get_rates("btc", &no_filter()).await;

        match result {
            Err(ExchangeError::Upstream(msg)) => assert!(msg.contains("upstream unavailable")),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rate lookup
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_rates_view_excludes_base_and_uppercases_keys() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let rates = service.get_rates("btc", &no_filter()).await.unwrap();

        assert_eq!(rates.source, "BTC");
        assert_eq!(rates.rates.len(), 2);
        assert!(!rates.rates.contains_key("BTC"));
        assert_eq!(rates.rates["USD"], dec!(0.00005));
        assert_eq!(rates.rates["ETH"], dec!(0.075));
    }

    #[tokio::test]
    async fn test_base_currency_resolution_is_case_insensitive() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        for code in ["btc", "BTC", "bTc"] {
            let rates = service.get_rates(code, &no_filter()).await.unwrap();
            assert_eq!(rates.source, "BTC");
            assert_eq!(rates.rates["USD"], dec!(0.00005));
        }
    }

    #[tokio::test]
    async fn test_cross_rates_round_half_up_to_eight_digits() {
        let snapshot = snapshot(&[("abc", dec!(3)), ("one", dec!(1)), ("two", dec!(2))]);
        let service = service_with(MockRateProvider::new(), RecordingStore::seeded(snapshot));

        let rates = service.get_rates("abc", &no_filter()).await.unwrap();

        assert_eq!(rates.rates["ONE"], dec!(0.33333333));
        assert_eq!(rates.rates["TWO"], dec!(0.66666667));
    }

    #[tokio::test]
    async fn test_unknown_base_currency_not_found() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let result = service.get_rates("xyz", &no_filter()).await;

        match result {
            Err(ExchangeError::CurrencyNotFound(codes)) => {
                assert_eq!(codes, BTreeSet::from(["xyz".to_string()]));
            }
            other => panic!("expected not-found error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_filter_restricts_view() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let rates = service.get_rates("btc", &filter_of(&["USD"])).await.unwrap();

        assert_eq!(rates.rates.len(), 1);
        assert_eq!(rates.rates["USD"], dec!(0.00005));
    }

    #[tokio::test]
    async fn test_filter_matching_base_is_elided() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let rates = service
            .get_rates("btc", &filter_of(&["BTC", "usd"]))
            .await
            .unwrap();

        assert_eq!(rates.rates.len(), 1);
        assert!(rates.rates.contains_key("USD"));
    }

    #[tokio::test]
    async fn test_invalid_filter_reports_every_offender() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let result = service
            .get_rates("btc", &filter_of(&["usd", "yyy", "xxx"]))
            .await;

        match result {
            Err(ExchangeError::CurrencyNotFound(codes)) => {
                assert_eq!(
                    codes,
                    BTreeSet::from(["xxx".to_string(), "yyy".to_string()])
                );
            }
            other => panic!("expected not-found error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_base_value_is_calculation_error() {
        let snapshot = snapshot(&[("dead", dec!(0)), ("usd", dec!(1))]);
        let service = service_with(MockRateProvider::new(), RecordingStore::seeded(snapshot));

        let result = service.get_rates("dead", &no_filter()).await;

        match result {
            Err(ExchangeError::Calculation(msg)) => {
                assert_eq!(msg, "Base currency value is zero, cannot convert.");
            }
            other => panic!("expected calculation error, got {:?}", other),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Exchange calculation
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_exchange_applies_rate_and_fee() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let response = service
            .calculate_exchange(&request("BTC", &["usd"], dec!(2)))
            .await
            .unwrap();

        assert_eq!(response.from, "BTC");
        let conversion = &response.conversions["USD"];
        assert_eq!(conversion.rate, dec!(0.00005));
        assert_eq!(conversion.amount, dec!(2));
        assert_eq!(conversion.fee, dec!(0.000001));
        assert_eq!(conversion.result, dec!(0.000099));
    }

    #[tokio::test]
    async fn test_exchange_handles_multiple_targets() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let response = service
            .calculate_exchange(&request("btc", &["usd", "eth"], dec!(10)))
            .await
            .unwrap();

        assert_eq!(response.conversions.len(), 2);
        for conversion in response.conversions.values() {
            assert_eq!(
                conversion.result,
                conversion.amount * conversion.rate - conversion.fee
            );
        }
        assert_eq!(response.conversions["ETH"].rate, dec!(0.075));
    }

    #[tokio::test]
    async fn test_exchange_zero_amount_fails() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let result = service
            .calculate_exchange(&request("btc", &["usd"], dec!(0)))
            .await;

        match result {
            Err(ExchangeError::Calculation(msg)) => {
                assert_eq!(msg, "Amount must be greater than zero.");
            }
            other => panic!("expected calculation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exchange_negative_amount_fails() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let result = service
            .calculate_exchange(&request("btc", &["usd"], dec!(-1)))
            .await;

        assert!(matches!(result, Err(ExchangeError::Calculation(_))));
    }

    #[tokio::test]
    async fn test_exchange_unknown_base_beats_amount_validation() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        // Both the base and the amount are bad; base resolution runs first.
        let result = service
            .calculate_exchange(&request("xyz", &["usd"], dec!(0)))
            .await;

        assert!(matches!(result, Err(ExchangeError::CurrencyNotFound(_))));
    }

    #[tokio::test]
    async fn test_exchange_base_as_target_not_found() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let result = service
            .calculate_exchange(&request("btc", &["BTC"], dec!(2)))
            .await;

        match result {
            Err(ExchangeError::CurrencyNotFound(codes)) => {
                assert_eq!(codes, BTreeSet::from(["BTC".to_string()]));
            }
            other => panic!("expected not-found error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_conversion_rate_matches_lookup_rate() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let looked_up = service
            .get_rates("btc", &filter_of(&["usd"]))
            .await
            .unwrap();
        let converted = service
            .calculate_exchange(&request("btc", &["usd"], dec!(1)))
            .await
            .unwrap();

        assert_eq!(converted.conversions["USD"].rate, looked_up.rates["USD"]);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent_for_stable_upstream() {
        let service = service_with(
            MockRateProvider::with_snapshot(standard_snapshot()),
            RecordingStore::new(),
        );

        let first = service.refresh_rates().await.unwrap();
        let second = service.refresh_rates().await.unwrap();
        assert_eq!(first, second);

        let rates = service.get_rates("btc", &no_filter()).await.unwrap();
        assert_eq!(rates.rates["USD"], dec!(0.00005));
        assert_eq!(service.store_writes().len(), 2);
    }

    #[tokio::test]
    async fn test_exchange_empty_target_set_yields_no_conversions() {
        let service = service_with(
            MockRateProvider::new(),
            RecordingStore::seeded(standard_snapshot()),
        );

        let response = service
            .calculate_exchange(&request("btc", &[], dec!(2)))
            .await
            .unwrap();

        assert_eq!(response.from, "btc");
        assert!(response.conversions.is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scheduled refresh
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_scheduled_refresh_warms_cache_immediately() {
        let provider = Arc::new(MockRateProvider::with_snapshot(standard_snapshot()));
        let store = Arc::new(RecordingStore::new());
        let service = Arc::new(ExchangeService::new(provider, store.clone()));

        let handle = spawn_scheduled_refresh(service, Duration::from_secs(300));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.writes().len(), 1);
        handle.abort();
    }

    #[tokio::test]
    async fn test_scheduled_refresh_recovers_after_failure() {
        let provider = Arc::new(MockRateProvider::new());
        let store = Arc::new(RecordingStore::new());
        let service = Arc::new(ExchangeService::new(provider.clone(), store.clone()));

        let handle = spawn_scheduled_refresh(service, Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(store.writes().is_empty());

        // Upstream comes back; the next tick should repopulate the cache.
        provider.set_snapshot(standard_snapshot());
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!store.writes().is_empty());
        handle.abort();
    }

    impl ExchangeService<MockRateProvider, RecordingStore> {
        fn store_writes(&self) -> Vec<(RateSnapshot, Duration)> {
            self.store().writes()
        }
    }
}
