//! Exchange Application Service
//!
//! Orchestrates rate refresh, lookup, and conversion through the provider
//! and store ports. Contains NO infrastructure logic - pure business
//! orchestration.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

use rust_decimal::{Decimal, RoundingStrategy};

use exchange_types::{
    CurrencyRatesResponse, ExchangeError, ExchangeRequest, ExchangeResponse, ExchangeResult,
    RateProvider, RateSnapshot, RateStore, canonical_key,
};

/// How long a refreshed snapshot stays valid in the cache.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Fractional digits kept on every cross-rate.
const EXCHANGE_SCALE: u32 = 8;

/// Proportional fee taken from every conversion: 0.01 (1%).
const FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Application service for rate lookup and conversion.
///
/// Generic over `P: RateProvider` and `S: RateStore` - the adapters are
/// injected at compile time. This enables:
/// - Swapping the cache backend without code changes
/// - Testing with mock provider and in-memory store
/// - Compile-time checks for port implementation
pub struct ExchangeService<P: RateProvider, S: RateStore> {
    provider: P,
    store: S,
}

impl<P: RateProvider, S: RateStore> ExchangeService<P, S> {
    /// Creates a new exchange service with the given adapters.
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    /// Returns a reference to the underlying rate store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches a fresh snapshot from upstream, normalizes it, and replaces
    /// the cached one.
    ///
    /// An empty upstream response is an error and leaves the cache
    /// untouched: a stale snapshot beats an empty one.
    pub async fn refresh_rates(&self) -> Result<RateSnapshot, ExchangeError> {
        let fetched = self.provider.fetch_rates().await?;

        if fetched.is_empty() {
            return Err(ExchangeError::Upstream(
                "Received empty or null response from external API.".to_string(),
            ));
        }

        let snapshot = fetched.normalized();
        self.store.put(&snapshot, CACHE_TTL).await?;

        tracing::info!(currencies = snapshot.len(), "refreshed crypto rates");
        Ok(snapshot)
    }

    /// Returns the cached snapshot, refreshing on a miss.
    async fn current_snapshot(&self) -> Result<RateSnapshot, ExchangeError> {
        if let Some(snapshot) = self.store.get().await? {
            tracing::debug!("returning cached crypto rates");
            return Ok(snapshot);
        }

        tracing::info!("cache expired or not found, fetching new rates");
        self.refresh_rates().await
    }

    /// Builds the cross-rate view for a base currency.
    ///
    /// An empty `filter` means all available currencies. The base itself
    /// never appears in the result.
    pub async fn get_rates(
        &self,
        currency: &str,
        filter: &HashSet<String>,
    ) -> Result<CurrencyRatesResponse, ExchangeError> {
        let snapshot = self.current_snapshot().await?;
        build_rates_view(&snapshot, currency, filter)
    }

    /// Calculates a fee-bearing conversion forecast for every target
    /// currency in the request.
    pub async fn calculate_exchange(
        &self,
        request: &ExchangeRequest,
    ) -> Result<ExchangeResponse, ExchangeError> {
        let rates = self.get_rates(&request.from, &request.to).await?;
        apply_exchange(request, &rates)
    }
}

/// Derives the cross-rate view from a normalized snapshot.
///
/// Validation order matters: base resolution, then the zero-value check,
/// then filter validation. A request with several problems always reports
/// the first one in that order.
fn build_rates_view(
    snapshot: &RateSnapshot,
    currency: &str,
    filter: &HashSet<String>,
) -> Result<CurrencyRatesResponse, ExchangeError> {
    let Some((base_key, base_entry)) = snapshot.resolve(currency) else {
        return Err(ExchangeError::currency_not_found(currency));
    };

    if base_entry.value.is_zero() {
        return Err(ExchangeError::Calculation(
            "Base currency value is zero, cannot convert.".to_string(),
        ));
    }

    let source = currency.to_uppercase();

    if filter.is_empty() {
        let rates = snapshot
            .rates
            .iter()
            .filter(|(key, _)| key.as_str() != base_key)
            .map(|(key, entry)| (key.to_uppercase(), cross_rate(entry.value, base_entry.value)))
            .collect();
        return Ok(CurrencyRatesResponse { source, rates });
    }

    let invalid: BTreeSet<String> = filter
        .iter()
        .filter(|code| !snapshot.contains(code))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(ExchangeError::currencies_not_found(invalid));
    }

    let rates = filter
        .iter()
        .map(|code| canonical_key(code))
        .filter(|key| key != base_key)
        .filter_map(|key| {
            let entry = snapshot.rates.get(&key)?;
            Some((key.to_uppercase(), cross_rate(entry.value, base_entry.value)))
        })
        .collect();

    Ok(CurrencyRatesResponse { source, rates })
}

/// `target / base`, rounded to [`EXCHANGE_SCALE`] digits half-up.
fn cross_rate(target: Decimal, base: Decimal) -> Decimal {
    (target / base).round_dp_with_strategy(EXCHANGE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies the amount and fee arithmetic on top of an already-built view.
///
/// Targets are validated against the view, not the snapshot, so naming the
/// base currency as a target is reported as not found.
fn apply_exchange(
    request: &ExchangeRequest,
    rates: &CurrencyRatesResponse,
) -> Result<ExchangeResponse, ExchangeError> {
    if request.amount <= Decimal::ZERO {
        return Err(ExchangeError::Calculation(
            "Amount must be greater than zero.".to_string(),
        ));
    }

    let invalid: BTreeSet<String> = request
        .to
        .iter()
        .filter(|code| !rates.rates.contains_key(&code.to_uppercase()))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(ExchangeError::currencies_not_found(invalid));
    }

    let conversions = request
        .to
        .iter()
        .map(|code| {
            let result = conversion_for(&rates.rates, request.amount, code)?;
            Ok((code.to_uppercase(), result))
        })
        .collect::<Result<HashMap<_, _>, ExchangeError>>()?;

    Ok(ExchangeResponse {
        from: request.from.clone(),
        conversions,
    })
}

/// Converts one amount at the view rate for `code`, taking the fee out of
/// the raw result.
fn conversion_for(
    rates: &HashMap<String, Decimal>,
    amount: Decimal,
    code: &str,
) -> Result<ExchangeResult, ExchangeError> {
    let rate = rates.get(&code.to_uppercase()).copied().ok_or_else(|| {
        ExchangeError::Calculation(format!("Invalid exchange rate for currency: {}", code))
    })?;

    let raw = amount * rate;
    let fee = raw * FEE_RATE;

    Ok(ExchangeResult {
        rate,
        amount,
        result: raw - fee,
        fee,
    })
}
