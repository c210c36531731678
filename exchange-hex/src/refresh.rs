//! Scheduled cache refresh.

use std::sync::Arc;
use std::time::Duration;

use exchange_types::{RateProvider, RateStore};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ExchangeService;

/// Spawns the periodic rate refresh task.
///
/// The first tick fires immediately, so the cache is warm before the
/// server accepts traffic. A failed refresh is logged and left for the
/// next tick; the task itself never exits.
pub fn spawn_scheduled_refresh<P, S>(
    service: Arc<ExchangeService<P, S>>,
    period: Duration,
) -> JoinHandle<()>
where
    P: RateProvider,
    S: RateStore,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            tracing::info!("Scheduled update: Refreshing crypto rates...");

            if let Err(e) = service.refresh_rates().await {
                tracing::error!(error = %e, "scheduled rate refresh failed");
            }
        }
    })
}
