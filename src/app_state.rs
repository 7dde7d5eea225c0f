// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every request handler via `Arc<AppState>`. Holds the startup
// configuration, the market data service, and a short history of live-data
// fallbacks for the health endpoint.
//
// Thread safety:
//   - The market data service is immutable after construction.
//   - parking_lot::RwLock guards the fallback history.
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::config::AppConfig;
use crate::market_data::{FallbackEvent, MarketDataProvider, MarketDataService, SeriesObserver};

/// Maximum number of recent fallback events to retain.
pub const MAX_RECENT_FALLBACKS: usize = 50;

// =============================================================================
// Fallback log
// =============================================================================

/// Observer that remembers the most recent fallbacks, oldest first.
#[derive(Debug, Default)]
pub struct FallbackLog {
    events: RwLock<Vec<FallbackEvent>>,
}

impl FallbackLog {
    pub fn snapshot(&self) -> Vec<FallbackEvent> {
        self.events.read().clone()
    }
}

impl SeriesObserver for FallbackLog {
    fn on_fallback(&self, event: &FallbackEvent) {
        let mut events = self.events.write();
        events.push(event.clone());
        let excess = events.len().saturating_sub(MAX_RECENT_FALLBACKS);
        events.drain(..excess);
    }
}

// =============================================================================
// AppState
// =============================================================================

pub struct AppState {
    pub config: AppConfig,
    pub market_data: MarketDataService,
    fallbacks: Arc<FallbackLog>,
    /// Used for uptime in the health endpoint.
    pub start_time: Instant,
}

impl AppState {
    /// `provider` is `None` when live data is disabled.
    pub fn new(config: AppConfig, provider: Option<Arc<dyn MarketDataProvider>>) -> Self {
        let fallbacks = Arc::new(FallbackLog::default());
        let market_data =
            MarketDataService::new(provider, config.fetch_timeout()).with_observer(fallbacks.clone());

        Self {
            config,
            market_data,
            fallbacks,
            start_time: Instant::now(),
        }
    }

    pub fn recent_fallbacks(&self) -> Vec<FallbackEvent> {
        self.fallbacks.snapshot()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
