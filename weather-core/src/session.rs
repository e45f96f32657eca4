use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::RwLock;

use crate::{
    error::GatewayError,
    model::{ForecastPayload, LocationQuery},
    provider::ForecastProvider,
};

/// Issued when a lookup starts. Only the most recently issued ticket may update the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// What the view currently shows. Replaced wholesale on each applied result.
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Ready(Arc<ForecastPayload>),
    Failed(GatewayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// A newer lookup was started before this one finished.
    Stale,
}

/// The caller side of the gateway: one display slot fed by possibly overlapping lookups.
#[derive(Debug)]
pub struct ForecastSession {
    provider: Arc<dyn ForecastProvider>,
    latest: AtomicU64,
    display: RwLock<ViewState>,
}

impl ForecastSession {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self { provider, latest: AtomicU64::new(0), display: RwLock::new(ViewState::Idle) }
    }

    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    pub async fn apply(
        &self,
        ticket: RequestTicket,
        result: Result<ForecastPayload, GatewayError>,
    ) -> Applied {
        let mut display = self.display.write().await;
        // Checked under the write lock so a newer result cannot be overwritten.
        if !self.is_latest(ticket) {
            tracing::debug!(ticket = ticket.0, "discarding stale forecast result");
            return Applied::Stale;
        }
        *display = match result {
            Ok(payload) => ViewState::Ready(Arc::new(payload)),
            Err(err) => ViewState::Failed(err),
        };
        Applied::Current
    }

    /// Start a lookup, wait for it, and apply the result unless superseded.
    pub async fn search(&self, query: &LocationQuery) -> Applied {
        let ticket = self.begin();
        let result = self.provider.fetch_forecast(query).await.map(|res| res.payload);
        self.apply(ticket, result).await
    }

    /// Like [`ForecastSession::search`] for unvalidated input.
    pub async fn search_raw(&self, raw_query: &str) -> Applied {
        let ticket = self.begin();
        let result = self.provider.fetch(raw_query).await.map(|res| res.payload);
        self.apply(ticket, result).await
    }

    pub async fn snapshot(&self) -> ViewState {
        self.display.read().await.clone()
    }
}
