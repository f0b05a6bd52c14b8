use std::sync::Arc;

use campaign_models::config::DashboardConfig;
use campaign_models::{TrendBar, TrendDocument, TrendRow};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::TrendStore;

/// Read-only reporting view over the trend store.
///
/// Always queries the configured background topic, independent of what
/// users ask the pipeline.
pub struct TrendDashboard {
    store: Arc<dyn TrendStore>,
    config: DashboardConfig,
}

impl TrendDashboard {
    pub fn new(store: Arc<dyn TrendStore>, config: DashboardConfig) -> Self {
        Self { store, config }
    }

    pub fn topic(&self) -> &str {
        &self.config.topic
    }

    /// Top `table_k` trends for the background topic, in retrieval order.
    pub async fn table(&self) -> Result<Vec<TrendRow>, StoreError> {
        self.top(&self.config.topic, self.config.table_k).await
    }

    /// Growth-rate bars for the top `chart_k` trends, in retrieval order.
    pub async fn chart(&self) -> Result<Vec<TrendBar>, StoreError> {
        let documents = self
            .store
            .search(&self.config.topic, self.config.chart_k)
            .await?;
        Ok(chart_bars(&documents))
    }

    /// Tabular view for an arbitrary topic.
    pub async fn top(&self, topic: &str, k: usize) -> Result<Vec<TrendRow>, StoreError> {
        let documents = self.store.search(topic, k).await?;
        debug!(topic, k, found = documents.len(), "Dashboard query");
        Ok(table_rows(&documents))
    }
}

pub fn table_rows(documents: &[TrendDocument]) -> Vec<TrendRow> {
    documents
        .iter()
        .map(|d| TrendRow {
            name: d.name().to_string(),
            growth_rate: d.growth_rate_text(),
        })
        .collect()
}

/// Bars for documents with a parseable growth rate; the rest are left out.
pub fn chart_bars(documents: &[TrendDocument]) -> Vec<TrendBar> {
    documents
        .iter()
        .filter_map(|d| match d.growth_rate() {
            Some(rate) => Some(TrendBar {
                name: d.name().to_string(),
                growth_rate: rate,
            }),
            None => {
                if let Some(raw) = d.growth_rate_text() {
                    warn!(
                        trend = d.name(),
                        growth_rate = %raw,
                        "Unparseable growth rate, omitted from chart"
                    );
                }
                None
            }
        })
        .collect()
}
