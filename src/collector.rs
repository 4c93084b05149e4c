//! Entry point of one collection cycle.

use crate::client::SansayClient;
use crate::document::{self, Document};
use crate::error::Result;
use crate::metrics::Sample;
use crate::projector;
use prometheus::core::Desc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Scrapes one target each time [`SansayCollector::collect`] is called.
///
/// Nothing is kept between cycles: every call fetches and parses a fresh
/// document.
#[derive(Clone)]
pub struct SansayCollector {
    client: Arc<SansayClient>,
    target: String,
}

impl SansayCollector {
    pub fn new(client: Arc<SansayClient>, target: impl Into<String>) -> Self {
        Self {
            client,
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Run one cycle.
    ///
    /// A fetch or parse failure yields a single invalid-metric marker and
    /// nothing else. Otherwise the result is the projected samples, with any
    /// per-field markers in place, ending with the scrape duration gauge.
    pub async fn collect(&self) -> Vec<Sample> {
        let started_at = Instant::now();
        let mut samples = Vec::new();

        let document = match self.scrape().await {
            Ok(document) => document,
            Err(e) => {
                warn!("Error scraping target {}: {}", self.target, e);
                samples.push(Sample::invalid(e));
                return samples;
            }
        };

        projector::project(&document, started_at, &mut samples);
        info!(
            scrape_target = %self.target,
            samples = samples.len(),
            errors = samples.iter().filter(|s| s.is_invalid()).count(),
            "Scrape complete"
        );
        samples
    }

    async fn scrape(&self) -> Result<Document> {
        let body = self.client.fetch(&self.target).await?;
        Ok(document::parse(&body)?)
    }
}

/// Constant description registered for a cycle's metrics.
///
/// Metric names come from the document at scrape time, so this carries no
/// schema of its own.
pub fn describe() -> prometheus::Result<Desc> {
    Desc::new(
        "sansay_collector".to_string(),
        "Sansay metrics are named from the scraped status document".to_string(),
        Vec::new(),
        HashMap::new(),
    )
}
