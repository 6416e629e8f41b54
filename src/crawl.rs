//! Conversion of crawler output documents into observations.
//!
//! A crawl document groups items by platform and then by keyword. Each keyword
//! becomes one observation whose counters are the sum over its items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::{Observation, RawMetrics};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub stats: RawMetrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformCrawl {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub success: bool,
    /// Items keyed by the keyword they were found for.
    #[serde(default)]
    pub data: BTreeMap<String, Vec<CrawlItem>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlDocument {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformCrawl>,
}

impl CrawlDocument {
    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&data)?)
    }

    fn keyword_totals(&self, platform_key: &str, keyword: &str) -> Option<(RawMetrics, u64)> {
        let crawl = self.platforms.get(platform_key)?;
        if !crawl.success {
            return None;
        }
        crawl
            .data
            .get(keyword)
            .filter(|items| !items.is_empty())
            .map(|items| sum_items(items))
    }
}

impl PlatformCrawl {
    /// The platform identifier, falling back to the document key.
    fn platform_id<'a>(&'a self, key: &'a str) -> &'a str {
        if self.platform.trim().is_empty() {
            key
        } else {
            &self.platform
        }
    }
}

/// One observation per (platform, keyword) in `current`. Unsuccessful
/// platforms are skipped. When `previous` has items for the same keyword on
/// the same platform, their totals become the previous-period snapshot. An
/// empty item list there counts as no history.
pub fn observations_from_crawl(
    current: &CrawlDocument,
    previous: Option<&CrawlDocument>,
) -> Vec<Observation> {
    let mut observations = Vec::new();

    for (key, crawl) in &current.platforms {
        if !crawl.success {
            warn!(platform = %key, "skipping unsuccessful crawl");
            continue;
        }

        for (keyword, items) in &crawl.data {
            let (stats, posts) = sum_items(items);
            let mut observation = Observation::new(keyword.clone(), crawl.platform_id(key), stats, posts);
            if let Some((prev_stats, _)) =
                previous.and_then(|previous| previous.keyword_totals(key, keyword))
            {
                observation = observation.with_previous(prev_stats);
            }
            observations.push(observation);
        }
    }

    debug!(observations = observations.len(), "converted crawl document");
    observations
}

fn sum_items(items: &[CrawlItem]) -> (RawMetrics, u64) {
    let mut total = RawMetrics::default();
    for item in items {
        total.accumulate(&item.stats);
    }
    (total, items.len() as u64)
}
