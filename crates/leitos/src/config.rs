use std::time::Duration;

use crate::types::CapacityPolicy;

#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub url: String,
    /// Upper bound for the whole page request.
    pub timeout: Duration,
    /// Text identifying the paragraph that carries the update date.
    pub date_marker: String,
    /// 1-based position of the occupancy table among `table.PageTable` elements.
    pub table_index: usize,
    pub capacity_policy: CapacityPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            url: crate::BASE_URL.to_string(),
            timeout: Duration::from_secs(360),
            date_marker: crate::DATE_MARKER.to_string(),
            table_index: 7,
            capacity_policy: CapacityPolicy::default(),
        }
    }
}
