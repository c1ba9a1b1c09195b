use crate::aggregator::{ValidationError, aggregate_with};
use crate::config::CrawlerConfig;
use crate::observer::CrawlObserver;
use crate::page::DashboardPage;
use crate::parser::{ParseError, extract_report_date, extract_rows};
use crate::types::{CapacityPolicy, OccupancyReport};

use reqwest::Client;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Failed to read page: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),
}

/// Runs the extraction pipeline over the two rendered page regions.
pub fn crawl_text(
    raw_date_text: &str,
    raw_table_text: &str,
    policy: CapacityPolicy,
    observer: &dyn CrawlObserver,
) -> Result<OccupancyReport, ScraperError> {
    let report_date = extract_report_date(raw_date_text)?;
    log::debug!("Dashboard last updated on {}", report_date);

    let rows = extract_rows(raw_table_text)?;
    observer.rows_extracted(&rows);

    Ok(aggregate_with(&rows, &report_date, policy, observer)?)
}

/// Locates the date label and occupancy table in `html` and aggregates them.
pub fn crawl_html(
    html: &str,
    config: &CrawlerConfig,
    observer: &dyn CrawlObserver,
) -> Result<OccupancyReport, ScraperError> {
    let page = DashboardPage::parse(html);
    let date_text = page.date_text(&config.date_marker)?;
    let table_text = page.table_text(config.table_index)?;

    crawl_text(&date_text, &table_text, config.capacity_policy, observer)
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    config: CrawlerConfig,
}

impl WebScraper {
    pub fn new(config: CrawlerConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub async fn fetch_page(&self) -> Result<String, ScraperError> {
        log::info!("Fetching dashboard from {}...", self.config.url);

        let html = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;

        Ok(html)
    }

    pub async fn crawl(&self, observer: &dyn CrawlObserver) -> Result<OccupancyReport, ScraperError> {
        let html = self.fetch_page().await?;
        crawl_html(&html, &self.config, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::occupancy_rate;
    use crate::observer::NoopObserver;
    use crate::observer::testing::RecordingObserver;
    use rust_decimal::Decimal;
    use std::fs;

    fn fixture() -> String {
        fs::read_to_string("fixtures/dashboard.html").expect("Failed to read fixture")
    }

    #[test]
    fn test_crawl_html_from_fixture() {
        let observer = RecordingObserver::default();

        let report = crawl_html(&fixture(), &CrawlerConfig::default(), &observer)
            .expect("Failed to crawl fixture");

        assert_eq!(report.report_date, "05/03/2021");
        assert_eq!(report.ward_total, 2730);
        assert_eq!(report.ward_active, 1425);
        assert_eq!(report.icu_total, 1280);
        assert_eq!(report.icu_active, 963);
        assert_eq!(report.ward_occupancy_rate, occupancy_rate(1425, 2730));
        assert_eq!(
            report.icu_occupancy_rate,
            Some(Decimal::new(75234375, 8))
        );

        assert_eq!(observer.rows.borrow().as_slice(), [4]);
        assert!(observer.anomalies.borrow().is_empty());
    }

    #[test]
    fn test_crawl_html_wrong_table() {
        let config = CrawlerConfig {
            table_index: 6,
            ..CrawlerConfig::default()
        };

        let err = crawl_html(&fixture(), &config, &NoopObserver).expect_err("Should fail");
        assert!(matches!(
            err,
            ScraperError::ValidationError(ValidationError::RowCount { found: 0, .. })
        ));
    }

    #[test]
    fn test_crawl_text_without_date() {
        let err = crawl_text(
            "ÚLTIMA ATUALIZAÇÃO: em breve\n",
            "",
            CapacityPolicy::Lenient,
            &NoopObserver,
        )
        .expect_err("Should fail");
        assert!(matches!(
            err,
            ScraperError::ParseError(ParseError::MissingDate(_))
        ));
    }

    #[test]
    fn test_crawl_text_strict_policy() {
        let table = "A\nx\n10\ny\n11\nB\nx\n1\ny\n1\nC\nx\n1\ny\n1\nD\nx\n1\ny\n1\n";

        let err = crawl_text("05/03/2021", table, CapacityPolicy::Strict, &NoopObserver)
            .expect_err("Should fail");
        assert!(matches!(
            err,
            ScraperError::ValidationError(ValidationError::OccupiedExceedsTotal { row: 0, .. })
        ));
    }
}
