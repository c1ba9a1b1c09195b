pub mod aggregator;
pub mod config;
pub mod observer;
pub mod page;
pub mod parser;
pub mod scraper;
pub mod types;

pub use config::CrawlerConfig;
pub use observer::{CrawlObserver, LogObserver, NoopObserver};
pub use scraper::{ScraperError, WebScraper, crawl_html, crawl_text};

pub(crate) const BASE_URL: &str = "https://bi.saude.ba.gov.br/transparencia/";
pub(crate) const DATE_MARKER: &str = "ÚLTIMA ATUALIZAÇÃO";
