use crate::types::{BedRow, OccupancyReport};

/// Receives pipeline events. Passed into [`crate::crawl_html`] and
/// [`crate::aggregator::aggregate_with`] instead of logging from globals.
pub trait CrawlObserver {
    fn rows_extracted(&self, _rows: &[BedRow]) {}

    fn report_built(&self, _report: &OccupancyReport) {}

    /// Something odd in the published figures that did not stop the crawl.
    fn anomaly(&self, _message: &str) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl CrawlObserver for LogObserver {
    fn rows_extracted(&self, rows: &[BedRow]) {
        log::info!("Extracted {} bed rows", rows.len());
        for row in rows {
            log::debug!("  {}", row);
        }
    }

    fn report_built(&self, report: &OccupancyReport) {
        log::info!("Built occupancy report for {}", report.report_date);
    }

    fn anomaly(&self, message: &str) {
        log::warn!("{}", message);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        pub rows: RefCell<Vec<usize>>,
        pub reports: RefCell<Vec<String>>,
        pub anomalies: RefCell<Vec<String>>,
    }

    impl CrawlObserver for RecordingObserver {
        fn rows_extracted(&self, rows: &[BedRow]) {
            self.rows.borrow_mut().push(rows.len());
        }

        fn report_built(&self, report: &OccupancyReport) {
            self.reports.borrow_mut().push(report.report_date.clone());
        }

        fn anomaly(&self, message: &str) {
            self.anomalies.borrow_mut().push(message.to_string());
        }
    }
}
