use rust_decimal::Decimal;

use crate::observer::{CrawlObserver, NoopObserver};
use crate::types::{BedCategory, BedRow, CapacityPolicy, OccupancyReport};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Expected {expected} bed rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("Report date is empty")]
    EmptyDate,
    #[error("{category} (row {row}) reports {occupied} occupied beds out of {total}")]
    OccupiedExceedsTotal {
        row: usize,
        category: BedCategory,
        occupied: u32,
        total: u32,
    },
}

/// The extracted rows bound to the categories they stand for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedLayout {
    pub adult_ward: BedRow,
    pub pediatric_ward: BedRow,
    pub adult_icu: BedRow,
    pub pediatric_icu: BedRow,
}

impl BedLayout {
    /// Binds rows by position, following [`BedCategory::LAYOUT`]. Labels are
    /// not inspected.
    pub fn from_rows(rows: &[BedRow]) -> Result<Self, ValidationError> {
        let [adult_ward, pediatric_ward, adult_icu, pediatric_icu] = rows else {
            return Err(ValidationError::RowCount {
                expected: BedCategory::LAYOUT.len(),
                found: rows.len(),
            });
        };

        Ok(Self {
            adult_ward: adult_ward.clone(),
            pediatric_ward: pediatric_ward.clone(),
            adult_icu: adult_icu.clone(),
            pediatric_icu: pediatric_icu.clone(),
        })
    }

    pub fn get(&self, category: BedCategory) -> &BedRow {
        match category {
            BedCategory::AdultWard => &self.adult_ward,
            BedCategory::PediatricWard => &self.pediatric_ward,
            BedCategory::AdultIcu => &self.adult_icu,
            BedCategory::PediatricIcu => &self.pediatric_icu,
        }
    }
}

/// `active / total` as an exact decimal, or `None` when there are no beds.
pub fn occupancy_rate(active: u64, total: u64) -> Option<Decimal> {
    Decimal::from(active)
        .checked_div(Decimal::from(total))
        .map(|rate| rate.normalize())
}

fn check_capacity(
    layout: &BedLayout,
    policy: CapacityPolicy,
    observer: &dyn CrawlObserver,
) -> Result<(), ValidationError> {
    for (row, category) in BedCategory::LAYOUT.into_iter().enumerate() {
        let bed = layout.get(category);
        if bed.occupied <= bed.total {
            continue;
        }
        let err = ValidationError::OccupiedExceedsTotal {
            row,
            category,
            occupied: bed.occupied,
            total: bed.total,
        };
        match policy {
            CapacityPolicy::Strict => return Err(err),
            CapacityPolicy::Lenient => observer.anomaly(&err.to_string()),
        }
    }
    Ok(())
}

/// Aggregates the four dashboard rows with the lenient capacity policy and
/// no observer.
pub fn aggregate(rows: &[BedRow], report_date: &str) -> Result<OccupancyReport, ValidationError> {
    aggregate_with(rows, report_date, CapacityPolicy::default(), &NoopObserver)
}

pub fn aggregate_with(
    rows: &[BedRow],
    report_date: &str,
    policy: CapacityPolicy,
    observer: &dyn CrawlObserver,
) -> Result<OccupancyReport, ValidationError> {
    let layout = BedLayout::from_rows(rows)?;
    if report_date.is_empty() {
        return Err(ValidationError::EmptyDate);
    }
    check_capacity(&layout, policy, observer)?;

    let ward_total = u64::from(layout.adult_ward.total) + u64::from(layout.pediatric_ward.total);
    let ward_active =
        u64::from(layout.adult_ward.occupied) + u64::from(layout.pediatric_ward.occupied);
    let icu_total = u64::from(layout.adult_icu.total) + u64::from(layout.pediatric_icu.total);
    let icu_active =
        u64::from(layout.adult_icu.occupied) + u64::from(layout.pediatric_icu.occupied);

    let ward_occupancy_rate = occupancy_rate(ward_active, ward_total);
    if ward_occupancy_rate.is_none() {
        observer.anomaly("Ward total is zero, occupancy rate left undefined");
    }
    let icu_occupancy_rate = occupancy_rate(icu_active, icu_total);
    if icu_occupancy_rate.is_none() {
        observer.anomaly("ICU total is zero, occupancy rate left undefined");
    }

    let report = OccupancyReport {
        ward_total,
        ward_active,
        icu_total,
        icu_active,
        ward_occupancy_rate,
        icu_occupancy_rate,
        report_date: report_date.to_string(),
    };
    observer.report_built(&report);
    Ok(report)
}
