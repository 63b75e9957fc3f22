use crate::error::ExportError;
use core_types::{ReportKind, ReportRows};
use serde::Serialize;
use std::collections::BTreeMap;

/// Every report's result set, keyed by report name.
///
/// `ReportKind` orders by catalog position, so serialization always emits
/// `sales_data`, `seasonality_velocity`, `market_basket_analysis` in that order.
/// A finished bundle holds every catalog report, empty ones as `[]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataBundle {
    reports: BTreeMap<ReportKind, ReportRows>,
}

impl DataBundle {
    pub fn get(&self, report: ReportKind) -> Option<&ReportRows> {
        self.reports.get(&report)
    }

    /// Reports and their rows, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ReportKind, &ReportRows)> {
        self.reports.iter().map(|(kind, rows)| (*kind, rows))
    }

    pub fn row_counts(&self) -> Vec<(ReportKind, usize)> {
        self.iter().map(|(kind, rows)| (kind, rows.len())).collect()
    }
}

/// Accumulates result sets report by report.
#[derive(Debug, Default)]
pub struct BundleBuilder {
    reports: BTreeMap<ReportKind, ReportRows>,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rows: ReportRows) -> Result<(), ExportError> {
        let kind = rows.kind();
        if self.reports.contains_key(&kind) {
            return Err(ExportError::DuplicateReport(kind));
        }
        self.reports.insert(kind, rows);
        Ok(())
    }

    /// Seals the bundle, failing if any catalog report was never inserted.
    pub fn finish(self) -> Result<DataBundle, ExportError> {
        if let Some(missing) = ReportKind::ALL
            .into_iter()
            .find(|kind| !self.reports.contains_key(kind))
        {
            return Err(ExportError::Incomplete(missing));
        }
        Ok(DataBundle {
            reports: self.reports,
        })
    }
}
