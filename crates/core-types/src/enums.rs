use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed catalog of reports exported into the data bundle.
///
/// Variant order is catalog order: `Ord` follows declaration order, so any
/// ordered collection keyed by `ReportKind` iterates in the order the bundle
/// is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Yearly revenue and profit per item.
    SalesData,
    /// Monthly revenue and profit per category.
    SeasonalityVelocity,
    /// Co-occurrence counts of distinct category pairs within one sale.
    MarketBasketAnalysis,
}

impl ReportKind {
    /// Every report, in the order it appears in the exported bundle.
    pub const ALL: [ReportKind; 3] = [
        ReportKind::SalesData,
        ReportKind::SeasonalityVelocity,
        ReportKind::MarketBasketAnalysis,
    ];

    /// The key under which this report is emitted.
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::SalesData => "sales_data",
            ReportKind::SeasonalityVelocity => "seasonality_velocity",
            ReportKind::MarketBasketAnalysis => "market_basket_analysis",
        }
    }

    /// Output columns of the report's query, in projection order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            ReportKind::SalesData => &[
                "sale_year",
                "barcode",
                "item_name",
                "category",
                "revenue",
                "profit",
            ],
            ReportKind::SeasonalityVelocity => {
                &["sale_year", "sale_month", "category", "revenue", "profit"]
            }
            ReportKind::MarketBasketAnalysis => &["category_a", "category_b", "attachment_count"],
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|report| report.name() == s)
            .ok_or_else(|| CoreError::UnknownReport(s.to_string()))
    }
}
