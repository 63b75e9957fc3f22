use crate::enums::ReportKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Field names match the column aliases of the catalog queries exactly, and
// field order matches projection order. Both carry through to the bundle.

/// One row of `sales_data`: an item's totals for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SalesDataRow {
    pub sale_year: i64,
    /// The item's `item_number`, which OSPOS allows to be empty.
    pub barcode: Option<String>,
    pub item_name: String,
    pub category: String,
    pub revenue: Decimal,
    pub profit: Decimal,
}

/// One row of `seasonality_velocity`: a category's totals for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SeasonalityRow {
    pub sale_year: i64,
    pub sale_month: i64,
    pub category: String,
    pub revenue: Decimal,
    pub profit: Decimal,
}

/// One row of `market_basket_analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MarketBasketRow {
    pub category_a: String,
    pub category_b: String,
    /// Number of distinct sales in which both categories were purchased.
    pub attachment_count: i64,
}

/// The complete, ordered result set of a single report.
///
/// Serializes as a plain array of row objects; the report name is carried by
/// the enclosing bundle key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportRows {
    SalesData(Vec<SalesDataRow>),
    SeasonalityVelocity(Vec<SeasonalityRow>),
    MarketBasketAnalysis(Vec<MarketBasketRow>),
}

impl ReportRows {
    /// An empty result set for the given report.
    pub fn empty(kind: ReportKind) -> Self {
        match kind {
            ReportKind::SalesData => ReportRows::SalesData(Vec::new()),
            ReportKind::SeasonalityVelocity => ReportRows::SeasonalityVelocity(Vec::new()),
            ReportKind::MarketBasketAnalysis => ReportRows::MarketBasketAnalysis(Vec::new()),
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRows::SalesData(_) => ReportKind::SalesData,
            ReportRows::SeasonalityVelocity(_) => ReportKind::SeasonalityVelocity,
            ReportRows::MarketBasketAnalysis(_) => ReportKind::MarketBasketAnalysis,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportRows::SalesData(rows) => rows.len(),
            ReportRows::SeasonalityVelocity(rows) => rows.len(),
            ReportRows::MarketBasketAnalysis(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
