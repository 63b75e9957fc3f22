//! The fixed SQL behind each report.
//!
//! Every query is parameterless and filters out soft-deleted items
//! (`ospos_items.deleted = 0`). Year, month and count projections are cast to
//! `SIGNED` so they always decode as 64-bit integers.

use core_types::ReportKind;

const SALES_DATA: &str = r#"
    SELECT
        CAST(YEAR(s.sale_time) AS SIGNED) AS sale_year,
        i.item_number AS barcode,
        i.name AS item_name,
        i.category,
        SUM(si.item_unit_price * si.quantity_purchased) AS revenue,
        SUM((si.item_unit_price - si.item_cost_price) * si.quantity_purchased) AS profit
    FROM ospos_sales s
    JOIN ospos_sales_items si ON s.sale_id = si.sale_id
    JOIN ospos_items i ON si.item_id = i.item_id
    WHERE i.deleted = 0
    GROUP BY sale_year, i.item_id
    ORDER BY sale_year DESC, profit DESC
"#;

const SEASONALITY_VELOCITY: &str = r#"
    SELECT
        CAST(YEAR(s.sale_time) AS SIGNED) AS sale_year,
        CAST(MONTH(s.sale_time) AS SIGNED) AS sale_month,
        i.category,
        SUM(si.item_unit_price * si.quantity_purchased) AS revenue,
        SUM((si.item_unit_price - si.item_cost_price) * si.quantity_purchased) AS profit
    FROM ospos_sales s
    JOIN ospos_sales_items si ON s.sale_id = si.sale_id
    JOIN ospos_items i ON si.item_id = i.item_id
    WHERE i.deleted = 0
    GROUP BY sale_year, sale_month, i.category
    ORDER BY sale_year DESC, sale_month ASC
"#;

// `s1.item_id < s2.item_id` rules out self pairs and counts each item pair once.
const MARKET_BASKET_ANALYSIS: &str = r#"
    SELECT
        i1.category AS category_a,
        i2.category AS category_b,
        CAST(COUNT(DISTINCT s1.sale_id) AS SIGNED) AS attachment_count
    FROM ospos_sales_items s1
    JOIN ospos_sales_items s2 ON s1.sale_id = s2.sale_id AND s1.item_id < s2.item_id
    JOIN ospos_items i1 ON s1.item_id = i1.item_id
    JOIN ospos_items i2 ON s2.item_id = i2.item_id
    WHERE i1.deleted = 0
      AND i2.deleted = 0
      AND i1.category != i2.category
    GROUP BY category_a, category_b
    ORDER BY attachment_count DESC
    LIMIT 500
"#;

/// Returns the SQL text for a report.
pub fn sql_for(report: ReportKind) -> &'static str {
    match report {
        ReportKind::SalesData => SALES_DATA,
        ReportKind::SeasonalityVelocity => SEASONALITY_VELOCITY,
        ReportKind::MarketBasketAnalysis => MARKET_BASKET_ANALYSIS,
    }
}
