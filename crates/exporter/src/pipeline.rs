use crate::bundle::{BundleBuilder, DataBundle};
use crate::error::ExportError;
use crate::writer::{render_artifact, write_artifact};
use core_types::ReportKind;
use database::ReportSource;
use std::path::PathBuf;

/// Where the data bundle goes and what it is called.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_path: PathBuf,
    pub bundle_identifier: String,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub output_path: PathBuf,
    pub row_counts: Vec<(ReportKind, usize)>,
    pub bytes_written: usize,
}

/// Runs the full export against `source` and releases it afterwards.
///
/// Reports are fetched strictly in catalog order, one at a time. The output
/// file is only touched once every report has been fetched and the artifact
/// has been rendered, so any failure before that leaves an existing file
/// untouched. `source` is closed on every path, success or failure.
pub async fn run_export<S: ReportSource>(
    mut source: S,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let outcome = export_reports(&mut source, options).await;
    source.close().await;
    outcome
}

async fn export_reports<S: ReportSource>(
    source: &mut S,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let bundle = assemble_bundle(source).await?;
    let artifact = render_artifact(&bundle, &options.bundle_identifier)?;
    write_artifact(&options.output_path, &artifact).await?;

    tracing::info!(
        "All reports exported successfully to {}",
        options.output_path.display()
    );

    Ok(ExportSummary {
        output_path: options.output_path.clone(),
        row_counts: bundle.row_counts(),
        bytes_written: artifact.len(),
    })
}

/// Fetches every catalog report from `source` into a sealed bundle.
pub async fn assemble_bundle<S: ReportSource>(source: &mut S) -> Result<DataBundle, ExportError> {
    let mut builder = BundleBuilder::new();
    for report in ReportKind::ALL {
        tracing::info!("Generating {report}...");
        let rows = source.fetch_report(report).await?;
        builder.insert(rows)?;
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{MarketBasketRow, ReportRows, SalesDataRow, SeasonalityRow};
    use database::DbError;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    /// In-memory stand-in for the database.
    struct FakeSource {
        reports: HashMap<ReportKind, ReportRows>,
        fail_on: Option<ReportKind>,
        fetched: Vec<ReportKind>,
        closes: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn new(reports: Vec<ReportRows>) -> Self {
            Self {
                reports: reports.into_iter().map(|rows| (rows.kind(), rows)).collect(),
                fail_on: None,
                fetched: Vec::new(),
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing_on(mut self, report: ReportKind) -> Self {
            self.fail_on = Some(report);
            self
        }
    }

    impl ReportSource for FakeSource {
        async fn fetch_report(&mut self, report: ReportKind) -> Result<ReportRows, DbError> {
            self.fetched.push(report);
            if self.fail_on == Some(report) {
                return Err(DbError::query(
                    report,
                    sqlx::Error::Protocol("Unknown column 'sale_month'".to_string()),
                ));
            }
            Ok(self
                .reports
                .get(&report)
                .cloned()
                .unwrap_or_else(|| ReportRows::empty(report)))
        }

        async fn close(self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// One sale in 2024 containing a coffee item and a pastry item.
    fn single_sale_reports() -> Vec<ReportRows> {
        vec![
            ReportRows::SalesData(vec![
                SalesDataRow {
                    sale_year: 2024,
                    barcode: Some("1001".to_string()),
                    item_name: "Espresso Beans".to_string(),
                    category: "Coffee".to_string(),
                    revenue: dec!(30.00),
                    profit: dec!(12.00),
                },
                SalesDataRow {
                    sale_year: 2024,
                    barcode: None,
                    item_name: "Croissant".to_string(),
                    category: "Pastry".to_string(),
                    revenue: dec!(7.50),
                    profit: dec!(4.50),
                },
            ]),
            ReportRows::SeasonalityVelocity(vec![
                SeasonalityRow {
                    sale_year: 2024,
                    sale_month: 5,
                    category: "Coffee".to_string(),
                    revenue: dec!(30.00),
                    profit: dec!(12.00),
                },
                SeasonalityRow {
                    sale_year: 2024,
                    sale_month: 5,
                    category: "Pastry".to_string(),
                    revenue: dec!(7.50),
                    profit: dec!(4.50),
                },
            ]),
            ReportRows::MarketBasketAnalysis(vec![MarketBasketRow {
                category_a: "Coffee".to_string(),
                category_b: "Pastry".to_string(),
                attachment_count: 1,
            }]),
        ]
    }

    fn options(path: PathBuf) -> ExportOptions {
        ExportOptions {
            output_path: path,
            bundle_identifier: "OSPOS_DATA_BUNDLE".to_string(),
        }
    }

    fn parse_artifact(text: &str) -> Value {
        let json = text
            .strip_prefix("const OSPOS_DATA_BUNDLE = ")
            .and_then(|rest| rest.strip_suffix(';'))
            .expect("artifact is a single const assignment");
        serde_json::from_str(json).expect("artifact holds valid JSON")
    }

    #[tokio::test]
    async fn single_sale_scenario_end_to_end() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("exports").join("ospos_data.js");
        let source = FakeSource::new(single_sale_reports());
        let closes = source.closes.clone();

        let summary = run_export(source, &options(path.clone())).await.unwrap();

        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert_eq!(
            summary.row_counts,
            vec![
                (ReportKind::SalesData, 2),
                (ReportKind::SeasonalityVelocity, 2),
                (ReportKind::MarketBasketAnalysis, 1),
            ]
        );

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(summary.bytes_written, text.len());
        assert_eq!(
            parse_artifact(&text),
            json!({
                "sales_data": [
                    {"sale_year": 2024, "barcode": "1001", "item_name": "Espresso Beans",
                     "category": "Coffee", "revenue": "30.00", "profit": "12.00"},
                    {"sale_year": 2024, "barcode": null, "item_name": "Croissant",
                     "category": "Pastry", "revenue": "7.50", "profit": "4.50"}
                ],
                "seasonality_velocity": [
                    {"sale_year": 2024, "sale_month": 5, "category": "Coffee",
                     "revenue": "30.00", "profit": "12.00"},
                    {"sale_year": 2024, "sale_month": 5, "category": "Pastry",
                     "revenue": "7.50", "profit": "4.50"}
                ],
                "market_basket_analysis": [
                    {"category_a": "Coffee", "category_b": "Pastry", "attachment_count": 1}
                ]
            })
        );

        let sales = text.find("\"sales_data\"").unwrap();
        let seasonality = text.find("\"seasonality_velocity\"").unwrap();
        let basket = text.find("\"market_basket_analysis\"").unwrap();
        assert!(sales < seasonality && seasonality < basket);
    }

    #[tokio::test]
    async fn empty_database_still_emits_every_key() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ospos_data.js");

        run_export(FakeSource::new(Vec::new()), &options(path.clone()))
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            concat!(
                r#"const OSPOS_DATA_BUNDLE = {"sales_data":[],"#,
                r#""seasonality_velocity":[],"market_basket_analysis":[]};"#
            )
        );
    }

    #[tokio::test]
    async fn row_order_is_preserved() {
        let ranked = [
            (2025, dec!(9)),
            (2024, dec!(50)),
            (2024, dec!(3)),
            (2023, dec!(-2)),
        ];
        let rows: Vec<SalesDataRow> = ranked
            .into_iter()
            .enumerate()
            .map(|(i, (year, profit))| SalesDataRow {
                sale_year: year,
                barcode: Some(format!("{i}")),
                item_name: format!("Item {i}"),
                category: "General".to_string(),
                revenue: profit,
                profit,
            })
            .collect();
        let mut source = FakeSource::new(vec![ReportRows::SalesData(rows.clone())]);

        let bundle = assemble_bundle(&mut source).await.unwrap();

        assert_eq!(
            bundle.get(ReportKind::SalesData),
            Some(&ReportRows::SalesData(rows))
        );
        assert_eq!(source.fetched, ReportKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn query_failure_writes_nothing_and_closes_source() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("exports").join("ospos_data.js");
        let source = FakeSource::new(single_sale_reports())
            .failing_on(ReportKind::SeasonalityVelocity);
        let closes = source.closes.clone();

        let err = run_export(source, &options(path.clone())).await.unwrap_err();

        assert!(matches!(
            &err,
            ExportError::Database(DbError::QueryError {
                report: ReportKind::SeasonalityVelocity,
                ..
            })
        ));
        assert!(err.to_string().contains("seasonality_velocity"));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[tokio::test]
    async fn query_failure_leaves_previous_output_untouched() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ospos_data.js");
        std::fs::write(&path, "const OSPOS_DATA_BUNDLE = {\"previous\":true};").unwrap();

        let source = FakeSource::new(single_sale_reports())
            .failing_on(ReportKind::MarketBasketAnalysis);
        run_export(source, &options(path.clone())).await.unwrap_err();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "const OSPOS_DATA_BUNDLE = {\"previous\":true};"
        );
    }

    #[tokio::test]
    async fn write_failure_still_closes_source() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("exports");
        std::fs::write(&blocker, "not a directory").unwrap();
        let source = FakeSource::new(single_sale_reports());
        let closes = source.closes.clone();

        let err = run_export(source, &options(blocker.join("ospos_data.js")))
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Write { .. }));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_runs_are_byte_identical() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ospos_data.js");

        run_export(FakeSource::new(single_sale_reports()), &options(path.clone()))
            .await
            .unwrap();
        let first = std::fs::read(&path).unwrap();
        run_export(FakeSource::new(single_sale_reports()), &options(path.clone()))
            .await
            .unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }
}
