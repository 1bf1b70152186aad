use super::ui;
use crate::core::{Dashboard, FilterSelection, RecordStore, compute_with_baseline};
use clap::ValueEnum;
use comfy_table::{Cell, Table};

/// Dashboard tabs, each grouping related aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportSection {
    /// Nominal vs real series, top partners, product share
    Executive,
    /// Prices, tariffs and FTA split
    Prices,
    /// Partner totals and distance lanes
    Geography,
    /// Top-N partner table
    Table,
}

impl ReportSection {
    pub const ALL: [ReportSection; 4] = [
        ReportSection::Executive,
        ReportSection::Prices,
        ReportSection::Geography,
        ReportSection::Table,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::Executive => "Executive Summary",
            ReportSection::Prices => "Prices & Tariffs",
            ReportSection::Geography => "Geography & Lanes",
            ReportSection::Table => "Table (Top N)",
        }
    }
}

/// Settings that shape the rendered report.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub top_n: usize,
    pub baseline_year: i32,
    pub section: Option<ReportSection>,
}

fn titled(title: &str, table: Option<Table>) -> String {
    let body = match table {
        Some(table) => table.to_string(),
        None => ui::style_text("No records match the current filters.", ui::StyleType::Subtle),
    };
    format!("{}\n{}\n", ui::style_text(title, ui::StyleType::Heading), body)
}

fn table_with_header(headers: &[&str]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(headers.iter().map(|h| ui::header_cell(h)).collect::<Vec<_>>());
    table
}

fn value_cell(value: f64) -> Cell {
    ui::number_cell(ui::format_number(value, 1))
}

fn executive(dashboard: &Dashboard, options: &ReportOptions) -> Vec<String> {
    let aggregates = &dashboard.aggregates;

    let series = (!aggregates.nominal_vs_real.is_empty()).then(|| {
        let mut table = table_with_header(&["Year", "Nominal (USD mln)", "Real (USD mln)"]);
        for row in &aggregates.nominal_vs_real {
            table.add_row(vec![
                Cell::new(row.year),
                value_cell(row.val),
                ui::format_optional_cell(row.real_val, |v| ui::format_number(v, 1)),
            ]);
        }
        table
    });

    let partners = (!aggregates.top_partners.is_empty()).then(|| {
        let mut table = table_with_header(&["Partner", "Export Value (USD mln)"]);
        for row in &aggregates.top_partners {
            table.add_row(vec![Cell::new(&row.partner), value_cell(row.value)]);
        }
        table
    });

    let products = (!aggregates.product_share.is_empty()).then(|| {
        let mut table = table_with_header(&["Product", "Export Value (USD mln)", "Share"]);
        for row in &aggregates.product_share {
            table.add_row(vec![
                Cell::new(&row.product),
                value_cell(row.value),
                ui::format_optional_cell(row.share, |s| format!("{:.1}%", s * 100.0)),
            ]);
        }
        table
    });

    vec![
        titled(
            &format!(
                "Exports: Nominal vs Real ({} USD mln)",
                options.baseline_year
            ),
            series,
        ),
        titled(
            &format!("Top {} Partners by Export Value", options.top_n),
            partners,
        ),
        titled("Product Share of Export Value", products),
    ]
}

fn prices(dashboard: &Dashboard) -> Vec<String> {
    let aggregates = &dashboard.aggregates;

    let price = (!aggregates.price_by_year_product.is_empty()).then(|| {
        let mut table = table_with_header(&["Year", "Product", "Avg Price (USD/t)"]);
        for row in &aggregates.price_by_year_product {
            table.add_row(vec![
                Cell::new(row.year),
                Cell::new(&row.product),
                ui::format_optional_cell(row.avg_price, |p| ui::format_number(p, 0)),
            ]);
        }
        table
    });

    let tariff = (!aggregates.tariff_vs_price.is_empty()).then(|| {
        let mut table = table_with_header(&[
            "Product",
            "Weighted Tariff (%)",
            "Avg Price (USD/t)",
            "Export Value (USD mln)",
        ]);
        for row in &aggregates.tariff_vs_price {
            table.add_row(vec![
                Cell::new(&row.product),
                ui::number_cell(ui::format_number(row.weighted_tariff, 2)),
                ui::format_optional_cell(row.avg_price, |p| ui::format_number(p, 0)),
                value_cell(row.value),
            ]);
        }
        table
    });

    let fta = (!aggregates.fta_split_by_year.is_empty()).then(|| {
        let mut table = table_with_header(&["Year", "Status", "Export Value (USD mln)"]);
        for row in &aggregates.fta_split_by_year {
            table.add_row(vec![
                Cell::new(row.year),
                Cell::new(row.status),
                value_cell(row.value),
            ]);
        }
        table
    });

    vec![
        titled("Avg Unit Price by Year (weighted)", price),
        titled("Weighted Tariff vs Avg Price", tariff),
        titled("FTA vs Non-FTA Export Value", fta),
    ]
}

fn geography(dashboard: &Dashboard) -> Vec<String> {
    let aggregates = &dashboard.aggregates;

    let partners = (!aggregates.partner_totals.is_empty()).then(|| {
        let mut table = table_with_header(&["Partner (ISO3)", "Export Value (USD mln)"]);
        for row in &aggregates.partner_totals {
            table.add_row(vec![Cell::new(&row.partner), value_cell(row.value)]);
        }
        table
    });

    let lanes = (!aggregates.distance_vs_value.is_empty()).then(|| {
        let mut table = table_with_header(&[
            "Partner",
            "Product",
            "Distance (km)",
            "Export Value (USD mln)",
        ]);
        for row in &aggregates.distance_vs_value {
            table.add_row(vec![
                Cell::new(&row.partner),
                Cell::new(&row.product),
                ui::format_optional_cell(row.distance, |d| ui::format_number(d, 0)),
                value_cell(row.value),
            ]);
        }
        table
    });

    vec![
        titled("Export Value by Partner", partners),
        titled("Distance vs Export Value (by product)", lanes),
    ]
}

fn top_table(dashboard: &Dashboard, options: &ReportOptions) -> Vec<String> {
    let rows = &dashboard.aggregates.top_partner_table;
    let table = (!rows.is_empty()).then(|| {
        let mut table = table_with_header(&[
            "Partner",
            "Value (USD mln)",
            "Quantity (t)",
            "Avg Price (USD/t)",
        ]);
        for row in rows {
            table.add_row(vec![
                Cell::new(&row.partner),
                value_cell(row.value),
                ui::number_cell(ui::format_number(row.quantity, 0)),
                ui::format_optional_cell(row.avg_price, |p| ui::format_number(p, 0)),
            ]);
        }
        table
    });

    vec![titled(
        &format!("Top {} Partners - table", options.top_n),
        table,
    )]
}

/// Renders the requested sections of an already computed dashboard.
pub fn render_dashboard(dashboard: &Dashboard, options: &ReportOptions) -> String {
    let sections: Vec<ReportSection> = match options.section {
        Some(section) => vec![section],
        None => ReportSection::ALL.to_vec(),
    };

    let mut blocks = Vec::new();
    for section in sections {
        let tables = match section {
            ReportSection::Executive => executive(dashboard, options),
            ReportSection::Prices => prices(dashboard),
            ReportSection::Geography => geography(dashboard),
            ReportSection::Table => top_table(dashboard, options),
        };
        blocks.push(format!(
            "{}\n\n{}",
            ui::style_text(section.title(), ui::StyleType::Title),
            tables.join("\n")
        ));
    }
    let separator = format!("\n{}\n\n", ui::separator());
    blocks.join(separator.as_str())
}

pub fn render(store: &RecordStore, selection: &FilterSelection, options: &ReportOptions) -> String {
    let dashboard = compute_with_baseline(store, selection, options.top_n, options.baseline_year);
    let header = format!(
        "{}\n{}\n\n",
        ui::style_text(&super::describe_selection(selection), ui::StyleType::Subtle),
        ui::style_text(
            &format!(
                "Records matched: {} of {}",
                dashboard.matched_records,
                store.len()
            ),
            ui::StyleType::Subtle
        ),
    );
    header + &render_dashboard(&dashboard, options)
}

pub fn run(
    store: &RecordStore,
    selection: &FilterSelection,
    options: &ReportOptions,
) -> anyhow::Result<()> {
    println!("{}", render(store, selection, options));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TradeRecord;

    fn store() -> RecordStore {
        RecordStore::new(vec![
            TradeRecord {
                fta_active: 1,
                quantity_tonnes: Some(2.0),
                unit_price_usd_per_tonne: Some(5.0),
                reporter_cpi: Some(100.0),
                distance_km: Some(1500.0),
                ..TradeRecord::new(2019, "AAA", "BBB", "P1", 10.0)
            },
            TradeRecord {
                reporter_cpi: Some(110.0),
                ..TradeRecord::new(2020, "AAA", "CCC", "P2", 20.0)
            },
        ])
    }

    fn options(section: Option<ReportSection>) -> ReportOptions {
        ReportOptions {
            top_n: 15,
            baseline_year: 2020,
            section,
        }
    }

    #[test]
    fn test_full_report_has_every_tab() {
        let output = render(&store(), &FilterSelection::years(2019, 2020), &options(None));

        for section in ReportSection::ALL {
            assert!(output.contains(section.title()), "missing {}", section.title());
        }
        assert!(output.contains("Exports: Nominal vs Real (2020 USD mln)"));
        assert!(output.contains("Top 15 Partners by Export Value"));
        assert!(output.contains("Non-FTA"));
        assert!(output.contains("1,500"));
    }

    #[test]
    fn test_single_section() {
        let output = render(
            &store(),
            &FilterSelection::years(2019, 2020),
            &options(Some(ReportSection::Table)),
        );

        assert!(output.contains("Top 15 Partners - table"));
        assert!(!output.contains("Executive Summary"));
        // CCC has no quantity, so its price is undefined
        assert!(output.contains("N/A"));
        assert!(output.contains("5,000,000"));
    }

    #[test]
    fn test_empty_selection_reports_no_records() {
        let output = render(
            &store(),
            &FilterSelection::years(2019, 2020).with_partners(["ZZZ"]),
            &options(Some(ReportSection::Geography)),
        );
        assert!(output.contains("Records matched: 0 of 2"));
        assert!(output.contains("No records match the current filters."));
    }
}
