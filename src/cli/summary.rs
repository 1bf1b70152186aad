use super::ui;
use crate::core::{FilterSelection, KpiSet, RecordStore, filter, summarize};
use comfy_table::Cell;
use tracing::debug;

impl KpiSet {
    /// Renders the KPI cards as a two-column table.
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

        let rows = vec![
            (
                "Export Value (USD mln)",
                ui::number_cell(ui::format_number(self.total_export_value, 1)),
            ),
            (
                "Quantity (tonnes)",
                ui::number_cell(ui::format_number(self.total_quantity, 0)),
            ),
            (
                "Avg Unit Price",
                ui::format_optional_cell(self.avg_unit_price, |p| {
                    format!("{} USD/t", ui::format_number(p, 0))
                }),
            ),
            (
                "Weighted Tariff",
                ui::format_optional_cell(self.weighted_tariff, |t| {
                    format!("{}%", ui::format_number(t, 2))
                }),
            ),
            (
                "FTA Share",
                ui::format_optional_cell(self.fta_share, |s| {
                    format!("{}%", ui::format_number(s * 100.0, 1))
                }),
            ),
            (
                "Unique Partners",
                ui::number_cell(ui::format_number(self.unique_partner_count as f64, 0)),
            ),
            (
                "Unique Products",
                ui::number_cell(ui::format_number(self.unique_product_count as f64, 0)),
            ),
        ];

        for (label, value) in rows {
            table.add_row(vec![Cell::new(label), value]);
        }
        table.to_string()
    }
}

/// Computes and renders the KPI summary for a selection.
pub fn render(store: &RecordStore, selection: &FilterSelection) -> String {
    let view = filter(store, selection);
    debug!(matched = view.len(), "Summarizing filtered view");
    let kpis = summarize(&view);

    let mut output = format!(
        "{}\n{}\n{}\n\n",
        ui::style_text("Trade Summary", ui::StyleType::Title),
        ui::style_text(&super::describe_selection(selection), ui::StyleType::Subtle),
        ui::style_text(
            &format!("Records matched: {} of {}", view.len(), store.len()),
            ui::StyleType::Subtle
        ),
    );
    output.push_str(&kpis.display_as_table());
    output
}

pub fn run(store: &RecordStore, selection: &FilterSelection) -> anyhow::Result<()> {
    println!("{}", render(store, selection));
    Ok(())
}
