use super::ui;
use crate::core::{Dimensions, RecordStore};
use comfy_table::Cell;

impl Dimensions {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Dimension"),
            ui::header_cell("Count"),
            ui::header_cell("Values"),
        ]);

        let years = ui::format_optional(self.year_span(), |(first, last)| {
            format!("{first}-{last}")
        });
        table.add_row(vec![
            Cell::new("Years"),
            ui::number_cell(self.years.len().to_string()),
            Cell::new(years),
        ]);

        for (name, values) in [
            ("Reporters", &self.reporters),
            ("Partners", &self.partners),
            ("Products", &self.products),
        ] {
            table.add_row(vec![
                Cell::new(name),
                ui::number_cell(values.len().to_string()),
                Cell::new(values.join(", ")),
            ]);
        }

        table.to_string()
    }
}

pub fn run(store: &RecordStore) -> anyhow::Result<()> {
    println!(
        "{}\n\n{}",
        ui::style_text("Available filters", ui::StyleType::Title),
        store.dimensions().display_as_table()
    );
    Ok(())
}
