//! The single entry point a front end calls on every filter change.

use super::aggregate::{
    self, DEFAULT_BASELINE_YEAR, LaneValue, PartnerRow, PartnerValue, ProductTariffPrice,
    ProductValue, YearProductPrice, YearStatusValue, YearValue,
};
use super::filter::{FilterSelection, filter};
use super::kpi::{self, KpiSet};
use super::record::RecordStore;
use serde::Serialize;
use tracing::debug;

/// The nine aggregates behind the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub nominal_vs_real: Vec<YearValue>,
    pub top_partners: Vec<PartnerValue>,
    pub product_share: Vec<ProductValue>,
    pub price_by_year_product: Vec<YearProductPrice>,
    pub tariff_vs_price: Vec<ProductTariffPrice>,
    pub fta_split_by_year: Vec<YearStatusValue>,
    pub partner_totals: Vec<PartnerValue>,
    pub distance_vs_value: Vec<LaneValue>,
    pub top_partner_table: Vec<PartnerRow>,
}

/// Everything derived from one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub matched_records: usize,
    pub kpis: KpiSet,
    pub aggregates: Aggregates,
}

/// Recomputes KPIs and aggregates from scratch for a selection, deflating to
/// the default baseline year.
pub fn compute(store: &RecordStore, selection: &FilterSelection, top_n: usize) -> Dashboard {
    compute_with_baseline(store, selection, top_n, DEFAULT_BASELINE_YEAR)
}

pub fn compute_with_baseline(
    store: &RecordStore,
    selection: &FilterSelection,
    top_n: usize,
    baseline_year: i32,
) -> Dashboard {
    let view = filter(store, selection);
    debug!(
        matched = view.len(),
        total = store.len(),
        top_n,
        baseline_year,
        "Computing dashboard"
    );

    Dashboard {
        matched_records: view.len(),
        kpis: kpi::summarize(&view),
        aggregates: Aggregates {
            nominal_vs_real: aggregate::nominal_vs_real(&view, store, baseline_year),
            top_partners: aggregate::top_partners(&view, top_n),
            product_share: aggregate::product_share(&view),
            price_by_year_product: aggregate::price_by_year_product(&view),
            tariff_vs_price: aggregate::tariff_vs_price(&view),
            fta_split_by_year: aggregate::fta_split_by_year(&view),
            partner_totals: aggregate::partner_totals(&view),
            distance_vs_value: aggregate::distance_vs_value(&view),
            top_partner_table: aggregate::top_partner_table(&view, top_n),
        },
    }
}
