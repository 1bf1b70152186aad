//! Trade records and the immutable store that holds them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One bilateral trade observation.
///
/// Required fields are always present; everything else may be missing in the
/// source data and is kept as `None` rather than coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub year: i32,
    pub reporter_iso3: String,
    pub partner_iso3: String,
    pub product_code: String,
    pub distance_km: Option<f64>,
    pub fta_active: i64,
    pub adval_tariff_pct: Option<f64>,
    pub reporter_gdp_bln: Option<f64>,
    pub partner_gdp_bln: Option<f64>,
    pub reporter_pop_m: Option<f64>,
    pub partner_pop_m: Option<f64>,
    pub reporter_cpi: Option<f64>,
    pub partner_cpi: Option<f64>,
    pub export_value_usd_mln: f64,
    pub quantity_tonnes: Option<f64>,
    pub unit_price_usd_per_tonne: Option<f64>,
}

impl TradeRecord {
    /// Builds a record from its required fields. FTA is inactive and all
    /// optional measures are missing.
    pub fn new(
        year: i32,
        reporter_iso3: impl Into<String>,
        partner_iso3: impl Into<String>,
        product_code: impl Into<String>,
        export_value_usd_mln: f64,
    ) -> Self {
        Self {
            year,
            reporter_iso3: reporter_iso3.into(),
            partner_iso3: partner_iso3.into(),
            product_code: product_code.into(),
            distance_km: None,
            fta_active: 0,
            adval_tariff_pct: None,
            reporter_gdp_bln: None,
            partner_gdp_bln: None,
            reporter_pop_m: None,
            partner_pop_m: None,
            reporter_cpi: None,
            partner_cpi: None,
            export_value_usd_mln,
            quantity_tonnes: None,
            unit_price_usd_per_tonne: None,
        }
    }

    pub fn is_fta(&self) -> bool {
        self.fta_active == 1
    }
}

/// Distinct values of each filterable dimension, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dimensions {
    pub years: Vec<i32>,
    pub reporters: Vec<String>,
    pub partners: Vec<String>,
    pub products: Vec<String>,
}

impl Dimensions {
    /// Inclusive span of the years present, if any.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        match (self.years.first(), self.years.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }
}

/// Read-only table of cleaned trade records.
///
/// Built once at startup and only ever borrowed afterwards, so it can be shared
/// across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<TradeRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<TradeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &TradeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimensions(&self) -> Dimensions {
        let mut years = BTreeSet::new();
        let mut reporters = BTreeSet::new();
        let mut partners = BTreeSet::new();
        let mut products = BTreeSet::new();

        for record in &self.records {
            years.insert(record.year);
            reporters.insert(record.reporter_iso3.as_str());
            partners.insert(record.partner_iso3.as_str());
            products.insert(record.product_code.as_str());
        }

        Dimensions {
            years: years.into_iter().collect(),
            reporters: reporters.into_iter().map(String::from).collect(),
            partners: partners.into_iter().map(String::from).collect(),
            products: products.into_iter().map(String::from).collect(),
        }
    }
}

impl From<Vec<TradeRecord>> for RecordStore {
    fn from(records: Vec<TradeRecord>) -> Self {
        Self::new(records)
    }
}
