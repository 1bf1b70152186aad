//! Grouped, chart-ready aggregates over a filtered view.
//!
//! Each routine partitions the view by a key into a `BTreeMap` of accumulators
//! and then reduces every group to a row. Groups come out in ascending key
//! order; routines that rank use a stable sort, so ties keep that order.

use super::filter::FilteredView;
use super::record::{RecordStore, TradeRecord};
use super::stats::{Mean, WeightedMean};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Year whose average reporter CPI deflates nominal values.
pub const DEFAULT_BASELINE_YEAR: i32 = 2020;

/// Floor for the value denominator of the per-product tariff.
pub const TARIFF_VALUE_FLOOR: f64 = 1e-9;

const USD_PER_MLN: f64 = 1e6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub val: f64,
    pub cpi: Option<f64>,
    pub real_val: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerValue {
    pub partner: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductValue {
    pub product: String,
    pub value: f64,
    pub share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearProductPrice {
    pub year: i32,
    pub product: String,
    pub avg_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTariffPrice {
    pub product: String,
    pub weighted_tariff: f64,
    pub avg_price: Option<f64>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum FtaStatus {
    #[serde(rename = "FTA")]
    Fta,
    #[serde(rename = "Non-FTA")]
    NonFta,
}

impl fmt::Display for FtaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FtaStatus::Fta => write!(f, "FTA"),
            FtaStatus::NonFta => write!(f, "Non-FTA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearStatusValue {
    pub year: i32,
    pub status: FtaStatus,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneValue {
    pub partner: String,
    pub product: String,
    pub value: f64,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerRow {
    pub partner: String,
    pub value: f64,
    pub quantity: f64,
    pub avg_price: Option<f64>,
}

/// Partitions the view by `key` and folds each record into its group.
fn group_by<'a, K, A, F, G>(view: &FilteredView<'a>, key: F, mut fold: G) -> BTreeMap<K, A>
where
    K: Ord,
    A: Default,
    F: Fn(&'a TradeRecord) -> K,
    G: FnMut(&mut A, &'a TradeRecord),
{
    let mut groups: BTreeMap<K, A> = BTreeMap::new();
    for record in view.iter() {
        fold(groups.entry(key(record)).or_default(), record);
    }
    groups
}

fn sum_value_by_partner(view: &FilteredView) -> Vec<PartnerValue> {
    group_by(
        view,
        |r| r.partner_iso3.as_str(),
        |total: &mut f64, r| *total += r.export_value_usd_mln,
    )
    .into_iter()
    .map(|(partner, value)| PartnerValue {
        partner: partner.to_string(),
        value,
    })
    .collect()
}

fn rank_descending<T>(rows: &mut [T], value: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| value(b).total_cmp(&value(a)));
}

/// Mean reporter CPI over the whole store for `year`.
pub fn baseline_cpi(store: &RecordStore, year: i32) -> Option<f64> {
    let mut mean = Mean::default();
    for record in store.iter().filter(|r| r.year == year) {
        mean.push(record.reporter_cpi);
    }
    mean.value()
}

/// Nominal value per year alongside its value deflated to `baseline_year`
/// prices.
pub fn nominal_vs_real(
    view: &FilteredView,
    store: &RecordStore,
    baseline_year: i32,
) -> Vec<YearValue> {
    let baseline = baseline_cpi(store, baseline_year);

    group_by(
        view,
        |r| r.year,
        |(val, cpi): &mut (f64, Mean), r| {
            *val += r.export_value_usd_mln;
            cpi.push(r.reporter_cpi);
        },
    )
    .into_iter()
    .map(|(year, (val, cpi))| {
        let cpi = cpi.value();
        let real_val = match (baseline, cpi) {
            (Some(base), Some(cpi)) if cpi != 0.0 => Some(val * (base / cpi)),
            _ => None,
        };
        YearValue {
            year,
            val,
            cpi,
            real_val,
        }
    })
    .collect()
}

/// The `top_n` partners by export value.
pub fn top_partners(view: &FilteredView, top_n: usize) -> Vec<PartnerValue> {
    let mut rows = sum_value_by_partner(view);
    rank_descending(&mut rows, |row| row.value);
    rows.truncate(top_n);
    rows
}

/// Export value per product with its share of the view total.
pub fn product_share(view: &FilteredView) -> Vec<ProductValue> {
    let groups = group_by(
        view,
        |r| r.product_code.as_str(),
        |total: &mut f64, r| *total += r.export_value_usd_mln,
    );
    let total: f64 = groups.values().sum();

    groups
        .into_iter()
        .map(|(product, value)| ProductValue {
            product: product.to_string(),
            value,
            share: (total > 0.0).then(|| value / total),
        })
        .collect()
}

/// Quantity-weighted unit price per year and product.
pub fn price_by_year_product(view: &FilteredView) -> Vec<YearProductPrice> {
    group_by(
        view,
        |r| (r.year, r.product_code.as_str()),
        |price: &mut WeightedMean, r| price.push(r.unit_price_usd_per_tonne, r.quantity_tonnes),
    )
    .into_iter()
    .map(|((year, product), price)| YearProductPrice {
        year,
        product: product.to_string(),
        avg_price: price.value(),
    })
    .collect()
}

#[derive(Default)]
struct TariffPriceAcc {
    tariff_value: f64,
    value: f64,
    price: WeightedMean,
}

/// Value-weighted tariff against quantity-weighted price, per product.
///
/// The tariff denominator is floored at [`TARIFF_VALUE_FLOOR`] so every
/// product yields a point, even one with no export value.
pub fn tariff_vs_price(view: &FilteredView) -> Vec<ProductTariffPrice> {
    group_by(
        view,
        |r| r.product_code.as_str(),
        |acc: &mut TariffPriceAcc, r| {
            if let Some(tariff) = r.adval_tariff_pct {
                acc.tariff_value += tariff * r.export_value_usd_mln;
            }
            acc.value += r.export_value_usd_mln;
            acc.price.push(r.unit_price_usd_per_tonne, r.quantity_tonnes);
        },
    )
    .into_iter()
    .map(|(product, acc)| ProductTariffPrice {
        product: product.to_string(),
        weighted_tariff: acc.tariff_value / acc.value.max(TARIFF_VALUE_FLOOR),
        avg_price: acc.price.value(),
        value: acc.value,
    })
    .collect()
}

/// Export value per year split by FTA status, two rows per year.
pub fn fta_split_by_year(view: &FilteredView) -> Vec<YearStatusValue> {
    group_by(
        view,
        |r| r.year,
        |(fta, non_fta): &mut (f64, f64), r| {
            if r.is_fta() {
                *fta += r.export_value_usd_mln;
            } else {
                *non_fta += r.export_value_usd_mln;
            }
        },
    )
    .into_iter()
    .flat_map(|(year, (fta, non_fta))| {
        [
            YearStatusValue {
                year,
                status: FtaStatus::Fta,
                value: fta,
            },
            YearStatusValue {
                year,
                status: FtaStatus::NonFta,
                value: non_fta,
            },
        ]
    })
    .collect()
}

/// Export value per partner, keyed by ISO3 code for map rendering.
pub fn partner_totals(view: &FilteredView) -> Vec<PartnerValue> {
    sum_value_by_partner(view)
}

/// Export value and mean distance per partner and product.
pub fn distance_vs_value(view: &FilteredView) -> Vec<LaneValue> {
    group_by(
        view,
        |r| (r.partner_iso3.as_str(), r.product_code.as_str()),
        |(value, distance): &mut (f64, Mean), r| {
            *value += r.export_value_usd_mln;
            distance.push(r.distance_km);
        },
    )
    .into_iter()
    .map(|((partner, product), (value, distance))| LaneValue {
        partner: partner.to_string(),
        product: product.to_string(),
        value,
        distance: distance.value(),
    })
    .collect()
}

/// The `top_n` partners by value with quantity and implied USD/tonne.
pub fn top_partner_table(view: &FilteredView, top_n: usize) -> Vec<PartnerRow> {
    let mut rows: Vec<PartnerRow> = group_by(
        view,
        |r| r.partner_iso3.as_str(),
        |(value, quantity): &mut (f64, f64), r| {
            *value += r.export_value_usd_mln;
            *quantity += r.quantity_tonnes.unwrap_or_default();
        },
    )
    .into_iter()
    .map(|(partner, (value, quantity))| PartnerRow {
        partner: partner.to_string(),
        value,
        quantity,
        avg_price: (quantity != 0.0).then(|| value * USD_PER_MLN / quantity),
    })
    .collect();

    rank_descending(&mut rows, |row| row.value);
    rows.truncate(top_n);
    rows
}
