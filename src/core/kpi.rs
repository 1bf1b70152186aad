//! Headline metrics for a filtered view.

use super::filter::FilteredView;
use super::stats::{self, WeightedMean};
use serde::Serialize;
use std::collections::HashSet;

/// The seven KPIs shown above the dashboard. `None` means undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSet {
    pub total_export_value: f64,
    pub total_quantity: f64,
    pub avg_unit_price: Option<f64>,
    pub weighted_tariff: Option<f64>,
    pub fta_share: Option<f64>,
    pub unique_partner_count: usize,
    pub unique_product_count: usize,
}

pub fn summarize(view: &FilteredView) -> KpiSet {
    let total_export_value: f64 = view.iter().map(|r| r.export_value_usd_mln).sum();
    let total_quantity = stats::sum_present(view.iter().map(|r| r.quantity_tonnes));

    let mut price = WeightedMean::default();
    for record in view.iter() {
        price.push(record.unit_price_usd_per_tonne, record.quantity_tonnes);
    }

    let weighted_tariff = (total_export_value > 0.0).then(|| {
        let tariff_value = stats::sum_present(
            view.iter()
                .map(|r| r.adval_tariff_pct.map(|t| t * r.export_value_usd_mln)),
        );
        tariff_value / total_export_value
    });

    let fta_share = if total_export_value > 0.0 {
        stats::weighted_share(view.iter(), |r| Some(r.export_value_usd_mln), |r| r.is_fta())
    } else {
        None
    };

    let unique_partner_count = view
        .iter()
        .map(|r| r.partner_iso3.as_str())
        .collect::<HashSet<_>>()
        .len();
    let unique_product_count = view
        .iter()
        .map(|r| r.product_code.as_str())
        .collect::<HashSet<_>>()
        .len();

    KpiSet {
        total_export_value,
        total_quantity,
        avg_unit_price: price.value(),
        weighted_tariff,
        fta_share,
        unique_partner_count,
        unique_product_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{FilterSelection, filter};
    use crate::core::record::{RecordStore, TradeRecord};

    fn record(partner: &str, product: &str, value: f64, fta: bool) -> TradeRecord {
        TradeRecord {
            fta_active: i64::from(fta),
            ..TradeRecord::new(2019, "AAA", partner, product, value)
        }
    }

    #[test]
    fn test_totals_and_counts() {
        let store = RecordStore::new(vec![
            TradeRecord {
                quantity_tonnes: Some(2.0),
                unit_price_usd_per_tonne: Some(5.0),
                ..record("BBB", "P1", 10.0, true)
            },
            TradeRecord {
                quantity_tonnes: Some(6.0),
                unit_price_usd_per_tonne: Some(9.0),
                ..record("CCC", "P2", 20.0, false)
            },
            TradeRecord {
                quantity_tonnes: None,
                unit_price_usd_per_tonne: Some(1000.0),
                ..record("BBB", "P2", 5.0, false)
            },
        ]);
        let view = filter(&store, &FilterSelection::years(2019, 2019));
        let kpis = summarize(&view);

        assert_eq!(kpis.total_export_value, 35.0);
        assert_eq!(kpis.total_quantity, 8.0);
        // (5*2 + 9*6) / 8; the record without quantity is skipped
        assert_eq!(kpis.avg_unit_price, Some(8.0));
        assert_eq!(kpis.unique_partner_count, 2);
        assert_eq!(kpis.unique_product_count, 2);
    }

    #[test]
    fn test_missing_tariff_contributes_nothing() {
        let store = RecordStore::new(vec![
            TradeRecord {
                adval_tariff_pct: Some(4.0),
                ..record("BBB", "P1", 10.0, false)
            },
            record("CCC", "P1", 30.0, false),
        ]);
        let view = filter(&store, &FilterSelection::years(2019, 2019));
        assert_eq!(summarize(&view).weighted_tariff, Some(1.0));
    }

    #[test]
    fn test_fta_share_complements_to_one() {
        let store = RecordStore::new(vec![
            record("BBB", "P1", 10.0, true),
            record("CCC", "P1", 20.0, false),
            record("DDD", "P1", 15.0, true),
        ]);
        let view = filter(&store, &FilterSelection::years(2019, 2019));
        let share = summarize(&view).fta_share.unwrap();
        assert!((share - 25.0 / 45.0).abs() < 1e-12);
        assert!((share + (1.0 - share) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_view_has_undefined_ratios() {
        let store = RecordStore::new(vec![record("BBB", "P1", 10.0, true)]);
        let view = filter(&store, &FilterSelection::years(2030, 2040));
        let kpis = summarize(&view);

        assert_eq!(kpis.total_export_value, 0.0);
        assert_eq!(kpis.total_quantity, 0.0);
        assert_eq!(kpis.avg_unit_price, None);
        assert_eq!(kpis.weighted_tariff, None);
        assert_eq!(kpis.fta_share, None);
        assert_eq!(kpis.unique_partner_count, 0);
        assert_eq!(kpis.unique_product_count, 0);
    }

    #[test]
    fn test_zero_total_value_leaves_ratios_undefined() {
        let store = RecordStore::new(vec![TradeRecord {
            adval_tariff_pct: Some(3.0),
            ..record("BBB", "P1", 0.0, true)
        }]);
        let view = filter(&store, &FilterSelection::years(2019, 2019));
        let kpis = summarize(&view);
        assert_eq!(kpis.weighted_tariff, None);
        assert_eq!(kpis.fta_share, None);
        assert_eq!(kpis.unique_partner_count, 1);
    }
}
