//! Filter selections and the views they produce.

use super::record::{RecordStore, TradeRecord};
use serde::Serialize;
use std::collections::BTreeSet;

/// The user's current filter choices.
///
/// An empty code set places no restriction on that dimension. The year range
/// is inclusive on both ends; an inverted range matches nothing. Code sets
/// are ordered so a selection always serializes the same way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub reporters: BTreeSet<String>,
    pub partners: BTreeSet<String>,
    pub products: BTreeSet<String>,
    pub year_min: i32,
    pub year_max: i32,
    pub fta_only: bool,
}

impl FilterSelection {
    /// A selection over the given years with no other restriction.
    pub fn years(year_min: i32, year_max: i32) -> Self {
        Self {
            reporters: BTreeSet::new(),
            partners: BTreeSet::new(),
            products: BTreeSet::new(),
            year_min,
            year_max,
            fta_only: false,
        }
    }

    pub fn with_reporters<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reporters = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_partners<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partners = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_products<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn fta_only(mut self, fta_only: bool) -> Self {
        self.fta_only = fta_only;
        self
    }

    pub fn matches(&self, record: &TradeRecord) -> bool {
        (self.year_min..=self.year_max).contains(&record.year)
            && allows(&self.reporters, &record.reporter_iso3)
            && allows(&self.partners, &record.partner_iso3)
            && allows(&self.products, &record.product_code)
            && (!self.fta_only || record.is_fta())
    }
}

fn allows(codes: &BTreeSet<String>, code: &str) -> bool {
    codes.is_empty() || codes.contains(code)
}

/// Records of a store that passed a selection, in store order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a TradeRecord>,
}

impl<'a> FilteredView<'a> {
    /// Narrows this view further by a selection.
    pub fn refine(&self, selection: &FilterSelection) -> FilteredView<'a> {
        FilteredView {
            records: self
                .records
                .iter()
                .copied()
                .filter(|r| selection.matches(r))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TradeRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Applies a selection to the store.
pub fn filter<'a>(store: &'a RecordStore, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView {
        records: store.iter().filter(|r| selection.matches(r)).collect(),
    }
}
