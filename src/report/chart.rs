use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::aggregate::{by_category, by_month, Totals};
use crate::models::ExpenseRecord;

/// Parallel label/value series handed to one chart widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ChartData {
    pub(crate) labels: Vec<String>,
    pub(crate) values: Vec<Decimal>,
}

impl ChartData {
    fn from_totals(totals: &Totals) -> Self {
        let (labels, values) = totals.entries().iter().cloned().unzip();
        Self { labels, values }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub(crate) fn total(&self) -> Decimal {
        self.values
            .iter()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
    }

    /// Each value as a percentage of the total, 0 when the total is 0 or the
/// division does not fit.
    pub(crate) fn shares(&self) -> Vec<f64> {
        let total = self.total();
        self.values
            .iter()
            .map(|v| {
                v.checked_div(total)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .and_then(|pct| pct.to_f64())
                    .unwrap_or(0.0)
            })
            .collect()
    }
}

/// Both dashboard charts. Rebuilt wholesale whenever the records change.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Charts {
    /// Category distribution (the pie).
    pub(crate) category: ChartData,
    /// Monthly totals in first-seen month order, not sorted.
    pub(crate) monthly: ChartData,
}

impl Charts {
    pub(crate) fn build(records: &[ExpenseRecord]) -> Self {
        Self {
            category: ChartData::from_totals(&by_category(records)),
            monthly: ChartData::from_totals(&by_month(records)),
        }
    }
}
