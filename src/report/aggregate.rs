use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::ExpenseRecord;

/// Key → summed amount, iterated in the order keys were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Totals {
    entries: Vec<(String, Decimal)>,
    index: HashMap<String, usize>,
}

impl Totals {
    fn add(&mut self, key: &str, amount: Decimal) {
        match self.index.get(key) {
            Some(&i) => {
                let sum = &mut self.entries[i].1;
                *sum = sum.saturating_add(amount);
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
    }

    pub(crate) fn entries(&self) -> &[(String, Decimal)] {
        &self.entries
    }

    pub(crate) fn get(&self, key: &str) -> Option<Decimal> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub(crate) fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, (_, amt)| acc.saturating_add(*amt))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn by_category(records: &[ExpenseRecord]) -> Totals {
    let mut totals = Totals::default();
    for record in records {
        totals.add(&record.category, record.amount);
    }
    totals
}

pub(crate) fn by_month(records: &[ExpenseRecord]) -> Totals {
    let mut totals = Totals::default();
    for record in records {
        totals.add(month_key(&record.date), record.amount);
    }
    totals
}

/// First seven characters of the date, with no calendar parsing.
/// `"2024-01-15"` → `"2024-01"`; `"Jan 5"` → `"Jan 5"`.
pub(crate) fn month_key(date: &str) -> &str {
    match date.char_indices().nth(7) {
        Some((end, _)) => &date[..end],
        None => date,
    }
}
