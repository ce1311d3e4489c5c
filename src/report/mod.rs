mod aggregate;
mod chart;
mod csv_export;
mod filter;
mod table;

pub(crate) use aggregate::{by_category, by_month, Totals};
pub(crate) use chart::Charts;
pub(crate) use csv_export::{export_csv, write_csv, EXPORT_FILE_NAME};
pub(crate) use filter::Filter;
pub(crate) use table::{TableView, AMOUNT_COLUMN};

#[cfg(test)]
mod tests;
