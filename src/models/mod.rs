mod bill;
mod expense;

pub use bill::{encode_data_uri, BillAsset};
pub use expense::{ExpenseDraft, ExpenseRecord};
