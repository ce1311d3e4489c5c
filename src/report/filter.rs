use super::table::{TableRow, CATEGORY_COLUMN};

/// Row filter applied while building a table view. Never touches the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Filter {
    pub(crate) query: String,
    pub(crate) category: Option<String>,
}

impl Filter {
    pub(crate) fn is_active(&self) -> bool {
        !self.query.is_empty() || self.category.is_some()
    }

    /// Case-insensitive substring match over every visible data cell, then
    /// exact equality on the category cell when a category is selected.
    pub(crate) fn matches(&self, row: &TableRow) -> bool {
        if let Some(category) = &self.category {
            if row.cells.get(CATEGORY_COLUMN) != Some(category) {
                return false;
            }
        }
        if self.query.is_empty() {
            return true;
        }
        row.text()
            .to_lowercase()
            .contains(&self.query.to_lowercase())
    }

    pub(crate) fn describe(&self) -> String {
        match (&self.query, &self.category) {
            (q, None) if q.is_empty() => String::new(),
            (q, None) => format!("search: '{q}'"),
            (q, Some(c)) if q.is_empty() => format!("category: {c}"),
            (q, Some(c)) => format!("search: '{q}' category: {c}"),
        }
    }
}
