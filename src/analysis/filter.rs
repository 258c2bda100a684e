//! Text filtering over rendered expense rows.

use crate::models::Expense;

/// Fields the table filter looks at.
pub trait Filterable {
    fn description(&self) -> &str;
    fn category(&self) -> &str;
}

impl Filterable for Expense {
    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }
}

impl<A: AsRef<str>, B: AsRef<str>> Filterable for (A, B) {
    fn description(&self) -> &str {
        self.0.as_ref()
    }

    fn category(&self) -> &str {
        self.1.as_ref()
    }
}

/// Case-insensitive substring match on description or category.
pub fn matches<T: Filterable + ?Sized>(needle: &str, record: &T) -> bool {
    let needle = needle.to_lowercase();
    matches_lowered(&needle, record)
}

fn matches_lowered<T: Filterable + ?Sized>(needle: &str, record: &T) -> bool {
    needle.is_empty()
        || record.description().to_lowercase().contains(needle)
        || record.category().to_lowercase().contains(needle)
}

/// One visibility flag per record, in input order. An empty needle shows everything.
pub fn visibility<T: Filterable>(needle: &str, records: &[T]) -> Vec<bool> {
    let needle = needle.to_lowercase();
    records
        .iter()
        .map(|r| matches_lowered(&needle, r))
        .collect()
}

/// Split the comma-separated category box into the list sent to the service.
pub fn parse_category_filter(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
