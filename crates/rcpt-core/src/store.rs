//! In-memory receipt store.

use tracing::debug;

use crate::filter::distinct_categories;
use crate::models::receipt::Receipt;

/// All receipts of the current session, newest date first.
///
/// Among receipts with the same date, the most recently inserted comes first.
#[derive(Debug, Clone, Default)]
pub struct ReceiptStore {
    records: Vec<Receipt>,
}

impl ReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a receipt, keeping the date-descending order.
    ///
    /// Returns the position the receipt landed at.
    pub fn insert(&mut self, receipt: Receipt) -> usize {
        // Same result as prepending and stable-sorting by date descending:
        // the new receipt goes ahead of every existing one with its date.
        let position = self.records.partition_point(|r| r.date > receipt.date);
        self.records.insert(position, receipt);
        debug!(position, total = self.records.len(), "stored receipt");
        position
    }

    pub fn records(&self) -> &[Receipt] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Receipt> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories in store order.
    pub fn categories(&self) -> Vec<String> {
        distinct_categories(&self.records)
    }
}

impl FromIterator<Receipt> for ReceiptStore {
    fn from_iter<I: IntoIterator<Item = Receipt>>(iter: I) -> Self {
        let mut store = Self::new();
        for receipt in iter {
            store.insert(receipt);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::receipt;
    use pretty_assertions::assert_eq;

    fn order(store: &ReceiptStore) -> Vec<(String, String)> {
        store
            .records()
            .iter()
            .map(|r| (r.date.to_string(), r.company.clone()))
            .collect()
    }

    #[test]
    fn test_insert_keeps_date_descending() {
        let mut store = ReceiptStore::new();
        assert_eq!(store.insert(receipt("2024-01-05", "Acme", "Gas", "fuel")), 0);
        assert_eq!(store.insert(receipt("2024-03-01", "Cafe", "Dining", "coffee")), 0);
        assert_eq!(store.insert(receipt("2024-02-10", "Beta", "Dining", "lunch")), 1);
        assert_eq!(store.insert(receipt("2023-12-31", "Old", "Misc", "misc")), 3);

        assert_eq!(
            order(&store),
            vec![
                ("2024-03-01".to_string(), "Cafe".to_string()),
                ("2024-02-10".to_string(), "Beta".to_string()),
                ("2024-01-05".to_string(), "Acme".to_string()),
                ("2023-12-31".to_string(), "Old".to_string()),
            ]
        );
    }

    #[test]
    fn test_sorted_regardless_of_insertion_order() {
        let dates = ["2024-05-01", "2023-01-01", "2024-02-29", "2024-05-02", "2023-06-15"];
        let forward: ReceiptStore = dates.iter().map(|d| receipt(d, "X", "C", "d")).collect();
        let backward: ReceiptStore = dates.iter().rev().map(|d| receipt(d, "X", "C", "d")).collect();

        for store in [&forward, &backward] {
            assert!(store.records().windows(2).all(|w| w[0].date >= w[1].date));
        }
        assert_eq!(order(&forward), order(&backward));
    }

    #[test]
    fn test_same_date_newest_upload_first() {
        let mut store = ReceiptStore::new();
        store.insert(receipt("2024-02-10", "First", "Dining", "lunch"));
        store.insert(receipt("2024-02-11", "Later date", "Dining", "dinner"));
        let position = store.insert(receipt("2024-02-10", "Second", "Dining", "lunch"));

        assert_eq!(position, 1);
        assert_eq!(store.get(1).unwrap().company, "Second");
        assert_eq!(store.get(2).unwrap().company, "First");
    }

    #[test]
    fn test_categories_follow_store_order() {
        let mut store = ReceiptStore::new();
        store.insert(receipt("2024-01-01", "A", "Gas", "x"));
        store.insert(receipt("2024-02-01", "B", "Dining", "x"));
        store.insert(receipt("2024-03-01", "C", "Gas", "x"));

        assert_eq!(store.categories(), vec!["Gas", "Dining"]);
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }
}
