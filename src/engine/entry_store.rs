use std::sync::Arc;

use crate::catalog::{Catalog, OTHER_REP_CODE};
use crate::engine::entry::RepresentativeEntry;

/// Immutable view of the entry list at one point in time.
///
/// Entries are shared with the store until the store mutates one of them, at
/// which point only that entry is cloned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    entries: Arc<Vec<Arc<RepresentativeEntry>>>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RepresentativeEntry> {
        self.entries.get(index).map(|e| e.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepresentativeEntry> {
        self.entries.iter().map(|e| e.as_ref())
    }
}

/// Ordered list of representative entries plus every mutation on them.
///
/// Indices and category tags come from the UI; a bad one is a bug, so debug
/// builds assert and release builds log and ignore the call.
#[derive(Clone, Debug)]
pub struct EntryStore {
    entries: Arc<Vec<Arc<RepresentativeEntry>>>,
    catalog: Arc<Catalog>,
}

impl EntryStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            entries: Arc::new(vec![Arc::new(RepresentativeEntry::new())]),
            catalog,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&RepresentativeEntry> {
        self.entries.get(index).map(|e| e.as_ref())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: Arc::clone(&self.entries),
        }
    }

    /// Copy-on-write access to a single entry.
    fn entry_mut(&mut self, index: usize) -> Option<&mut RepresentativeEntry> {
        let len = self.entries.len();
        debug_assert!(index < len, "entry index {index} out of range ({len} entries)");
        if index >= len {
            tracing::warn!(index, len, "ignoring mutation of missing entry");
            return None;
        }
        let entries = Arc::make_mut(&mut self.entries);
        Some(Arc::make_mut(&mut entries[index]))
    }

    pub fn set_rep_code(&mut self, index: usize, code: &str) {
        let Some(entry) = self.entry_mut(index) else {
            return;
        };
        entry.rep_code = if code == OTHER_REP_CODE {
            String::new()
        } else {
            code.to_string()
        };
        entry.clear_sales();
        tracing::debug!(index, code, "rep code changed, entry reset");
    }

    pub fn set_free_text_rep_code(&mut self, index: usize, text: &str) {
        if let Some(entry) = self.entry_mut(index) {
            entry.rep_code = text.to_uppercase();
        }
    }

    /// Caller is responsible for the quantity floor; `u32` already rules out
    /// negatives.
    pub fn set_product_quantity(&mut self, index: usize, product: &str, quantity: u32) {
        if let Some(entry) = self.entry_mut(index) {
            entry.products.upsert(product, quantity);
        }
    }

    pub fn increment_product(&mut self, index: usize, product: &str) {
        let current = self.current_quantity(index, product, false);
        self.set_product_quantity(index, product, current.saturating_add(1));
    }

    pub fn decrement_product(&mut self, index: usize, product: &str) {
        let current = self.current_quantity(index, product, false);
        self.set_product_quantity(index, product, current.saturating_sub(1));
    }

    pub fn select_category(&mut self, index: usize, tag: &str) {
        let Some(category) = self.catalog.category(tag).cloned() else {
            debug_assert!(false, "unknown category '{tag}'");
            tracing::warn!(tag, catalog = %self.catalog.name, "ignoring unknown category");
            return;
        };
        let Some(entry) = self.entry_mut(index) else {
            return;
        };
        if entry.is_category_selected(tag) {
            return;
        }
        entry.selected_categories.push(category.tag.clone());
        for product in &category.products {
            entry.products.insert_if_absent(product, 0);
        }
        tracing::debug!(index, tag, "category selected");
    }

    /// Same upsert as `set_product_quantity`, against the custom tally. An
    /// empty name is stored as-is.
    pub fn set_custom_product_quantity(&mut self, index: usize, name: &str, quantity: u32) {
        if let Some(entry) = self.entry_mut(index) {
            entry.custom_products.upsert(name, quantity);
        }
    }

    /// Start tracking a custom product at zero, keeping any existing count.
    pub fn add_custom_product(&mut self, index: usize, name: &str) {
        if let Some(entry) = self.entry_mut(index) {
            entry.custom_products.insert_if_absent(name, 0);
        }
    }

    pub fn increment_custom_product(&mut self, index: usize, name: &str) {
        let current = self.current_quantity(index, name, true);
        self.set_custom_product_quantity(index, name, current.saturating_add(1));
    }

    pub fn decrement_custom_product(&mut self, index: usize, name: &str) {
        let current = self.current_quantity(index, name, true);
        self.set_custom_product_quantity(index, name, current.saturating_sub(1));
    }

    /// Stored verbatim; no numeric parsing happens anywhere.
    pub fn set_acc_profit(&mut self, index: usize, value: &str) {
        if let Some(entry) = self.entry_mut(index) {
            entry.acc_profit = value.to_string();
        }
    }

    pub fn add_entry(&mut self) {
        Arc::make_mut(&mut self.entries).push(Arc::new(RepresentativeEntry::new()));
    }

    pub fn reset_all(&mut self) {
        self.entries = Arc::new(vec![Arc::new(RepresentativeEntry::new())]);
    }

    fn current_quantity(&self, index: usize, name: &str, custom: bool) -> u32 {
        self.entry(index)
            .and_then(|e| {
                if custom {
                    e.custom_products.get(name)
                } else {
                    e.products.get(name)
                }
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EntryStore {
        EntryStore::new(Arc::new(Catalog::bundled("extended").unwrap()))
    }

    #[test]
    fn test_starts_with_one_empty_entry() {
        let store = store();
        assert_eq!(store.len(), 1);
        assert_eq!(store.entry(0), Some(&RepresentativeEntry::new()));
    }

    #[test]
    fn test_select_category_is_idempotent() {
        let mut once = store();
        once.select_category(0, "CBU");

        let mut twice = store();
        twice.select_category(0, "CBU");
        twice.select_category(0, "CBU");

        assert_eq!(once.entry(0), twice.entry(0));
        assert_eq!(twice.entry(0).unwrap().selected_categories, vec!["CBU"]);
        assert_eq!(twice.entry(0).unwrap().products.len(), 6);
    }

    #[test]
    fn test_select_category_preserves_existing_counts() {
        let mut store = store();
        store.set_product_quantity(0, "ACC", 4);
        store.select_category(0, "None");
        let entry = store.entry(0).unwrap();
        assert_eq!(entry.products.get("ACC"), Some(4));
        assert_eq!(entry.products.get("DP"), Some(0));
    }

    #[test]
    fn test_products_never_duplicate() {
        let mut store = store();
        store.select_category(0, "SMB");
        store.set_product_quantity(0, "SMB TERM", 2);
        store.set_product_quantity(0, "SMB TERM", 7);
        let entry = store.entry(0).unwrap();
        assert_eq!(entry.products.iter().filter(|(n, _)| *n == "SMB TERM").count(), 1);
        assert_eq!(entry.products.get("SMB TERM"), Some(7));
    }

    #[test]
    fn test_decrement_clamps_at_zero() {
        let mut store = store();
        store.set_product_quantity(0, "CBU HUP", 2);
        for _ in 0..5 {
            store.decrement_product(0, "CBU HUP");
        }
        assert_eq!(store.entry(0).unwrap().products.get("CBU HUP"), Some(0));

        store.decrement_custom_product(0, "GIFT CARD");
        assert_eq!(store.entry(0).unwrap().custom_products.get("GIFT CARD"), Some(0));
    }

    #[test]
    fn test_increment_from_missing_starts_at_one() {
        let mut store = store();
        store.increment_product(0, "CBU TERM");
        store.increment_product(0, "CBU TERM");
        store.increment_custom_product(0, "SIM");
        let entry = store.entry(0).unwrap();
        assert_eq!(entry.products.get("CBU TERM"), Some(2));
        assert_eq!(entry.custom_products.get("SIM"), Some(1));
    }

    #[test]
    fn test_set_rep_code_clears_entry_state() {
        let mut store = store();
        store.set_rep_code(0, "AA8");
        store.select_category(0, "None");
        store.set_product_quantity(0, "ACC", 3);
        store.set_custom_product_quantity(0, "SIM", 1);
        store.set_acc_profit(0, "50");

        store.set_rep_code(0, "DN");
        let entry = store.entry(0).unwrap();
        assert_eq!(entry.rep_code, "DN");
        assert!(entry.products.is_empty());
        assert!(entry.custom_products.is_empty());
        assert!(entry.selected_categories.is_empty());
        assert!(entry.acc_profit.is_empty());
    }

    #[test]
    fn test_other_switches_to_free_text() {
        let mut store = store();
        store.set_rep_code(0, "AA8");
        store.select_category(0, "CBU");
        store.set_rep_code(0, OTHER_REP_CODE);
        assert_eq!(store.entry(0).unwrap().rep_code, "");
        assert!(store.entry(0).unwrap().products.is_empty());

        store.set_free_text_rep_code(0, "zq9");
        assert_eq!(store.entry(0).unwrap().rep_code, "ZQ9");
    }

    #[test]
    fn test_free_text_keeps_sales() {
        let mut store = store();
        store.set_rep_code(0, OTHER_REP_CODE);
        store.set_product_quantity(0, "DP", 1);
        store.set_free_text_rep_code(0, "x");
        store.set_free_text_rep_code(0, "xy");
        let entry = store.entry(0).unwrap();
        assert_eq!(entry.rep_code, "XY");
        assert_eq!(entry.products.get("DP"), Some(1));
    }

    #[test]
    fn test_empty_custom_name_is_a_key() {
        let mut store = store();
        store.set_custom_product_quantity(0, "", 2);
        assert_eq!(store.entry(0).unwrap().custom_products.get(""), Some(2));
    }

    #[test]
    fn test_add_custom_product_keeps_count() {
        let mut store = store();
        store.set_custom_product_quantity(0, "SIM", 3);
        store.add_custom_product(0, "SIM");
        store.add_custom_product(0, "CASE");
        let entry = store.entry(0).unwrap();
        assert_eq!(entry.custom_products.get("SIM"), Some(3));
        assert_eq!(entry.custom_products.get("CASE"), Some(0));
    }

    #[test]
    fn test_acc_profit_stored_verbatim() {
        let mut store = store();
        store.set_acc_profit(0, "about 40-ish");
        assert_eq!(store.entry(0).unwrap().acc_profit, "about 40-ish");
    }

    #[test]
    fn test_reset_all_after_mutations() {
        let mut store = store();
        store.add_entry();
        store.add_entry();
        store.set_rep_code(1, "YK");
        store.select_category(2, "FIDO");
        store.set_product_quantity(2, "FIDO TERM", 1);
        assert_eq!(store.len(), 3);

        store.reset_all();
        assert_eq!(store.len(), 1);
        assert_eq!(store.entry(0), Some(&RepresentativeEntry::new()));
    }

    #[test]
    fn test_snapshot_does_not_see_later_mutations() {
        let mut store = store();
        store.add_entry();
        store.set_rep_code(0, "AA8");
        let before = store.snapshot();

        store.set_product_quantity(0, "CBU TERM", 9);
        store.add_entry();

        assert_eq!(before.len(), 2);
        assert!(before.get(0).unwrap().products.is_empty());
        assert_eq!(store.entry(0).unwrap().products.get("CBU TERM"), Some(9));
    }

    #[test]
    fn test_mutation_shares_untouched_entries() {
        let mut store = store();
        store.add_entry();
        let before = store.snapshot();
        store.set_rep_code(1, "HK4");
        assert!(Arc::ptr_eq(&before.entries[0], &store.entries[0]));
        assert!(!Arc::ptr_eq(&before.entries[1], &store.entries[1]));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_bad_index_asserts_in_debug() {
        let mut store = store();
        store.set_product_quantity(3, "DP", 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unknown category")]
    fn test_unknown_category_asserts_in_debug() {
        let mut store = store();
        store.select_category(0, "NOPE");
    }
}
