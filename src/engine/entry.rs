use crate::catalog::Catalog;

/// Product name whose positive count unlocks the profit field.
pub const ACC_PRODUCT: &str = "ACC";

/// Product name -> quantity, unique keys, kept in insertion order so the
/// summary lists products the way they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductTally {
    items: Vec<(String, u32)>,
}

impl ProductTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, qty)| *qty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|(n, _)| n == name)
    }

    /// Overwrites an existing quantity or appends a new key.
    pub fn upsert(&mut self, name: &str, quantity: u32) {
        match self.items.iter_mut().find(|(n, _)| n == name) {
            Some((_, qty)) => *qty = quantity,
            None => self.items.push((name.to_string(), quantity)),
        }
    }

    /// Appends `name` at `quantity` unless it is already tracked.
    pub fn insert_if_absent(&mut self, name: &str, quantity: u32) -> bool {
        if self.contains(name) {
            return false;
        }
        self.items.push((name.to_string(), quantity));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(n, qty)| (n.as_str(), *qty))
    }

    pub fn positive(&self) -> impl Iterator<Item = (&str, u32)> {
        self.iter().filter(|(_, qty)| *qty > 0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One representative's record for the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepresentativeEntry {
    pub rep_code: String,
    pub selected_categories: Vec<String>,
    pub products: ProductTally,
    pub custom_products: ProductTally,
    /// Raw profit text for ACC sales; empty means unset.
    pub acc_profit: String,
}

impl RepresentativeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything tied to the previous rep code.
    pub(crate) fn clear_sales(&mut self) {
        self.selected_categories.clear();
        self.products = ProductTally::new();
        self.custom_products = ProductTally::new();
        self.acc_profit.clear();
    }

    pub fn is_category_selected(&self, tag: &str) -> bool {
        self.selected_categories.iter().any(|t| t == tag)
    }

    pub fn has_sales(&self) -> bool {
        self.products.positive().next().is_some() || self.custom_products.positive().next().is_some()
    }

    /// The profit field is only meaningful while ACC has a positive count.
    pub fn acc_profit_visible(&self) -> bool {
        self.products.get(ACC_PRODUCT).unwrap_or(0) > 0
            || self.custom_products.get(ACC_PRODUCT).unwrap_or(0) > 0
    }

    /// Whether any selected category lets the rep type their own products.
    pub fn accepts_custom_products(&self, catalog: &Catalog) -> bool {
        self.selected_categories
            .iter()
            .filter_map(|tag| catalog.category(tag))
            .any(|c| c.allows_custom)
    }

    /// Products tracked on this entry that belong to `tag`, in entry order.
    pub fn products_in_category<'a>(
        &'a self,
        catalog: &'a Catalog,
        tag: &str,
    ) -> Vec<(&'a str, u32)> {
        let Some(category) = catalog.category(tag) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|(name, _)| category.contains(name))
            .collect()
    }
}
