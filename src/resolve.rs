//! Resolution of borrowed copies to logical item labels
//!
//! Association mining runs over logical labels, not physical copy ids. The
//! chain is copy → work → title (or work → category → category name), each
//! step a plain map lookup. Borrow rows whose chain breaks at any step are
//! dropped.

use crate::dataset::{BookItem, BookMaster, BorrowDetail, Category};
use clap::ValueEnum;
use std::collections::HashMap;

/// Label universe for association mining
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ItemKind {
    /// Book titles
    Titles,
    /// Category names
    Categories,
}

/// Lookup tables from the catalog files
#[derive(Debug)]
pub struct ItemCatalog {
    item_to_master: HashMap<String, String>,
    master_to_title: HashMap<String, String>,
    master_to_category: HashMap<String, String>,
    category_names: HashMap<String, String>,
}

impl ItemCatalog {
    pub fn new(items: &[BookItem], masters: &[BookMaster], categories: &[Category]) -> Self {
        ItemCatalog {
            item_to_master: items
                .iter()
                .map(|item| (item.id.clone(), item.master_id.clone()))
                .collect(),
            master_to_title: masters
                .iter()
                .map(|master| (master.id.clone(), master.title.clone()))
                .collect(),
            master_to_category: masters
                .iter()
                .map(|master| (master.id.clone(), master.category_id.clone()))
                .collect(),
            category_names: categories
                .iter()
                .map(|category| (category.id.clone(), category.name.clone()))
                .collect(),
        }
    }

    /// Resolve a physical copy id to its label, or None if any link is missing
    pub fn resolve(&self, item_id: &str, kind: ItemKind) -> Option<&str> {
        let master_id = self.item_to_master.get(item_id)?;
        match kind {
            ItemKind::Titles => self.master_to_title.get(master_id).map(String::as_str),
            ItemKind::Categories => self
                .master_to_category
                .get(master_id)
                .and_then(|category_id| self.category_names.get(category_id))
                .map(String::as_str),
        }
    }
}

/// Resolve borrow details to (transaction id, item label) pairs.
///
/// Duplicate pairs are preserved here; the transaction extractor collapses
/// them.
pub fn resolve_items(
    details: &[BorrowDetail],
    catalog: &ItemCatalog,
    kind: ItemKind,
) -> Vec<(String, String)> {
    details
        .iter()
        .filter_map(|detail| {
            catalog
                .resolve(&detail.book_item_id, kind)
                .map(|label| (detail.borrow_id.clone(), label.to_string()))
        })
        .collect()
}
