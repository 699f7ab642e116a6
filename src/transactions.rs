//! Grouping resolved borrow rows into mining transactions

use std::collections::{BTreeSet, HashMap};

/// One borrow transaction reduced to its distinct item labels.
///
/// Items are sorted and duplicate-free, so combinations generated from them
/// are canonical without further sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub items: Vec<String>,
}

/// Group (transaction id, item label) pairs into transactions.
///
/// Duplicate labels within one transaction collapse to a single entry (two
/// copies of the same title count once). Transactions with fewer than
/// `min_items` distinct labels are discarded. Output order is arbitrary;
/// callers must not depend on it.
pub fn build_transactions(
    pairs: impl IntoIterator<Item = (String, String)>,
    min_items: usize,
) -> Vec<Transaction> {
    let mut grouped: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (id, label) in pairs {
        grouped.entry(id).or_default().insert(label);
    }

    grouped
        .into_iter()
        .filter(|(_, items)| items.len() >= min_items)
        .map(|(id, items)| Transaction {
            id,
            items: items.into_iter().collect(),
        })
        .collect()
}
