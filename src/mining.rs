//! Frequent-itemset mining over borrow transactions
//!
//! Three sequential counting passes produce frequent 1-, 2-, and
//! 3-itemsets. Larger itemsets are out of scope: three distinct works in
//! one checkout is already the practical ceiling for library baskets.

use crate::transactions::Transaction;
use std::collections::{HashMap, HashSet};

/// Default minimum support threshold (0.01%)
pub const DEFAULT_MIN_SUPPORT: f64 = 0.0001;

/// Occurrence statistics for one itemset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemsetStat {
    /// Number of transactions containing every item of the set
    pub count: usize,
    /// count / total_transactions
    pub support: f64,
}

/// Frequent itemsets of one size, keyed by the canonical sorted item list
#[derive(Debug, Default, PartialEq)]
pub struct FrequentItemsets {
    pub entries: HashMap<Vec<String>, ItemsetStat>,
}

impl FrequentItemsets {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Support of a canonical itemset, if frequent
    pub fn support(&self, itemset: &[String]) -> Option<f64> {
        self.entries.get(itemset).map(|stat| stat.support)
    }

    fn from_counts(
        counts: HashMap<Vec<String>, usize>,
        total_transactions: usize,
        min_support: f64,
    ) -> Self {
        let entries = counts
            .into_iter()
            .filter_map(|(itemset, count)| {
                let support = count as f64 / total_transactions as f64;
                // Inclusive: an itemset sitting exactly on the threshold is kept
                (support >= min_support).then_some((itemset, ItemsetStat { count, support }))
            })
            .collect();
        FrequentItemsets { entries }
    }
}

/// Result of one mining run over a transaction collection
#[derive(Debug)]
pub struct MiningResult {
    pub total_transactions: usize,
    pub singles: FrequentItemsets,
    pub pairs: FrequentItemsets,
    pub triples: FrequentItemsets,
}

impl MiningResult {
    /// True when nothing met the support threshold at any size
    pub fn is_empty(&self) -> bool {
        self.singles.is_empty() && self.pairs.is_empty() && self.triples.is_empty()
    }

    fn empty(total_transactions: usize) -> Self {
        MiningResult {
            total_transactions,
            singles: FrequentItemsets::default(),
            pairs: FrequentItemsets::default(),
            triples: FrequentItemsets::default(),
        }
    }
}

/// Mine frequent 1-, 2-, and 3-itemsets from a transaction collection.
///
/// # Arguments
/// * `transactions` - Deduplicated, sorted transactions from the extractor
/// * `min_support` - Minimum fraction of transactions an itemset must
///   appear in (inclusive)
///
/// # Returns
/// * `MiningResult` with the three frequent tables; all empty when no
///   transactions were supplied or nothing met the threshold
pub fn mine(transactions: &[Transaction], min_support: f64) -> MiningResult {
    let total = transactions.len();
    if total == 0 {
        return MiningResult::empty(0);
    }

    // Pass 1: single items. A transaction contributes at most once per item
    // since its item list is duplicate-free.
    let mut single_counts: HashMap<&str, usize> = HashMap::new();
    for transaction in transactions {
        for item in &transaction.items {
            *single_counts.entry(item.as_str()).or_insert(0) += 1;
        }
    }
    let singles = FrequentItemsets::from_counts(
        single_counts
            .into_iter()
            .map(|(item, count)| (vec![item.to_string()], count))
            .collect(),
        total,
        min_support,
    );

    let frequent_singles: HashSet<&str> = singles
        .entries
        .keys()
        .map(|itemset| itemset[0].as_str())
        .collect();

    // Pass 2: pairs drawn from each transaction's frequent items only; an
    // infrequent single cannot be part of a frequent pair. Items are already
    // sorted, so every generated pair is canonical.
    let mut pair_counts: HashMap<Vec<String>, usize> = HashMap::new();
    for transaction in transactions {
        let frequent: Vec<&String> = transaction
            .items
            .iter()
            .filter(|item| frequent_singles.contains(item.as_str()))
            .collect();

        for i in 0..frequent.len() {
            for j in (i + 1)..frequent.len() {
                *pair_counts
                    .entry(vec![frequent[i].clone(), frequent[j].clone()])
                    .or_insert(0) += 1;
            }
        }
    }
    let pairs = FrequentItemsets::from_counts(pair_counts, total, min_support);

    // Pass 3: triplets, also drawn straight from the L1-filtered items.
    // Constituent pairs are deliberately not checked against the frequent
    // pair table.
    let mut triple_counts: HashMap<Vec<String>, usize> = HashMap::new();
    for transaction in transactions {
        let frequent: Vec<&String> = transaction
            .items
            .iter()
            .filter(|item| frequent_singles.contains(item.as_str()))
            .collect();
        if frequent.len() < 3 {
            continue;
        }

        for i in 0..frequent.len() {
            for j in (i + 1)..frequent.len() {
                for k in (j + 1)..frequent.len() {
                    *triple_counts
                        .entry(vec![
                            frequent[i].clone(),
                            frequent[j].clone(),
                            frequent[k].clone(),
                        ])
                        .or_insert(0) += 1;
                }
            }
        }
    }
    let triples = FrequentItemsets::from_counts(triple_counts, total, min_support);

    MiningResult {
        total_transactions: total,
        singles,
        pairs,
        triples,
    }
}
