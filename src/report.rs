//! CSV report emission for frequent itemsets and association rules

use crate::mining::MiningResult;
use crate::rules::Rule;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

/// Delimiter between items of a multi-item set in report labels
pub const ITEM_SEPARATOR: &str = " | ";

pub const FREQUENT_ITEMSETS_FILE: &str = "frequent_itemsets.csv";
pub const ASSOCIATION_RULES_FILE: &str = "association_rules.csv";

/// Canonical display label for an itemset
pub fn itemset_label(items: &[String]) -> String {
    items.join(ITEM_SEPARATOR)
}

/// Metric values are kept unrounded internally; reports carry 4 decimals
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[derive(Debug, Serialize)]
struct ItemsetRow {
    itemset: String,
    itemset_size: usize,
    count: usize,
    support: f64,
}

const ITEMSET_HEADER: [&str; 4] = ["Itemset", "Itemset_Size", "Count", "Support"];

#[derive(Debug, Serialize)]
struct RuleRow {
    antecedent: String,
    consequent: String,
    support: f64,
    confidence: f64,
    lift: f64,
    count: usize,
}

const RULE_HEADER: [&str; 6] = [
    "Antecedent",
    "Consequent",
    "Support",
    "Confidence",
    "Lift",
    "Count",
];

pub(crate) fn writer_with_header(
    path: &Path,
    header: &[&str],
) -> crate::Result<csv::Writer<std::fs::File>> {
    // Header written explicitly so empty reports still carry one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer
        .write_record(header)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(writer)
}

/// Write the union of the three frequent tables, sorted by size ascending
/// then support descending (label as deterministic tiebreak).
pub fn write_itemset_report(mined: &MiningResult, path: &Path) -> crate::Result<()> {
    let mut rows = Vec::new();
    for (size, table) in [(1, &mined.singles), (2, &mined.pairs), (3, &mined.triples)] {
        for (itemset, stat) in &table.entries {
            rows.push(ItemsetRow {
                itemset: itemset_label(itemset),
                itemset_size: size,
                count: stat.count,
                support: stat.support,
            });
        }
    }
    rows.sort_by(|a, b| {
        a.itemset_size
            .cmp(&b.itemset_size)
            .then(b.support.total_cmp(&a.support))
            .then_with(|| a.itemset.cmp(&b.itemset))
    });

    let mut writer = writer_with_header(path, &ITEMSET_HEADER)?;
    for mut row in rows {
        row.support = round4(row.support);
        writer
            .serialize(row)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write the rule sequence in the generator's order
pub fn write_rule_report(rules: &[Rule], path: &Path) -> crate::Result<()> {
    let mut writer = writer_with_header(path, &RULE_HEADER)?;
    for rule in rules {
        writer
            .serialize(RuleRow {
                antecedent: itemset_label(&rule.antecedent),
                consequent: rule.consequent.clone(),
                support: round4(rule.support),
                confidence: round4(rule.confidence),
                lift: round4(rule.lift),
                count: rule.count,
            })
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
