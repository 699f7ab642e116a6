//! Restock and replacement recommendations
//!
//! Combines borrow demand with copy condition into a weighted score.
//! Replacing worn copies of in-demand books outranks buying extra copies,
//! so the condition weights dominate the per-borrow weight.

use crate::dataset::{BookItem, Condition};
use crate::popularity::BookBorrowCount;
use crate::report::writer_with_header;
use anyhow::Context;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

pub const RECOMMENDATIONS_FILE: &str = "dss_recommendations.csv";

pub const WEIGHT_BORROW_COUNT: f64 = 1.0;
pub const WEIGHT_POOR_COPY: f64 = 10.0;
pub const WEIGHT_FAIR_COPY: f64 = 2.0;

/// Borrow count above which a title is high demand
pub const HIGH_DEMAND_BORROWS: usize = 10;
/// Borrow count and copy count bounding the low-stock case
pub const LOW_STOCK_BORROWS: usize = 5;
pub const LOW_STOCK_COPIES: usize = 3;

/// One actionable recommendation for a borrowed work
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub master_id: String,
    pub title: String,
    pub author: String,
    pub borrow_count: usize,
    pub total_copies: usize,
    pub poor_copies: usize,
    pub fair_copies: usize,
    pub score: f64,
    pub action: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct InventoryTally {
    total: usize,
    poor: usize,
    fair: usize,
}

fn tally_inventory(items: &[BookItem]) -> HashMap<&str, InventoryTally> {
    let mut tallies: HashMap<&str, InventoryTally> = HashMap::new();
    for item in items {
        let tally = tallies.entry(item.master_id.as_str()).or_default();
        tally.total += 1;
        match item.condition {
            Condition::Poor => tally.poor += 1,
            Condition::Fair => tally.fair += 1,
            Condition::New | Condition::Good => {}
        }
    }
    tallies
}

fn score_for(borrow_count: usize, tally: InventoryTally) -> f64 {
    borrow_count as f64 * WEIGHT_BORROW_COUNT
        + tally.poor as f64 * WEIGHT_POOR_COPY
        + tally.fair as f64 * WEIGHT_FAIR_COPY
}

fn action_for(borrow_count: usize, tally: InventoryTally) -> String {
    let mut actions = Vec::new();

    if tally.poor > 0 {
        let noun = if tally.poor == 1 { "copy" } else { "copies" };
        actions.push(format!("Replace {} Poor {}", tally.poor, noun));
    }

    if borrow_count > HIGH_DEMAND_BORROWS {
        actions.push("Buy more copies (High Demand)".to_string());
    } else if borrow_count > LOW_STOCK_BORROWS && tally.total < LOW_STOCK_COPIES {
        actions.push("Buy more copies (Low Stock)".to_string());
    }

    if actions.is_empty() {
        "No Action Needed".to_string()
    } else {
        actions.join(", ")
    }
}

/// Score every ranked book against its inventory condition.
///
/// Only books with a positive score are returned, highest first. Books in
/// the ranking without inventory records score on borrow count alone.
pub fn recommend(ranking: &[BookBorrowCount], items: &[BookItem]) -> Vec<Recommendation> {
    let tallies = tally_inventory(items);

    let mut recommendations: Vec<Recommendation> = ranking
        .iter()
        .filter_map(|book| {
            let tally = tallies
                .get(book.master_id.as_str())
                .copied()
                .unwrap_or_default();
            let score = score_for(book.borrow_count, tally);
            (score > 0.0).then(|| Recommendation {
                master_id: book.master_id.clone(),
                title: book.title.clone(),
                author: book.author.clone(),
                borrow_count: book.borrow_count,
                total_copies: tally.total,
                poor_copies: tally.poor,
                fair_copies: tally.fair,
                score,
                action: action_for(book.borrow_count, tally),
            })
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.master_id.cmp(&b.master_id))
    });
    recommendations
}

#[derive(Debug, Serialize)]
struct RecommendationRow<'a> {
    master_id: &'a str,
    title: &'a str,
    author: &'a str,
    borrow_count: usize,
    total_copies: usize,
    poor_copies: usize,
    fair_copies: usize,
    recommendation_score: f64,
    recommended_action: &'a str,
}

pub fn write_recommendation_report(
    recommendations: &[Recommendation],
    path: &Path,
) -> crate::Result<()> {
    let mut writer = writer_with_header(
        path,
        &[
            "masterId",
            "title",
            "author",
            "borrow_count",
            "total_copies",
            "poor_copies",
            "fair_copies",
            "recommendation_score",
            "recommended_action",
        ],
    )?;
    for recommendation in recommendations {
        writer
            .serialize(RecommendationRow {
                master_id: &recommendation.master_id,
                title: &recommendation.title,
                author: &recommendation.author,
                borrow_count: recommendation.borrow_count,
                total_copies: recommendation.total_copies,
                poor_copies: recommendation.poor_copies,
                fair_copies: recommendation.fair_copies,
                recommendation_score: recommendation.score,
                recommended_action: &recommendation.action,
            })
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(master_id: &str, borrow_count: usize) -> BookBorrowCount {
        BookBorrowCount {
            master_id: master_id.into(),
            title: format!("Title {master_id}"),
            author: "Author A. Smith".into(),
            borrow_count,
        }
    }

    fn item(master_id: &str, condition: Condition) -> BookItem {
        BookItem {
            id: format!("BI-{master_id}-{condition:?}"),
            master_id: master_id.into(),
            condition,
        }
    }

    #[test]
    fn test_score_weights() {
        let ranking = vec![book("BM-1", 4)];
        let items = vec![
            item("BM-1", Condition::Poor),
            item("BM-1", Condition::Fair),
            item("BM-1", Condition::Good),
        ];

        let recommendations = recommend(&ranking, &items);
        // 4*1.0 + 1*10.0 + 1*2.0
        assert_eq!(recommendations[0].score, 16.0);
        assert_eq!(recommendations[0].total_copies, 3);
        assert_eq!(recommendations[0].poor_copies, 1);
        assert_eq!(recommendations[0].fair_copies, 1);
    }

    #[test]
    fn test_replace_action_singular_and_plural() {
        let ranking = vec![book("BM-1", 1), book("BM-2", 1)];
        let items = vec![
            item("BM-1", Condition::Poor),
            BookItem {
                id: "BI-X".into(),
                master_id: "BM-2".into(),
                condition: Condition::Poor,
            },
            BookItem {
                id: "BI-Y".into(),
                master_id: "BM-2".into(),
                condition: Condition::Poor,
            },
        ];

        let recommendations = recommend(&ranking, &items);
        let one = recommendations.iter().find(|r| r.master_id == "BM-1").unwrap();
        let two = recommendations.iter().find(|r| r.master_id == "BM-2").unwrap();
        assert_eq!(one.action, "Replace 1 Poor copy");
        assert_eq!(two.action, "Replace 2 Poor copies");
    }

    #[test]
    fn test_high_demand_action_wins_over_low_stock() {
        let ranking = vec![book("BM-1", 11)];
        let items = vec![item("BM-1", Condition::Good)];

        let recommendations = recommend(&ranking, &items);
        assert_eq!(recommendations[0].action, "Buy more copies (High Demand)");
    }

    #[test]
    fn test_low_stock_action_requires_both_bounds() {
        let well_stocked = vec![
            item("BM-1", Condition::Good),
            item("BM-1", Condition::Good),
            item("BM-1", Condition::Good),
        ];
        // 6 borrows but 3 copies: not low stock
        let recommendations = recommend(&[book("BM-1", 6)], &well_stocked);
        assert_eq!(recommendations[0].action, "No Action Needed");

        // 6 borrows, 1 copy: low stock
        let scarce = vec![item("BM-1", Condition::Good)];
        let recommendations = recommend(&[book("BM-1", 6)], &scarce);
        assert_eq!(recommendations[0].action, "Buy more copies (Low Stock)");
    }

    #[test]
    fn test_combined_actions_join() {
        let ranking = vec![book("BM-1", 12)];
        let items = vec![item("BM-1", Condition::Poor)];

        let recommendations = recommend(&ranking, &items);
        assert_eq!(
            recommendations[0].action,
            "Replace 1 Poor copy, Buy more copies (High Demand)"
        );
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let ranking = vec![book("BM-1", 2), book("BM-2", 1)];
        let items = vec![item("BM-2", Condition::Poor)];

        let recommendations = recommend(&ranking, &items);
        assert_eq!(recommendations[0].master_id, "BM-2"); // 11.0
        assert_eq!(recommendations[1].master_id, "BM-1"); // 2.0
    }
}
