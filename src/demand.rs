//! Shelf-category classification by title age and borrow demand

use crate::dataset::{BookItem, BookMaster, BorrowDetail};
use crate::report::writer_with_header;
use anyhow::Context;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

pub const BOOK_ANALYSIS_FILE: &str = "book_analysis.csv";

/// Books published in the last 3 years count as new
pub const NEW_BOOK_THRESHOLD_YEARS: i32 = 3;

/// Borrow-demand tier from the count distribution percentiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
    Low,
    Average,
    High,
}

/// Collection-management category of a work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShelfCategory {
    Hot,
    Flop,
    Evergreen,
    DeadStock,
    Average,
}

impl ShelfCategory {
    pub fn label(self) -> &'static str {
        match self {
            ShelfCategory::Hot => "HOT",
            ShelfCategory::Flop => "FLOP",
            ShelfCategory::Evergreen => "EVERGREEN",
            ShelfCategory::DeadStock => "DEAD STOCK",
            ShelfCategory::Average => "AVERAGE",
        }
    }
}

impl fmt::Display for ShelfCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Total classification over publication age and demand tier
pub fn classify(is_new: bool, demand: Demand) -> ShelfCategory {
    match (demand, is_new) {
        (Demand::Average, _) => ShelfCategory::Average,
        (Demand::High, true) => ShelfCategory::Hot,
        (Demand::Low, true) => ShelfCategory::Flop,
        (Demand::High, false) => ShelfCategory::Evergreen,
        (Demand::Low, false) => ShelfCategory::DeadStock,
    }
}

/// Percentile with linear interpolation between closest ranks.
/// `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// One work with its demand classification
#[derive(Debug, Clone)]
pub struct BookDemand {
    pub master_id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub borrow_count: usize,
    pub is_new: bool,
    pub demand: Demand,
    pub category: ShelfCategory,
}

/// Demand analysis over the whole catalog
#[derive(Debug)]
pub struct DemandAnalysis {
    pub q33: f64,
    pub q66: f64,
    pub books: Vec<BookDemand>,
}

impl DemandAnalysis {
    /// Category label → number of works, for the console summary
    pub fn distribution(&self) -> Vec<(&'static str, usize)> {
        let mut counts: HashMap<ShelfCategory, usize> = HashMap::new();
        for book in &self.books {
            *counts.entry(book.category).or_insert(0) += 1;
        }
        let mut distribution: Vec<(&'static str, usize)> = counts
            .into_iter()
            .map(|(category, count)| (category.label(), count))
            .collect();
        distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        distribution
    }
}

/// Classify every catalogued work by age and borrow demand.
///
/// Works that were never borrowed count as zero, and the percentile
/// thresholds run over the full catalog. Returns None when the catalog is
/// empty.
pub fn analyze_demand(
    masters: &[BookMaster],
    items: &[BookItem],
    details: &[BorrowDetail],
    reference_year: i32,
) -> Option<DemandAnalysis> {
    if masters.is_empty() {
        return None;
    }

    let item_to_master: HashMap<&str, &str> = items
        .iter()
        .map(|item| (item.id.as_str(), item.master_id.as_str()))
        .collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for detail in details {
        if let Some(&master_id) = item_to_master.get(detail.book_item_id.as_str()) {
            *counts.entry(master_id).or_insert(0) += 1;
        }
    }

    let mut sorted_counts: Vec<f64> = masters
        .iter()
        .map(|master| *counts.get(master.id.as_str()).unwrap_or(&0) as f64)
        .collect();
    sorted_counts.sort_by(f64::total_cmp);
    let q33 = quantile(&sorted_counts, 0.33);
    let q66 = quantile(&sorted_counts, 0.66);

    let new_cutoff = reference_year - NEW_BOOK_THRESHOLD_YEARS + 1;
    let books = masters
        .iter()
        .map(|master| {
            let borrow_count = *counts.get(master.id.as_str()).unwrap_or(&0);
            let demand = if (borrow_count as f64) <= q33 {
                Demand::Low
            } else if (borrow_count as f64) > q66 {
                Demand::High
            } else {
                Demand::Average
            };
            let is_new = master.year >= new_cutoff;
            BookDemand {
                master_id: master.id.clone(),
                title: master.title.clone(),
                author: master.author.clone(),
                year: master.year,
                borrow_count,
                is_new,
                demand,
                category: classify(is_new, demand),
            }
        })
        .collect();

    Some(DemandAnalysis { q33, q66, books })
}

#[derive(Debug, Serialize)]
struct BookDemandRow<'a> {
    id: &'a str,
    title: &'a str,
    author: &'a str,
    year: i32,
    borrow_count: usize,
    category: &'static str,
}

pub fn write_demand_report(analysis: &DemandAnalysis, path: &Path) -> crate::Result<()> {
    let mut writer = writer_with_header(
        path,
        &["id", "title", "author", "year", "borrow_count", "category"],
    )?;
    for book in &analysis.books {
        writer
            .serialize(BookDemandRow {
                id: &book.master_id,
                title: &book.title,
                author: &book.author,
                year: book.year,
                borrow_count: book.borrow_count,
                category: book.category.label(),
            })
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
