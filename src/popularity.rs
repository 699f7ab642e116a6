//! Borrow-count ranking of catalogued works

use crate::dataset::{BookItem, BookMaster, BorrowDetail};
use crate::report::writer_with_header;
use anyhow::Context;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

pub const TOP_BOOKS_FILE: &str = "top_books.csv";

/// One work with its total borrow count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookBorrowCount {
    #[serde(rename = "masterId")]
    pub master_id: String,
    pub title: String,
    pub author: String,
    pub borrow_count: usize,
}

/// Count borrows per work, most-borrowed first.
///
/// Counting runs over borrow details resolved copy → work; rows whose copy
/// or work record is missing are dropped. Works that were never borrowed do
/// not appear.
pub fn rank_books(
    details: &[BorrowDetail],
    items: &[BookItem],
    masters: &[BookMaster],
) -> Vec<BookBorrowCount> {
    let item_to_master: HashMap<&str, &str> = items
        .iter()
        .map(|item| (item.id.as_str(), item.master_id.as_str()))
        .collect();
    let master_index: HashMap<&str, &BookMaster> = masters
        .iter()
        .map(|master| (master.id.as_str(), master))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for detail in details {
        if let Some(&master_id) = item_to_master.get(detail.book_item_id.as_str()) {
            if master_index.contains_key(master_id) {
                *counts.entry(master_id).or_insert(0) += 1;
            }
        }
    }

    let mut ranking: Vec<BookBorrowCount> = counts
        .into_iter()
        .map(|(master_id, borrow_count)| {
            let master = master_index[master_id];
            BookBorrowCount {
                master_id: master.id.clone(),
                title: master.title.clone(),
                author: master.author.clone(),
                borrow_count,
            }
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.borrow_count
            .cmp(&a.borrow_count)
            .then_with(|| a.master_id.cmp(&b.master_id))
    });
    ranking
}

pub fn write_popularity_report(ranking: &[BookBorrowCount], path: &Path) -> crate::Result<()> {
    let mut writer = writer_with_header(path, &["masterId", "title", "author", "borrow_count"])?;
    for book in ranking {
        writer
            .serialize(book)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
