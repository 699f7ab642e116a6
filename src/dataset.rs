//! Typed CSV loading for the library dataset
//!
//! Each analysis loads only the files it needs; a missing or malformed
//! file aborts the run with the offending path in the error.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

pub const BOOK_MASTERS_FILE: &str = "book_masters.csv";
pub const BOOK_ITEMS_FILE: &str = "book_items.csv";
pub const BORROW_TRANSACTIONS_FILE: &str = "borrow_transactions.csv";
pub const BORROW_DETAILS_FILE: &str = "borrow_details.csv";
pub const RETURN_TRANSACTIONS_FILE: &str = "return_transactions.csv";
/// The dataset ships this filename with the historical spelling.
pub const CATEGORIES_FILE: &str = "categorys.csv";
pub const STUDENTS_FILE: &str = "students.csv";

/// One catalogued work (a logical book, independent of physical copies)
#[derive(Debug, Clone, Deserialize)]
pub struct BookMaster {
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    #[serde(rename = "categoryId")]
    pub category_id: String,
}

/// Physical condition of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Condition {
    New,
    Good,
    Fair,
    Poor,
}

/// One physical copy of a work
#[derive(Debug, Clone, Deserialize)]
pub struct BookItem {
    pub id: String,
    #[serde(rename = "masterId")]
    pub master_id: String,
    pub condition: Condition,
}

/// One borrow transaction (a checkout visit, possibly spanning several copies)
#[derive(Debug, Clone, Deserialize)]
pub struct BorrowTransaction {
    pub id: String,
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

/// One borrowed copy within a borrow transaction
#[derive(Debug, Clone, Deserialize)]
pub struct BorrowDetail {
    #[serde(rename = "borrowId")]
    pub borrow_id: String,
    #[serde(rename = "bookItemId")]
    pub book_item_id: String,
}

/// One return transaction closing out a borrow
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnTransaction {
    #[serde(rename = "borrowId")]
    pub borrow_id: String,
    #[serde(rename = "returnedAt")]
    pub returned_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
}

fn read_records<T: DeserializeOwned>(dir: &Path, file_name: &str) -> crate::Result<Vec<T>> {
    let path = dir.join(file_name);
    let file =
        File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record.with_context(|| format!("malformed row in {}", path.display()))?);
    }
    Ok(records)
}

pub fn load_masters(dir: &Path) -> crate::Result<Vec<BookMaster>> {
    read_records(dir, BOOK_MASTERS_FILE)
}

pub fn load_items(dir: &Path) -> crate::Result<Vec<BookItem>> {
    read_records(dir, BOOK_ITEMS_FILE)
}

pub fn load_borrows(dir: &Path) -> crate::Result<Vec<BorrowTransaction>> {
    read_records(dir, BORROW_TRANSACTIONS_FILE)
}

pub fn load_borrow_details(dir: &Path) -> crate::Result<Vec<BorrowDetail>> {
    read_records(dir, BORROW_DETAILS_FILE)
}

pub fn load_returns(dir: &Path) -> crate::Result<Vec<ReturnTransaction>> {
    read_records(dir, RETURN_TRANSACTIONS_FILE)
}

pub fn load_categories(dir: &Path) -> crate::Result<Vec<Category>> {
    read_records(dir, CATEGORIES_FILE)
}

pub fn load_students(dir: &Path) -> crate::Result<Vec<Student>> {
    read_records(dir, STUDENTS_FILE)
}
