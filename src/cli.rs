//! Command-line interface definitions and argument parsing

use crate::mining::DEFAULT_MIN_SUPPORT;
use crate::resolve::ItemKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Library lending analytics CLI using association rule mining
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the library dataset CSV files
    #[arg(short, long, default_value = "dataset")]
    pub data_dir: PathBuf,

    /// Directory where report CSV files are written
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mine frequent itemsets and association rules from borrow transactions
    Associations {
        /// Item universe to mine over: book titles or category names
        #[arg(long, value_enum, default_value_t = ItemKind::Titles)]
        items: ItemKind,

        /// Minimum support threshold for frequent itemsets
        #[arg(long, default_value_t = DEFAULT_MIN_SUPPORT)]
        min_support: f64,

        /// Minimum number of distinct items per transaction
        /// (defaults to 1 for titles, 2 for categories)
        #[arg(long)]
        min_items: Option<usize>,
    },

    /// Rank books by how often they have been borrowed
    Popularity {
        /// Number of top books to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Classify books into shelf categories by age and borrow demand
    Demand {
        /// Reference year for the new-book cutoff (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Produce restock and replacement recommendations
    Recommend {
        /// Number of top recommendations to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Rank students by overdue returns
    Overdue {
        /// Number of students to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

impl Command {
    /// Effective minimum transaction size for association mining.
    ///
    /// Title mining keeps single-item transactions (they still contribute to
    /// 1-itemset supports); category mining only makes sense across 2+
    /// distinct categories.
    pub fn effective_min_items(items: ItemKind, min_items: Option<usize>) -> usize {
        min_items.unwrap_or(match items {
            ItemKind::Titles => 1,
            ItemKind::Categories => 2,
        })
    }
}
