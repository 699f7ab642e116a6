//! LendMine: A Rust CLI application for library lending analytics
//!
//! This library mines borrow transactions for frequent itemsets and
//! association rules (over book titles or categories) and produces the
//! companion collection-management reports: popularity rankings, demand
//! classification, restock recommendations, and overdue counts.

pub mod cli;
pub mod dataset;
pub mod demand;
pub mod mining;
pub mod overdue;
pub mod popularity;
pub mod recommend;
pub mod report;
pub mod resolve;
pub mod rules;
pub mod transactions;

// Re-export public items for easier access
pub use cli::{Args, Command};
pub use mining::{mine, FrequentItemsets, ItemsetStat, MiningResult, DEFAULT_MIN_SUPPORT};
pub use resolve::{resolve_items, ItemCatalog, ItemKind};
pub use rules::{generate_rules, Rule};
pub use transactions::{build_transactions, Transaction};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
