//! LendMine: Library lending analytics CLI using association rule mining
//!
//! This is the main entrypoint that orchestrates data loading, mining,
//! and report writing for each analysis subcommand.

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use lendmine::cli::{Args, Command};
use lendmine::{
    build_transactions, dataset, demand, generate_rules, mine, overdue, popularity, recommend,
    report, resolve_items, ItemCatalog, ItemKind,
};
use std::time::Instant;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("LendMine - Library Lending Analytics");
        println!("====================================\n");
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;

    match &args.command {
        Command::Associations {
            items,
            min_support,
            min_items,
        } => run_associations(&args, *items, *min_support, *min_items),
        Command::Popularity { top } => run_popularity(&args, *top),
        Command::Demand { year } => run_demand(&args, *year),
        Command::Recommend { top } => run_recommend(&args, *top),
        Command::Overdue { top } => run_overdue(&args, *top),
    }
}

/// Run the association mining pipeline: extract, mine, derive rules, report
fn run_associations(
    args: &Args,
    items: ItemKind,
    min_support: f64,
    min_items: Option<usize>,
) -> Result<()> {
    println!("=== Association Mining ===\n");

    let start_time = Instant::now();
    let min_items = Command::effective_min_items(items, min_items);

    // Step 1: Load and resolve borrow records
    if args.verbose {
        println!("Step 1: Loading and resolving borrow records");
        println!("  Data directory: {}", args.data_dir.display());
    }

    let details = dataset::load_borrow_details(&args.data_dir)?;
    let book_items = dataset::load_items(&args.data_dir)?;
    let masters = dataset::load_masters(&args.data_dir)?;
    let categories = match items {
        ItemKind::Categories => dataset::load_categories(&args.data_dir)?,
        ItemKind::Titles => Vec::new(),
    };

    let catalog = ItemCatalog::new(&book_items, &masters, &categories);
    let pairs = resolve_items(&details, &catalog, items);
    let transactions = build_transactions(pairs, min_items);

    println!("✓ Transactions for analysis: {}", transactions.len());
    if transactions.is_empty() {
        println!("Not enough data for association analysis.");
        return Ok(());
    }

    // Step 2: Mine frequent itemsets
    if args.verbose {
        println!("\nStep 2: Mining frequent itemsets");
        println!("  Minimum support: {}", min_support);
        println!("  Minimum items per transaction: {}", min_items);
    }

    let mining_start = Instant::now();
    let mined = mine(&transactions, min_support);

    println!(
        "\n[Phase 1] Found {} frequent 1-itemsets (Min Support: {})",
        mined.singles.len(),
        min_support
    );
    println!(
        "[Phase 2] Found {} frequent 2-itemsets (Min Support: {})",
        mined.pairs.len(),
        min_support
    );
    println!(
        "[Phase 3] Found {} frequent 3-itemsets (Min Support: {})",
        mined.triples.len(),
        min_support
    );
    if args.verbose {
        println!("  Mining time: {:.2}s", mining_start.elapsed().as_secs_f64());
    }

    let itemsets_path = args.output_dir.join(report::FREQUENT_ITEMSETS_FILE);
    report::write_itemset_report(&mined, &itemsets_path)?;
    println!("\n✓ Frequent itemsets saved to: {}", itemsets_path.display());

    // Step 3: Derive association rules
    let rules = generate_rules(&mined);
    if rules.is_empty() {
        println!("No association rules found meeting the criteria.");
    } else {
        let rules_path = args.output_dir.join(report::ASSOCIATION_RULES_FILE);
        report::write_rule_report(&rules, &rules_path)?;
        println!("✓ Association rules saved to: {}", rules_path.display());

        println!("\nTop {} Association Rules:", rules.len().min(10));
        for rule in rules.iter().take(10) {
            println!(
                "  {} -> {} (conf {:.4}, lift {:.4})",
                report::itemset_label(&rule.antecedent),
                rule.consequent,
                rule.confidence,
                rule.lift
            );
        }
    }

    println!("\n=== Analysis Complete ===");
    println!(
        "Total processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Rank books by borrow count and report the top of the list
fn run_popularity(args: &Args, top: usize) -> Result<()> {
    println!("=== Book Popularity ===\n");

    let start_time = Instant::now();
    let details = dataset::load_borrow_details(&args.data_dir)?;
    let book_items = dataset::load_items(&args.data_dir)?;
    let masters = dataset::load_masters(&args.data_dir)?;

    let ranking = popularity::rank_books(&details, &book_items, &masters);
    println!("✓ Borrowed books: {}", ranking.len());
    if ranking.is_empty() {
        println!("Not enough data for popularity analysis.");
        return Ok(());
    }

    let path = args.output_dir.join(popularity::TOP_BOOKS_FILE);
    popularity::write_popularity_report(&ranking, &path)?;
    println!("✓ Top books saved to: {}", path.display());

    println!("\nTop {} Most Borrowed Books:", top.min(ranking.len()));
    for book in ranking.iter().take(top) {
        println!("  {:>4}  {} ({})", book.borrow_count, book.title, book.author);
    }

    println!(
        "\nTotal processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Classify the catalog into shelf categories and report the distribution
fn run_demand(args: &Args, year: Option<i32>) -> Result<()> {
    println!("=== Demand Classification ===\n");

    let start_time = Instant::now();
    let reference_year = year.unwrap_or_else(|| chrono::Local::now().year());
    if args.verbose {
        println!("Reference year: {}", reference_year);
    }

    let masters = dataset::load_masters(&args.data_dir)?;
    let book_items = dataset::load_items(&args.data_dir)?;
    let details = dataset::load_borrow_details(&args.data_dir)?;

    let Some(analysis) = demand::analyze_demand(&masters, &book_items, &details, reference_year)
    else {
        println!("Not enough data for demand classification.");
        return Ok(());
    };

    println!(
        "Borrow count thresholds: Low <= {:.2}, High > {:.2}",
        analysis.q33, analysis.q66
    );

    let path = args.output_dir.join(demand::BOOK_ANALYSIS_FILE);
    demand::write_demand_report(&analysis, &path)?;
    println!("✓ Book analysis saved to: {}", path.display());

    println!("\nCategory Distribution:");
    for (label, count) in analysis.distribution() {
        println!("  {:<11} {}", label, count);
    }

    println!(
        "\nTotal processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Score borrowed books for restock and replacement actions
fn run_recommend(args: &Args, top: usize) -> Result<()> {
    println!("=== Restock Recommendations ===\n");

    let start_time = Instant::now();
    let details = dataset::load_borrow_details(&args.data_dir)?;
    let book_items = dataset::load_items(&args.data_dir)?;
    let masters = dataset::load_masters(&args.data_dir)?;

    let ranking = popularity::rank_books(&details, &book_items, &masters);
    let recommendations = recommend::recommend(&ranking, &book_items);
    println!("✓ Books scored: {}", recommendations.len());
    if recommendations.is_empty() {
        println!("No recommendations: no borrow activity recorded.");
        return Ok(());
    }

    let path = args.output_dir.join(recommend::RECOMMENDATIONS_FILE);
    recommend::write_recommendation_report(&recommendations, &path)?;
    println!("✓ Recommendations saved to: {}", path.display());

    println!("\nTop {} Recommendations:", top.min(recommendations.len()));
    for recommendation in recommendations.iter().take(top) {
        println!(
            "  {:>7.1}  {} - {}",
            recommendation.score, recommendation.title, recommendation.action
        );
    }

    println!(
        "\nTotal processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Rank students by overdue returns
fn run_overdue(args: &Args, top: usize) -> Result<()> {
    println!("=== Late Returns ===\n");

    let start_time = Instant::now();
    let borrows = dataset::load_borrows(&args.data_dir)?;
    let returns = dataset::load_returns(&args.data_dir)?;
    let students = dataset::load_students(&args.data_dir)?;

    let counts = overdue::count_late_returns(&borrows, &returns, &students)?;
    println!("✓ Students with late returns: {}", counts.len());
    if counts.is_empty() {
        println!("No late returns found.");
        return Ok(());
    }

    let path = args.output_dir.join(overdue::LATE_RETURNS_FILE);
    overdue::write_late_return_report(&counts, &path)?;
    println!("✓ Late returns saved to: {}", path.display());

    println!("\nTop {} Students with Late Returns:", top.min(counts.len()));
    for count in counts.iter().take(top) {
        println!("  {:>4}  {} ({})", count.late_count, count.name, count.student_id);
    }

    println!(
        "\nTotal processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
