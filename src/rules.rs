//! Association rule generation from frequent itemsets

use crate::mining::MiningResult;

/// One directional association rule with a single-item consequent
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Canonical-sorted antecedent itemset (one or two items)
    pub antecedent: Vec<String>,
    pub consequent: String,
    /// Support of antecedent ∪ consequent
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    /// Transactions containing antecedent ∪ consequent
    pub count: usize,
}

/// Derive directional rules from the frequent pair and triplet tables.
///
/// Every frequent pair (A, B) yields A→B and B→A. Every frequent triplet
/// yields up to three pair→item rules; a rule whose antecedent pair is not
/// itself in the frequent pair table is skipped, since its support is
/// unknown and the metrics would be undefined.
///
/// Rules are ordered by descending lift, then descending confidence, then
/// antecedent and consequent so repeated runs emit identical reports.
pub fn generate_rules(mined: &MiningResult) -> Vec<Rule> {
    let mut rules = Vec::new();

    for (pair, stat) in &mined.pairs.entries {
        // Both members are frequent singles by construction of pass 2
        let (Some(support_a), Some(support_b)) = (
            mined.singles.support(&pair[0..1]),
            mined.singles.support(&pair[1..2]),
        ) else {
            continue;
        };

        // Lift is symmetric between the two directions
        let lift = stat.support / (support_a * support_b);

        rules.push(Rule {
            antecedent: vec![pair[0].clone()],
            consequent: pair[1].clone(),
            support: stat.support,
            confidence: stat.support / support_a,
            lift,
            count: stat.count,
        });
        rules.push(Rule {
            antecedent: vec![pair[1].clone()],
            consequent: pair[0].clone(),
            support: stat.support,
            confidence: stat.support / support_b,
            lift,
            count: stat.count,
        });
    }

    for (triple, stat) in &mined.triples.entries {
        for consequent_index in 0..triple.len() {
            let consequent = &triple[consequent_index];
            // Removing one item from a sorted triple leaves a sorted pair
            let antecedent: Vec<String> = triple
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != consequent_index)
                .map(|(_, item)| item.clone())
                .collect();

            let Some(antecedent_support) = mined.pairs.support(&antecedent) else {
                continue;
            };
            let Some(consequent_support) =
                mined.singles.support(std::slice::from_ref(consequent))
            else {
                continue;
            };

            rules.push(Rule {
                antecedent,
                consequent: consequent.clone(),
                support: stat.support,
                confidence: stat.support / antecedent_support,
                lift: stat.support / (antecedent_support * consequent_support),
                count: stat.count,
            });
        }
    }

    rules.sort_by(|a, b| {
        b.lift
            .total_cmp(&a.lift)
            .then(b.confidence.total_cmp(&a.confidence))
            .then_with(|| a.antecedent.cmp(&b.antecedent))
            .then_with(|| a.consequent.cmp(&b.consequent))
    });

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::{mine, FrequentItemsets, ItemsetStat};
    use crate::transactions::Transaction;

    fn tx(id: &str, items: &[&str]) -> Transaction {
        let mut items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        items.sort();
        Transaction {
            id: id.to_string(),
            items,
        }
    }

    fn key(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn find<'a>(rules: &'a [Rule], antecedent: &[&str], consequent: &str) -> &'a Rule {
        rules
            .iter()
            .find(|rule| rule.antecedent == key(antecedent) && rule.consequent == consequent)
            .unwrap_or_else(|| panic!("missing rule {:?} -> {}", antecedent, consequent))
    }

    #[test]
    fn test_pair_rules_metrics() {
        let transactions = vec![
            tx("T1", &["X", "Y"]),
            tx("T2", &["X", "Y"]),
            tx("T3", &["X", "Z"]),
            tx("T4", &["Y"]),
        ];
        let rules = generate_rules(&mine(&transactions, 0.2));

        let x_to_y = find(&rules, &["X"], "Y");
        assert_eq!(x_to_y.count, 2);
        assert!(approx(x_to_y.support, 0.5));
        assert!(approx(x_to_y.confidence, 0.5 / 0.75));
        assert!(approx(x_to_y.lift, 0.5 / (0.75 * 0.75)));

        let y_to_x = find(&rules, &["Y"], "X");
        assert!(approx(y_to_x.confidence, 0.5 / 0.75));

        let z_to_x = find(&rules, &["Z"], "X");
        assert!(approx(z_to_x.confidence, 1.0));
        assert!(approx(z_to_x.lift, 0.25 / (0.25 * 0.75)));
    }

    #[test]
    fn test_pair_rules_are_symmetric_in_lift_and_support() {
        let transactions = vec![
            tx("T1", &["X", "Y"]),
            tx("T2", &["X", "Y"]),
            tx("T3", &["X", "Z"]),
            tx("T4", &["Y"]),
        ];
        let rules = generate_rules(&mine(&transactions, 0.2));

        let x_to_y = find(&rules, &["X"], "Y");
        let y_to_x = find(&rules, &["Y"], "X");
        assert!(approx(x_to_y.lift, y_to_x.lift));
        assert!(approx(x_to_y.support, y_to_x.support));
        assert_eq!(x_to_y.count, y_to_x.count);
    }

    #[test]
    fn test_confidence_bounds() {
        let transactions = vec![
            tx("T1", &["A", "B", "C"]),
            tx("T2", &["A", "B", "C"]),
            tx("T3", &["A", "B"]),
            tx("T4", &["C", "D"]),
            tx("T5", &["A", "D"]),
        ];
        let rules = generate_rules(&mine(&transactions, 0.2));

        assert!(!rules.is_empty());
        for rule in &rules {
            assert!(rule.confidence > 0.0 && rule.confidence <= 1.0);
            assert!(rule.support > 0.0);
            assert!(rule.lift > 0.0);
        }
    }

    #[test]
    fn test_triplet_rules_use_pair_support() {
        let transactions = vec![
            tx("T1", &["A", "B", "C"]),
            tx("T2", &["A", "B", "C"]),
            tx("T3", &["A", "B"]),
            tx("T4", &["C"]),
        ];
        let rules = generate_rules(&mine(&transactions, 0.5));

        // support(A,B,C)=0.5, support(A,B)=0.75, support(C)=0.75
        let ab_to_c = find(&rules, &["A", "B"], "C");
        assert!(approx(ab_to_c.confidence, 0.5 / 0.75));
        assert!(approx(ab_to_c.lift, 0.5 / (0.75 * 0.75)));
        assert_eq!(ab_to_c.count, 2);

        // support(B,C)=0.5, support(A)=0.75
        let bc_to_a = find(&rules, &["B", "C"], "A");
        assert!(approx(bc_to_a.confidence, 1.0));
        assert!(approx(bc_to_a.lift, 0.5 / (0.5 * 0.75)));
    }

    #[test]
    fn test_triplet_rule_skipped_when_antecedent_pair_not_frequent() {
        // Constructed state: the (B, C) and (A, C) pairs are absent from the
        // pair table even though the triplet is present.
        let mut singles = FrequentItemsets::default();
        for item in ["A", "B", "C"] {
            singles.entries.insert(
                key(&[item]),
                ItemsetStat {
                    count: 2,
                    support: 0.5,
                },
            );
        }
        let mut pairs = FrequentItemsets::default();
        pairs.entries.insert(
            key(&["A", "B"]),
            ItemsetStat {
                count: 2,
                support: 0.5,
            },
        );
        let mut triples = FrequentItemsets::default();
        triples.entries.insert(
            key(&["A", "B", "C"]),
            ItemsetStat {
                count: 1,
                support: 0.25,
            },
        );
        let mined = MiningResult {
            total_transactions: 4,
            singles,
            pairs,
            triples,
        };

        let rules = generate_rules(&mined);
        let from_triple: Vec<&Rule> = rules.iter().filter(|r| r.antecedent.len() == 2).collect();

        assert_eq!(from_triple.len(), 1);
        assert_eq!(from_triple[0].antecedent, key(&["A", "B"]));
        assert_eq!(from_triple[0].consequent, "C");
    }

    #[test]
    fn test_rules_sorted_by_lift_then_confidence() {
        let transactions = vec![
            tx("T1", &["X", "Y"]),
            tx("T2", &["X", "Y"]),
            tx("T3", &["X", "Z"]),
            tx("T4", &["Y"]),
        ];
        let rules = generate_rules(&mine(&transactions, 0.2));

        for window in rules.windows(2) {
            let (first, second) = (&window[0], &window[1]);
            assert!(
                first.lift > second.lift
                    || (approx(first.lift, second.lift) && first.confidence >= second.confidence)
            );
        }

        // Z->X (confidence 1.0) outranks X->Z at equal lift; the X/Y pair
        // ties on both metrics and falls back to antecedent order.
        assert_eq!(rules[0].antecedent, key(&["Z"]));
        assert_eq!(rules[1].antecedent, key(&["X"]));
        assert_eq!(rules[1].consequent, "Z");
        assert_eq!(rules[2].antecedent, key(&["X"]));
        assert_eq!(rules[2].consequent, "Y");
        assert_eq!(rules[3].antecedent, key(&["Y"]));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let transactions = vec![
            tx("T1", &["A", "B", "C"]),
            tx("T2", &["A", "B", "C"]),
            tx("T3", &["B", "C"]),
            tx("T4", &["A", "C"]),
        ];
        let mined = mine(&transactions, 0.25);

        assert_eq!(generate_rules(&mined), generate_rules(&mined));
    }

    #[test]
    fn test_empty_mining_result_yields_no_rules() {
        let rules = generate_rules(&mine(&[], 0.1));
        assert!(rules.is_empty());
    }
}
