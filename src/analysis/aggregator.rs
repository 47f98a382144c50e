//! Derived fields for rendering the guess pool.
//!
//! Computes the chart layout offsets that keep equal-weight guesses
//! from overlapping, and the frequency counts behind the name cloud.

use crate::models::{normalize_baby_name, normalize_submitter_id, Arrival, Guess};
use std::collections::HashMap;

/// Default vertical spacing between stacked points sharing a weight.
pub const DEFAULT_STACK_SPACING: f64 = 1.0;

/// Assign each guess a stacking offset for the scatter chart.
///
/// Guesses are grouped by exact-equal weight (bitwise f64 equality);
/// within a group the offset is `index_in_group * spacing`, counted in
/// input order. Plotting `(weight, offset)` therefore never puts two
/// points at the identical coordinate, and the assignment is
/// deterministic for a given input order. Offsets are independent
/// across weight groups.
pub fn layout_offsets(guesses: &[Guess], spacing: f64) -> Vec<f64> {
    let mut seen: HashMap<u64, usize> = HashMap::new();

    guesses
        .iter()
        .map(|g| {
            let slot = seen.entry(g.weight.to_bits()).or_insert(0);
            let offset = *slot as f64 * spacing;
            *slot += 1;
            offset
        })
        .collect()
}

/// Count guesses per normalized (trimmed, lower-cased) baby name.
pub fn name_frequencies(guesses: &[Guess]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for guess in guesses {
        *counts.entry(normalize_baby_name(&guess.baby_name)).or_default() += 1;
    }

    counts
}

/// Count guesses per arrival timing.
pub fn arrival_breakdown(guesses: &[Guess]) -> HashMap<Arrival, usize> {
    let mut counts: HashMap<Arrival, usize> = HashMap::new();

    for guess in guesses {
        *counts.entry(guess.arrival).or_default() += 1;
    }

    counts
}

/// Number of distinct submitter identities among the guesses.
pub fn distinct_submitters(guesses: &[Guess]) -> usize {
    guesses
        .iter()
        .map(|g| normalize_submitter_id(&g.guesser_name))
        .collect::<std::collections::HashSet<_>>()
        .len()
}

/// Name counts sorted by count (descending), ties by name.
pub fn sorted_name_counts(counts: &HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut sorted: Vec<_> = counts
        .iter()
        .map(|(name, count)| (name.clone(), *count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// The full cross-shard guess collection plus its derived render-only
/// fields. Recomputed fresh on every load, never cached.
#[derive(Debug, Clone)]
pub struct AggregateView {
    /// All guesses, in load order.
    pub guesses: Vec<Guess>,
    /// Stacking offset per guess, parallel to `guesses`.
    pub offsets: Vec<f64>,
    /// Normalized baby name -> guess count.
    pub name_counts: HashMap<String, usize>,
}

impl AggregateView {
    /// Build the view from loaded guesses.
    pub fn build(guesses: Vec<Guess>, spacing: f64) -> Self {
        let offsets = layout_offsets(&guesses, spacing);
        let name_counts = name_frequencies(&guesses);
        Self {
            guesses,
            offsets,
            name_counts,
        }
    }

    /// Whether the pool has no guesses yet.
    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(guesser: &str, baby: &str, weight: f64, arrival: Arrival) -> Guess {
        Guess {
            guesser_name: guesser.to_string(),
            baby_name: baby.to_string(),
            weight,
            arrival,
        }
    }

    #[test]
    fn test_equal_weights_get_distinct_offsets() {
        let guesses = vec![
            guess("Jane", "Sam", 7.5, Arrival::Early),
            guess("Bob", "Ada", 7.5, Arrival::Late),
            guess("Ann", "Eve", 7.5, Arrival::OnTime),
        ];

        let offsets = layout_offsets(&guesses, DEFAULT_STACK_SPACING);
        assert_eq!(offsets, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_offsets_independent_across_weight_groups() {
        let guesses = vec![
            guess("Jane", "Sam", 7.5, Arrival::Early),
            guess("Bob", "Ada", 8.0, Arrival::Late),
            guess("Ann", "Eve", 7.5, Arrival::OnTime),
            guess("Kim", "Ira", 8.0, Arrival::Early),
        ];

        let offsets = layout_offsets(&guesses, DEFAULT_STACK_SPACING);
        // Each weight group stacks from zero in input order.
        assert_eq!(offsets, vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_offsets_honor_spacing_constant() {
        let guesses = vec![
            guess("Jane", "Sam", 7.5, Arrival::Early),
            guess("Bob", "Ada", 7.5, Arrival::Late),
        ];

        let offsets = layout_offsets(&guesses, 0.25);
        assert_eq!(offsets, vec![0.0, 0.25]);
    }

    #[test]
    fn test_offsets_deterministic_for_same_input() {
        let guesses = vec![
            guess("Jane", "Sam", 7.5, Arrival::Early),
            guess("Bob", "Ada", 7.5, Arrival::Late),
            guess("Ann", "Eve", 6.2, Arrival::OnTime),
        ];

        let first = layout_offsets(&guesses, DEFAULT_STACK_SPACING);
        let second = layout_offsets(&guesses, DEFAULT_STACK_SPACING);
        assert_eq!(first, second);
    }

    #[test]
    fn test_name_frequencies_normalize_case_and_whitespace() {
        let guesses = vec![
            guess("Jane", "Alex", 7.5, Arrival::Early),
            guess("Bob", "alex ", 8.0, Arrival::Late),
            guess("Ann", "ALEX", 6.2, Arrival::OnTime),
        ];

        let counts = name_frequencies(&guesses);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("alex"), Some(&3));
    }

    #[test]
    fn test_arrival_breakdown() {
        let guesses = vec![
            guess("Jane", "Sam", 7.5, Arrival::Early),
            guess("Bob", "Ada", 8.0, Arrival::Early),
            guess("Ann", "Eve", 6.2, Arrival::Late),
        ];

        let counts = arrival_breakdown(&guesses);
        assert_eq!(counts.get(&Arrival::Early), Some(&2));
        assert_eq!(counts.get(&Arrival::Late), Some(&1));
        assert_eq!(counts.get(&Arrival::OnTime), None);
    }

    #[test]
    fn test_distinct_submitters_counts_normalized_identities() {
        let guesses = vec![
            guess("Jane", "Sam", 7.5, Arrival::Early),
            guess(" jane ", "Max", 8.0, Arrival::Late),
            guess("Bob", "Ada", 6.2, Arrival::OnTime),
        ];

        assert_eq!(distinct_submitters(&guesses), 2);
    }

    #[test]
    fn test_sorted_name_counts_orders_by_count_then_name() {
        let guesses = vec![
            guess("a", "Max", 7.0, Arrival::Early),
            guess("b", "Max", 7.1, Arrival::Early),
            guess("c", "Ada", 7.2, Arrival::Early),
            guess("d", "Sam", 7.3, Arrival::Early),
        ];

        let sorted = sorted_name_counts(&name_frequencies(&guesses));
        assert_eq!(
            sorted,
            vec![
                ("max".to_string(), 2),
                ("ada".to_string(), 1),
                ("sam".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_aggregate_view_on_empty_pool() {
        let view = AggregateView::build(Vec::new(), DEFAULT_STACK_SPACING);
        assert!(view.is_empty());
        assert!(view.offsets.is_empty());
        assert!(view.name_counts.is_empty());
    }

    #[test]
    fn test_jane_scenario() {
        // Two guesses from Jane at the same weight: distinct offsets and
        // one count per distinct name.
        let guesses = vec![
            guess("Jane", "Sam", 7.5, Arrival::Early),
            guess("Jane", "Max", 7.5, Arrival::Late),
        ];

        let view = AggregateView::build(guesses, DEFAULT_STACK_SPACING);
        assert_ne!(view.offsets[0], view.offsets[1]);
        assert_eq!(view.name_counts.get("sam"), Some(&1));
        assert_eq!(view.name_counts.get("max"), Some(&1));
    }
}
