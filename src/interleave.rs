//! Randomized interleaving of labeled tracks.
//!
//! Finds an ordering of a track list that keeps tracks with the same label
//! apart. Exact minimization is combinatorial, so the search is randomized
//! but bounded:
//!
//! 1. Track indices are stably sorted by label, so each label forms a run.
//! 2. For every group size `g` from 1 to `max(1, floor(group_ratio * N))`
//!    the sorted run is cut into consecutive groups of `g` tracks.
//! 3. Each trial shuffles the tracks inside every group, shuffles the group
//!    order, then cross-merges the groups from both ends inward.
//! 4. The candidate with the fewest adjacent same-label pairs wins. Ties go
//!    to the later candidate, so larger group sizes are preferred.
//!
//! Total work is `trials_per_size * max_group * N`.

use crate::label::extract_label;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Default number of random trials per group size.
pub const DEFAULT_TRIALS_PER_SIZE: usize = 100;

/// Default largest group size, as a fraction of the track count.
pub const DEFAULT_GROUP_RATIO: f64 = 0.7;

/// Search parameters.
#[derive(Debug, Clone)]
pub struct InterleaveOptions {
    pub trials_per_size: usize,
    pub group_ratio: f64,
    /// Fixed seed for reproducible orderings; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for InterleaveOptions {
    fn default() -> Self {
        Self {
            trials_per_size: DEFAULT_TRIALS_PER_SIZE,
            group_ratio: DEFAULT_GROUP_RATIO,
            seed: None,
        }
    }
}

impl InterleaveOptions {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Result of an interleaving search.
#[derive(Debug, Clone, Serialize)]
pub struct Arrangement {
    /// The input names, reordered.
    pub order: Vec<String>,
    /// Adjacent same-label pairs left in `order`.
    pub collisions: usize,
    /// `group_size / max_group_size * 100`, or 0 for an empty input.
    pub quality: f64,
    pub group_size: usize,
    pub max_group_size: usize,
}

impl Arrangement {
    fn empty() -> Self {
        Self {
            order: Vec::new(),
            collisions: 0,
            quality: 0.0,
            group_size: 0,
            max_group_size: 0,
        }
    }
}

/// Best candidate seen so far, as positions into the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Best {
    pub order: Vec<usize>,
    pub collisions: usize,
    pub group_size: usize,
}

/// Interleave track names, labeling each with [`extract_label`].
pub fn interleave(names: &[String], options: &InterleaveOptions) -> Arrangement {
    let labels: Vec<&str> = names.iter().map(|name| extract_label(name)).collect();
    arrange(names, &labels, options)
}

/// Interleave `(name, label)` pairs with caller-supplied labels.
pub fn interleave_labeled(
    items: &[(String, String)],
    options: &InterleaveOptions,
) -> Arrangement {
    let names: Vec<String> = items.iter().map(|(name, _)| name.clone()).collect();
    let labels: Vec<&str> = items.iter().map(|(_, label)| label.as_str()).collect();
    arrange(&names, &labels, options)
}

fn arrange(names: &[String], labels: &[&str], options: &InterleaveOptions) -> Arrangement {
    if names.is_empty() {
        return Arrangement::empty();
    }

    let max_group_size = max_group_size(names.len(), options.group_ratio);
    let mut rng = options.rng();
    let best = interleave_with_rng(labels, options, &mut rng);

    Arrangement {
        order: best.order.iter().map(|&i| names[i].clone()).collect(),
        collisions: best.collisions,
        quality: best.group_size as f64 / max_group_size as f64 * 100.0,
        group_size: best.group_size,
        max_group_size,
    }
}

/// Largest group size tried for `count` tracks, between 1 and `count`.
///
/// Ratios that are not finite fall back to the default ratio.
pub fn max_group_size(count: usize, group_ratio: f64) -> usize {
    let ratio = if group_ratio.is_finite() {
        group_ratio
    } else {
        DEFAULT_GROUP_RATIO
    };
    // `as` saturates, so huge and negative products land on the bounds
    ((count as f64 * ratio).floor() as usize).clamp(1, count.max(1))
}

/// Run the search over `labels` with an explicit random source.
///
/// Returns the winning permutation of `0..labels.len()`. An empty input
/// yields an empty order with group size 0.
pub fn interleave_with_rng<R: Rng + ?Sized>(
    labels: &[&str],
    options: &InterleaveOptions,
    rng: &mut R,
) -> Best {
    if labels.is_empty() {
        return Best {
            order: Vec::new(),
            collisions: 0,
            group_size: 0,
        };
    }

    let mut sorted: Vec<usize> = (0..labels.len()).collect();
    // sort_by_key is stable: equal labels keep listing order
    sorted.sort_by_key(|&i| labels[i]);

    let max_group = max_group_size(labels.len(), options.group_ratio);
    let trials = options.trials_per_size.max(1);

    let initial = Best {
        order: Vec::new(),
        collisions: usize::MAX,
        group_size: 0,
    };

    (1..=max_group).fold(initial, |best, group_size| {
        let mut groups: Vec<Vec<usize>> = sorted
            .chunks(group_size)
            .map(<[usize]>::to_vec)
            .collect();

        (0..trials).fold(best, |best, _| {
            for group in groups.iter_mut() {
                group.shuffle(rng);
            }
            groups.shuffle(rng);

            let order = cross_merge(&groups, labels.len());
            let collisions = count_collisions_by_index(&order, labels);
            if collisions <= best.collisions {
                Best {
                    order,
                    collisions,
                    group_size,
                }
            } else {
                best
            }
        })
    })
}

/// Merge groups pairwise from both ends of the list toward the middle,
/// alternating elements of the front and back group. A middle group left
/// without a partner is appended as is.
fn cross_merge(groups: &[Vec<usize>], len: usize) -> Vec<usize> {
    let mut merged = Vec::with_capacity(len);
    if groups.is_empty() {
        return merged;
    }

    let (mut i, mut j) = (0, groups.len() - 1);
    while i <= j {
        if i == j {
            merged.extend_from_slice(&groups[i]);
            break;
        }

        let (front, back) = (&groups[i], &groups[j]);
        for k in 0..front.len().max(back.len()) {
            if let Some(&item) = front.get(k) {
                merged.push(item);
            }
            if let Some(&item) = back.get(k) {
                merged.push(item);
            }
        }
        i += 1;
        j -= 1;
    }

    merged
}

/// Number of adjacent positions sharing a label.
pub fn count_collisions(labels: &[&str]) -> usize {
    labels.windows(2).filter(|pair| pair[0] == pair[1]).count()
}

fn count_collisions_by_index(order: &[usize], labels: &[&str]) -> usize {
    order
        .windows(2)
        .filter(|pair| labels[pair[0]] == labels[pair[1]])
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn seeded(seed: u64) -> InterleaveOptions {
        InterleaveOptions {
            seed: Some(seed),
            ..Default::default()
        }
    }

    fn multiset(items: &[String]) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for item in items {
            *counts.entry(item.as_str()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_empty_input() {
        let result = interleave(&[], &InterleaveOptions::default());
        assert!(result.order.is_empty());
        assert_eq!(result.collisions, 0);
        assert_eq!(result.quality, 0.0);
    }

    #[test]
    fn test_single_item() {
        let input = names(&["[A]only.mp3"]);
        let result = interleave(&input, &seeded(1));
        assert_eq!(result.order, input);
        assert_eq!(result.collisions, 0);
        assert_eq!(result.max_group_size, 1);
        assert_eq!(result.quality, 100.0);
    }

    #[test]
    fn test_two_labels_alternate() {
        let input = names(&["[A]1.mp3", "[A]2.mp3", "[B]3.mp3", "[B]4.mp3"]);
        let result = interleave(&input, &seeded(7));

        assert_eq!(multiset(&result.order), multiset(&input));
        assert_eq!(result.collisions, 0);
        assert!(result.quality > 0.0);

        let labels: Vec<&str> = result.order.iter().map(|n| extract_label(n)).collect();
        assert!(labels == ["A", "B", "A", "B"] || labels == ["B", "A", "B", "A"]);
    }

    #[test]
    fn test_ties_prefer_larger_groups() {
        // Group size 2 always yields ABAB, so the last tie is at max size
        let input = names(&["[A]1.mp3", "[A]2.mp3", "[B]3.mp3", "[B]4.mp3"]);
        let result = interleave(&input, &seeded(3));
        assert_eq!(result.max_group_size, 2);
        assert_eq!(result.group_size, 2);
        assert_eq!(result.quality, 100.0);
    }

    #[test]
    fn test_same_label_pair_cannot_avoid_adjacency() {
        let input = names(&["[A]1.mp3", "[A]2.mp3"]);
        let result = interleave(&input, &seeded(11));
        assert_eq!(result.collisions, 1);
        assert_eq!(result.order.len(), 2);
    }

    #[test]
    fn test_single_label_collisions_bounded() {
        let input: Vec<String> = (0..9).map(|i| format!("[A]{i}.mp3")).collect();
        let result = interleave(&input, &seeded(5));
        assert_eq!(result.collisions, input.len() - 1);
        assert_eq!(multiset(&result.order), multiset(&input));
    }

    #[test]
    fn test_labeled_input_uses_supplied_labels() {
        let items = vec![
            ("a.mp3".to_string(), "x".to_string()),
            ("b.mp3".to_string(), "x".to_string()),
            ("c.mp3".to_string(), "y".to_string()),
            ("d.mp3".to_string(), "y".to_string()),
        ];
        let result = interleave_labeled(&items, &seeded(2));
        assert_eq!(result.collisions, 0);
        assert_eq!(result.order.len(), 4);
    }

    #[test]
    fn test_duplicate_names_are_distinct_positions() {
        let input = names(&["[A]x.mp3", "[A]x.mp3", "[B]y.mp3"]);
        let result = interleave(&input, &seeded(9));
        assert_eq!(multiset(&result.order), multiset(&input));
    }

    #[test]
    fn test_same_seed_same_order() {
        let input: Vec<String> = (0..30).map(|i| format!("[L{}]{i}.mp3", i % 4)).collect();
        let first = interleave(&input, &seeded(42));
        let second = interleave(&input, &seeded(42));
        assert_eq!(first.order, second.order);
        assert_eq!(first.collisions, second.collisions);
    }

    #[test]
    fn test_count_collisions() {
        assert_eq!(count_collisions(&[]), 0);
        assert_eq!(count_collisions(&["a"]), 0);
        assert_eq!(count_collisions(&["a", "a", "b", "b", "a"]), 2);
    }

    #[test]
    fn test_cross_merge_alternates_from_both_ends() {
        let groups = vec![vec![0, 1], vec![2, 3], vec![4]];
        assert_eq!(cross_merge(&groups, 5), vec![0, 4, 1, 2, 3]);

        let groups = vec![vec![0], vec![1, 2, 3], vec![4, 5], vec![6, 7]];
        assert_eq!(cross_merge(&groups, 8), vec![0, 6, 7, 1, 4, 2, 5, 3]);
    }

    #[test]
    fn test_max_group_size() {
        assert_eq!(max_group_size(1, 0.7), 1);
        assert_eq!(max_group_size(2, 0.7), 1);
        assert_eq!(max_group_size(4, 0.7), 2);
        assert_eq!(max_group_size(10, 0.7), 7);
    }

    #[test]
    fn test_max_group_size_out_of_range_ratio() {
        assert_eq!(max_group_size(10, 5.0), 10);
        assert_eq!(max_group_size(10, -1.0), 1);
        assert_eq!(max_group_size(10, f64::INFINITY), 7);
        assert_eq!(max_group_size(10, f64::NAN), 7);
        assert_eq!(max_group_size(0, 0.7), 1);
    }

    #[test]
    fn test_infinite_ratio_still_finishes() {
        let options = InterleaveOptions {
            group_ratio: f64::INFINITY,
            seed: Some(9),
            ..Default::default()
        };
        let arrangement = interleave(&names(&["[A]1", "[B]2", "[A]3", "[B]4"]), &options);
        assert_eq!(arrangement.order.len(), 4);
        assert_eq!(arrangement.max_group_size, 2);
    }

    #[test]
    fn test_interleave_with_rng_is_permutation() {
        let labels = ["b", "a", "b", "c", "a", "b"];
        let mut rng = StdRng::seed_from_u64(99);
        let best = interleave_with_rng(&labels, &InterleaveOptions::default(), &mut rng);

        let mut sorted = best.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..labels.len()).collect::<Vec<_>>());
        assert!(best.group_size >= 1);
    }
}
