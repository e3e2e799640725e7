//! Approximate text search over in-memory catalogs.
//!
//! A key matches a query when some substring of the key is within a small
//! edit distance of the query. The score is that distance divided by the
//! query length, so `0.0` is an exact substring hit and `1.0` means nothing
//! in common. Typing "red" finds "Crimson Red", and "crimsn" still finds it.

use crate::types::{Color, Product};

/// Default match threshold on the `0.0..=1.0` score scale.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Normalized approximate-substring matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FuzzyMatcher {
    /// Create a matcher; the threshold is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// The active threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score `key` against `query`, or `None` if it exceeds the threshold.
    #[must_use]
    pub fn score(&self, query: &str, key: &str) -> Option<f64> {
        let pattern: Vec<char> = query.trim().to_lowercase().chars().collect();
        if pattern.is_empty() {
            return Some(0.0);
        }
        let text: Vec<char> = key.to_lowercase().chars().collect();
        let distance = best_substring_distance(&pattern, &text);

        #[allow(clippy::cast_precision_loss)] // query lengths are tiny
        let score = distance as f64 / pattern.len() as f64;
        (score <= self.threshold).then_some(score)
    }

    /// Filter `items` by their best-scoring key, best matches first.
    ///
    /// Ties keep catalog order. A blank query returns every item.
    pub fn filter<'a, T, K>(&self, items: &'a [T], query: &str, keys: K) -> Vec<&'a T>
    where
        K: Fn(&T) -> Vec<&str>,
    {
        if query.trim().is_empty() {
            return items.iter().collect();
        }

        let mut scored: Vec<(f64, &'a T)> = items
            .iter()
            .filter_map(|item| {
                keys(item)
                    .into_iter()
                    .filter_map(|key| self.score(query, key))
                    .min_by(f64::total_cmp)
                    .map(|score| (score, item))
            })
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.into_iter().map(|(_, item)| item).collect()
    }

    /// Colors whose name or code matches `query`.
    #[must_use]
    pub fn colors<'a>(&self, colors: &'a [Color], query: &str) -> Vec<&'a Color> {
        self.filter(colors, query, |c| {
            vec![c.color_name.as_str(), c.color_code.as_str()]
        })
    }

    /// Product names matching `query`.
    #[must_use]
    pub fn names<'a>(&self, names: &'a [String], query: &str) -> Vec<&'a String> {
        self.filter(names, query, |n| vec![n.as_str()])
    }

    /// Products whose name matches `query`.
    #[must_use]
    pub fn products<'a>(&self, products: &'a [Product], query: &str) -> Vec<&'a Product> {
        self.filter(products, query, |p| vec![p.name.as_str()])
    }
}

/// Smallest edit distance between `pattern` and any substring of `text`.
fn best_substring_distance(pattern: &[char], text: &[char]) -> usize {
    // column[i] = cost of matching pattern[..i] ending at the current text char;
    // column[0] stays 0 so a match may start anywhere.
    let mut column: Vec<usize> = (0..=pattern.len()).collect();
    let mut best = pattern.len();

    for &tc in text {
        let mut diagonal = 0;
        let mut above = 0;
        for (cell, &pc) in column.iter_mut().skip(1).zip(pattern) {
            let previous = *cell;
            let value = (diagonal + usize::from(pc != tc))
                .min(previous + 1)
                .min(above + 1);
            diagonal = previous;
            *cell = value;
            above = value;
        }
        if let Some(&last) = column.last() {
            best = best.min(last);
        }
    }
    best
}
