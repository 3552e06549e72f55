//! Ratcliff/Obershelp "gestalt" sequence similarity over Unicode scalars.
//!
//! Matching blocks are found by taking the longest common contiguous run,
//! then recursing on the pieces left and right of it. The ratio is
//! `2 * matched / (len(a) + len(b))`.

use std::collections::{HashMap, HashSet};

/// `b` must be at least this long before popular elements stop anchoring matches.
const POPULAR_MIN_LEN: usize = 200;

/// Similarity ratio in [0, 1]. Two empty strings are identical (1.0).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = SequenceMatcher::new(&a, &b).matched_len();
    2.0 * matched as f64 / total as f64
}

struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each element of `b`, ascending. Popular elements are left out.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > limit)
                .map(|(&c, _)| c)
                .collect();
            for c in popular {
                b2j.remove(&c);
            }
        }

        Self { a, b, b2j }
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` within the given ranges, earliest
    /// in `a` then earliest in `b` on ties. Returns `(i, j, k)`.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 } + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular elements never anchor a match but may still extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// Total length of all matching blocks.
    fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(sequence_ratio("toko makmur", "toko makmur"), 1.0);
        assert_eq!(sequence_ratio("", ""), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
    }

    #[test]
    fn classic_gestalt_values() {
        // Known gestalt ratios.
        assert!(approx(sequence_ratio("abcd", "bcde"), 0.75));
        assert!(approx(sequence_ratio("private", "pirate"), 2.0 * 5.0 / 13.0));
        assert!(approx(sequence_ratio(" abcd", "abcd abcd"), 2.0 * 5.0 / 14.0));
    }

    #[test]
    fn prefix_match() {
        // "toko makmur" (11) inside "toko makmur jaya" (16)
        assert!(approx(sequence_ratio("toko makmur", "toko makmur jaya"), 22.0 / 27.0));
    }

    #[test]
    fn counts_unicode_scalars_not_bytes() {
        assert_eq!(sequence_ratio("café", "café"), 1.0);
        assert!(approx(sequence_ratio("café", "cafe"), 0.75));
    }

    #[test]
    fn popular_elements_do_not_anchor_long_sequences() {
        // 'a' occurs 249 times in a 250-element b (limit 250/100 + 1), so it
        // cannot start a match and the lone 'a' in the query finds nothing.
        let b = format!("b{}", "a".repeat(249));
        assert_eq!(sequence_ratio("a", &b), 0.0);
        // Below the length cutoff every element anchors.
        let short = format!("b{}", "a".repeat(149));
        assert!(approx(sequence_ratio("a", &short), 2.0 / 151.0));
    }

    #[test]
    fn popular_elements_extend_an_anchored_match() {
        // "xa" anchors on the rare 'x' then extends over the popular 'a'.
        let b = format!("x{}", "a".repeat(249));
        assert!(approx(sequence_ratio("xa", &b), 4.0 / 252.0));
    }
}
