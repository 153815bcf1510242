//! Sequence similarity scoring
//!
//! Ratcliff/Obershelp "gestalt" matching: find the longest common block,
//! recurse into the unmatched text on its left and right, and score
//! `2 * matched / (len(a) + len(b))`. Lengths are counted in characters.
//!
//! Candidates of 200 characters or more get the usual "popular element"
//! treatment: a character that occurs in more than 1% of the candidate
//! (plus one) is never used to seed a match. A block found from the other
//! characters is then extended over equal neighbours, popular or not.

use std::collections::HashMap;

use crate::text::normalize;

const AUTOJUNK_MIN_LEN: usize = 200;

/// Closeness of two strings in `[0, 1]` after normalizing both.
///
/// Returns `0.0` when either side is empty after normalization.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    ratio(&a, &b)
}

/// Raw matching-blocks ratio between two strings, without normalization.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = BlockMatcher::new(&a, &b).matched_len();
    2.0 * matched as f64 / total as f64
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of every non-popular character of `b`.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        BlockMatcher { a, b, b2j }
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given window.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// earliest in `b`. The block is grown over equal characters on both sides
    /// afterwards, so popular characters only stop a block from being seeded.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
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
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_len {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && self.a[best_i + best_len] == self.b[best_j + best_len]
        {
            best_len += 1;
        }

        (best_i, best_j, best_len)
    }

    /// Total number of characters covered by all matching blocks.
    fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_strings() {
        assert!(approx(similarity("Full Name", "full   name"), 1.0));
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(similarity("", "name"), 0.0);
        assert_eq!(similarity("name", "   "), 0.0);
        assert_eq!(similarity(" ", "\t"), 0.0);
    }

    #[test]
    fn test_shifted_block() {
        // "bcd" is the only common block.
        assert!(approx(ratio("abcd", "bcde"), 0.75));
    }

    #[test]
    fn test_recurses_around_longest_block() {
        // Blocks "ab" and "cd" on either side of the unmatched "x".
        assert!(approx(ratio("abxcd", "abcd"), 8.0 / 9.0));
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(approx(similarity("Имя", "имя"), 1.0));
        assert!(approx(ratio("ёж", "ёжик"), 4.0 / 6.0));
    }

    #[test]
    fn test_score_in_unit_interval() {
        for (a, b) in [
            ("Date of birth", "Date of birth (dd.mm.yyyy)"),
            ("Phone", "Telephone number"),
            ("a", "b"),
        ] {
            let s = similarity(a, b);
            assert!((0.0..=1.0).contains(&s), "{a} / {b} -> {s}");
        }
    }

    #[test]
    fn test_popular_characters_extend_but_do_not_seed() {
        // Nothing seeds a block, but the empty block at the window start
        // still grows over the equal leading character.
        let long = "a".repeat(250);
        assert!(approx(ratio("a", &long), 2.0 / 251.0));
        let short = "a".repeat(150);
        assert!(approx(ratio("a", &short), 2.0 / 151.0));
    }

    #[test]
    fn test_long_candidate_with_one_word_changed() {
        let long = "i confirm that the information provided in this application is complete and correct \
                    to the best of my knowledge, and i understand that the lender may verify it within \
                    thirty days of the date of signature";
        assert!(long.chars().count() >= 200);
        let changed = long.replace("thirty", "forty");
        assert!(ratio(&changed, long) > 0.75);
    }
}
